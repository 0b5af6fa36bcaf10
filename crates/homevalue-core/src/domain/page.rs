use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PropertyRecord, ValidationError};

/// Largest page a listing request may ask for.
pub const MAX_PAGE_SIZE: usize = 1_000;

/// Record attribute a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    #[default]
    Price,
    SquareFootage,
    YearBuilt,
}

impl SortField {
    fn key(self, record: &PropertyRecord) -> Option<f64> {
        match self {
            Self::Id => record.id.map(|id| id as f64),
            Self::Price => record.price,
            Self::SquareFootage => record.square_footage.map(f64::from),
            Self::YearBuilt => record.year_built.map(f64::from),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Price => "price",
            Self::SquareFootage => "squareFootage",
            Self::YearBuilt => "yearBuilt",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "id" => Ok(Self::Id),
            "price" => Ok(Self::Price),
            "squarefootage" => Ok(Self::SquareFootage),
            "yearbuilt" => Ok(Self::YearBuilt),
            _ => Err(ValidationError::InvalidConfig {
                key: "sortBy".to_string(),
                value: input.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// `desc` in any case is descending, anything else ascending.
impl FromStr for SortDirection {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Ok(Self::Asc)
        }
    }
}

/// Zero-based page selection with ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort_by: SortField,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort_by: SortField::Price,
            direction: SortDirection::Asc,
        }
    }
}

impl PageRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.size == 0 || self.size > MAX_PAGE_SIZE {
            return Err(ValidationError::OutOfRange {
                field: "size",
                min: 1.0,
                max: MAX_PAGE_SIZE as f64,
                value: self.size as f64,
            });
        }
        Ok(())
    }

    /// Orders by the sort field; records without a value come last in
    /// either direction and ties keep their snapshot order.
    pub fn compare(&self, left: &PropertyRecord, right: &PropertyRecord) -> Ordering {
        match (self.sort_by.key(left), self.sort_by.key(right)) {
            (Some(a), Some(b)) => match self.direction {
                SortDirection::Asc => a.total_cmp(&b),
                SortDirection::Desc => b.total_cmp(&a),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Cuts one page out of already ordered items.
    pub fn slice<T: Clone>(&self, ordered: &[T]) -> Page<T> {
        let total_elements = ordered.len();
        let start = self.page.saturating_mul(self.size).min(total_elements);
        let end = start.saturating_add(self.size).min(total_elements);
        Page {
            content: ordered[start..end].to_vec(),
            page: self.page,
            size: self.size,
            total_elements,
            total_pages: total_elements.div_ceil(self.size.max(1)),
        }
    }
}

/// One page of a listing plus the totals needed to walk the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.page.saturating_add(1) >= self.total_pages
    }
}
