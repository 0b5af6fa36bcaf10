use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use tracing::warn;

/// Immutable property record as exposed by a [`crate::PropertyStore`].
///
/// Fields are parsed one by one: a value of the wrong type or out of range
/// for its field (`"n/a"`, `1400.5` square feet, `-1` bedrooms) becomes
/// `None` without rejecting the rest of the record. Numeric strings are
/// accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub square_footage: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub bedrooms: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub bathrooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub year_built: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub lot_size: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub distance_to_city_center: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub school_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<f64>,
}

/// Numeric field type that tolerates malformed source values.
trait LenientField: FromStr {
    const KIND: &'static str;

    fn from_number(number: &Number) -> Option<Self>;
}

/// Integral value of a JSON number; fractional numbers have none.
fn whole_number(number: &Number) -> Option<i128> {
    if let Some(value) = number.as_u64() {
        return Some(i128::from(value));
    }
    if let Some(value) = number.as_i64() {
        return Some(i128::from(value));
    }
    number
        .as_f64()
        .filter(|value| value.is_finite() && value.fract() == 0.0)
        .map(|value| value as i128)
}

macro_rules! lenient_integer {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl LenientField for $ty {
                const KIND: &'static str = $kind;

                fn from_number(number: &Number) -> Option<Self> {
                    whole_number(number).and_then(|value| <$ty>::try_from(value).ok())
                }
            }
        )*
    };
}

lenient_integer!(u32 => "u32", u64 => "u64", i32 => "i32");

impl LenientField for f64 {
    const KIND: &'static str = "f64";

    fn from_number(number: &Number) -> Option<Self> {
        number.as_f64()
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: LenientField,
{
    let parsed = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => return Ok(None),
        Some(raw) => {
            let parsed = match &raw {
                Value::Number(number) => T::from_number(number),
                Value::String(text) => text.trim().parse::<T>().ok(),
                _ => None,
            };
            if parsed.is_none() {
                warn!(value = %raw, expected = T::KIND, "failed to parse property field, treating as absent");
            }
            parsed
        }
    };
    Ok(parsed)
}

impl PropertyRecord {
    /// Shorthand for the two fields every statistic depends on.
    pub fn priced(year_built: Option<i32>, price: Option<f64>) -> Self {
        Self {
            year_built,
            price,
            ..Self::default()
        }
    }

    /// Price that passed the validity filter.
    pub fn valid_price(&self) -> Option<f64> {
        self.price.filter(|price| !price.is_nan() && *price > 0.0)
    }

    /// A record is valid when its price is present, not NaN and positive.
    pub fn is_valid(&self) -> bool {
        self.valid_price().is_some()
    }

    /// Valid and carrying a construction year.
    pub fn is_valid_for_trend(&self) -> bool {
        self.year_built.is_some() && self.is_valid()
    }
}

/// Optional predicates used by [`crate::InMemoryPropertyStore::filter`].
///
/// Unset predicates match everything. Price and year bounds are inclusive and
/// exclude records that lack the corresponding field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyFilter {
    pub bedrooms: Option<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
}

impl PropertyFilter {
    /// True when no criterion is set and every record matches.
    pub fn is_unrestricted(&self) -> bool {
        self.bedrooms.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.year_from.is_none()
            && self.year_to.is_none()
    }

    pub fn matches(&self, record: &PropertyRecord) -> bool {
        if let Some(bedrooms) = self.bedrooms {
            if record.bedrooms != Some(bedrooms) {
                return false;
            }
        }

        if self.min_price.is_some() || self.max_price.is_some() {
            let Some(price) = record.price else {
                return false;
            };
            if self.min_price.is_some_and(|min| price < min)
                || self.max_price.is_some_and(|max| price > max)
            {
                return false;
            }
        }

        if self.year_from.is_some() || self.year_to.is_some() {
            let Some(year) = record.year_built else {
                return false;
            };
            if self.year_from.is_some_and(|from| year < from)
                || self.year_to.is_some_and(|to| year > to)
            {
                return false;
            }
        }

        true
    }
}
