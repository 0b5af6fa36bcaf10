use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Candidate property submitted for a what-if valuation.
///
/// The gateway forwards whatever it is given; range checks belong to the
/// caller via [`FeatureSet::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet {
    pub square_footage: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub year_built: f64,
    pub lot_size: f64,
    pub distance_to_city_center: f64,
    pub school_rating: f64,
}

impl FeatureSet {
    pub const SQUARE_FOOTAGE: (f64, f64) = (500.0, 10_000.0);
    pub const BEDROOMS: (f64, f64) = (1.0, 10.0);
    pub const BATHROOMS: (f64, f64) = (1.0, 10.0);
    pub const YEAR_BUILT: (f64, f64) = (1900.0, 2030.0);
    pub const LOT_SIZE: (f64, f64) = (1_000.0, 50_000.0);
    pub const DISTANCE_TO_CITY_CENTER: (f64, f64) = (0.0, 10.0);
    pub const SCHOOL_RATING: (f64, f64) = (1.0, 10.0);

    /// Boundary range check. Reports the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check("square_footage", self.square_footage, Self::SQUARE_FOOTAGE)?;
        check("bedrooms", self.bedrooms, Self::BEDROOMS)?;
        check("bathrooms", self.bathrooms, Self::BATHROOMS)?;
        check("year_built", self.year_built, Self::YEAR_BUILT)?;
        check("lot_size", self.lot_size, Self::LOT_SIZE)?;
        check(
            "distance_to_city_center",
            self.distance_to_city_center,
            Self::DISTANCE_TO_CITY_CENTER,
        )?;
        check("school_rating", self.school_rating, Self::SCHOOL_RATING)
    }
}

fn check(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

/// Price predicted by the external model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub predicted_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

/// Descriptive metadata served by `GET {base}/model-info`.
///
/// Kept in the model's own snake_case schema; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub trained_at: Option<String>,
    #[serde(default)]
    pub n_features: Option<u32>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub performance: Option<ModelPerformance>,
    #[serde(default)]
    pub coefficients: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    #[serde(default)]
    pub r2_score: Option<f64>,
    #[serde(default)]
    pub mse: Option<f64>,
    #[serde(default)]
    pub rmse: Option<f64>,
    #[serde(default)]
    pub mae: Option<f64>,
}
