//! Min-max scaling of raw inputs onto `[0, 1]`.

use serde::Serialize;

use crate::feature::{Feature, FeatureVector};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureBounds {
    pub min: f64,
    pub max: f64,
    /// Agronomically optimal range, exposed to the dashboard charts.
    pub optimal: (f64, f64),
}

impl FeatureBounds {
    pub const fn new(min: f64, max: f64, optimal: (f64, f64)) -> Self {
        Self { min, max, optimal }
    }
}

pub fn bounds(feature: Feature) -> FeatureBounds {
    match feature {
        Feature::Ndvi => FeatureBounds::new(0.0, 1.0, (0.6, 0.9)),
        Feature::Tmin => FeatureBounds::new(20.0, 30.0, (22.0, 27.0)),
        Feature::Tmax => FeatureBounds::new(25.0, 40.0, (30.0, 35.0)),
        Feature::Rain => FeatureBounds::new(0.0, 50.0, (5.0, 30.0)),
        Feature::Srad => FeatureBounds::new(0.0, 8.0, (4.0, 6.0)),
        Feature::SoilPh => FeatureBounds::new(4.0, 8.0, (5.5, 7.0)),
        Feature::SoilCec => FeatureBounds::new(5.0, 40.0, (15.0, 30.0)),
        Feature::SoilOc => FeatureBounds::new(0.5, 10.0, (1.0, 5.0)),
    }
}

/// The full bounds table keyed by dataset column name.
pub fn bounds_table() -> Vec<(&'static str, FeatureBounds)> {
    Feature::ALL
        .iter()
        .map(|f| (f.column(), bounds(*f)))
        .collect()
}

pub fn normalize_value(value: f64, bounds: FeatureBounds) -> f64 {
    if bounds.max == bounds.min {
        return 0.5;
    }
    ((value - bounds.min) / (bounds.max - bounds.min)).clamp(0.0, 1.0)
}

pub fn normalize_feature(value: f64, feature: Feature) -> f64 {
    normalize_value(value, bounds(feature))
}

pub fn normalize(raw: &FeatureVector) -> [f64; 8] {
    Feature::ALL.map(|feature| normalize_feature(raw.get(feature), feature))
}
