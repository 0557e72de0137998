//! The eight model inputs and the raw record that carries them.

use serde::{Deserialize, Serialize};

/// Model input, in the fixed order the regression model is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "NDVI_BOHOR")]
    Ndvi,
    #[serde(rename = "TMIN_All")]
    Tmin,
    #[serde(rename = "TMAX_All")]
    Tmax,
    #[serde(rename = "RAIN1")]
    Rain,
    #[serde(rename = "TotalSRAD")]
    Srad,
    #[serde(rename = "SOIL_pH")]
    SoilPh,
    #[serde(rename = "SOIL_CEC (meq/100)")]
    SoilCec,
    #[serde(rename = "SOIL_OC")]
    SoilOc,
}

impl Feature {
    pub const ALL: [Feature; 8] = [
        Feature::Ndvi,
        Feature::Tmin,
        Feature::Tmax,
        Feature::Rain,
        Feature::Srad,
        Feature::SoilPh,
        Feature::SoilCec,
        Feature::SoilOc,
    ];

    /// Column name in the training dataset.
    pub fn column(&self) -> &'static str {
        match self {
            Feature::Ndvi => "NDVI_BOHOR",
            Feature::Tmin => "TMIN_All",
            Feature::Tmax => "TMAX_All",
            Feature::Rain => "RAIN1",
            Feature::Srad => "TotalSRAD",
            Feature::SoilPh => "SOIL_pH",
            Feature::SoilCec => "SOIL_CEC (meq/100)",
            Feature::SoilOc => "SOIL_OC",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Feature::Ndvi => 0,
            Feature::Tmin => 1,
            Feature::Tmax => 2,
            Feature::Rain => 3,
            Feature::Srad => 4,
            Feature::SoilPh => 5,
            Feature::SoilCec => 6,
            Feature::SoilOc => 7,
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Raw (un-normalized) inputs gathered for one field and planting date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub ndvi: f64,
    pub tmin: f64,
    pub tmax: f64,
    pub rain: f64,
    pub srad: f64,
    pub soil_ph: f64,
    pub soil_cec: f64,
    pub soil_oc: f64,
}

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Ndvi => self.ndvi,
            Feature::Tmin => self.tmin,
            Feature::Tmax => self.tmax,
            Feature::Rain => self.rain,
            Feature::Srad => self.srad,
            Feature::SoilPh => self.soil_ph,
            Feature::SoilCec => self.soil_cec,
            Feature::SoilOc => self.soil_oc,
        }
    }

    pub fn values(&self) -> [f64; 8] {
        Feature::ALL.map(|feature| self.get(feature))
    }

    /// Pairs each value with its feature, keyed by dataset column name.
    pub fn named(&self) -> Vec<(Feature, f64)> {
        Feature::ALL.iter().map(|f| (*f, self.get(*f))).collect()
    }
}
