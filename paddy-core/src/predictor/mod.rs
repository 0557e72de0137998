//! Yield prediction: a regression model over the normalized feature vector.
//!
//! The model is trained once from a static dataset when the process starts and
//! is read-only afterwards.

mod dataset;
mod ridge;

use std::path::Path;

pub use dataset::{TARGET_COLUMN, TrainingSet};
pub use ridge::RidgeRegression;

use crate::error::ModelError;
use crate::feature::FeatureVector;
use crate::normalize::normalize;

/// A trained regression model over normalized inputs.
pub trait YieldModel: Send + Sync {
    fn predict(&self, normalized: &[f64; 8]) -> f64;
}

pub struct Predictor {
    model: Box<dyn YieldModel>,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor").finish_non_exhaustive()
    }
}

impl Predictor {
    pub fn new(model: impl YieldModel + 'static) -> Self {
        Self {
            model: Box::new(model),
        }
    }

    /// Trains the default ridge model from a CSV file on disk.
    pub fn train_from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let data = TrainingSet::from_path(path)?;
        let model = RidgeRegression::fit(&data, RidgeRegression::DEFAULT_ALPHA)?;
        tracing::info!(
            rows = data.len(),
            intercept = model.intercept,
            "yield model trained"
        );
        Ok(Self::new(model))
    }

    /// Predicted yield per hectare; never negative.
    pub fn yield_per_ha(&self, raw: &FeatureVector) -> f64 {
        self.model.predict(&normalize(raw)).max(0.0)
    }

    pub fn total_yield(yield_per_ha: f64, field_size: f64) -> f64 {
        yield_per_ha * field_size
    }
}
