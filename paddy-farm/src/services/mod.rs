//! Request-independent operations behind the HTTP routes.
//!
//! Account, template and task-step operations only touch the database and are
//! plain functions. Planting sessions also need the external sources and the
//! trained model, so they hang off [`Farm`].

pub mod accounts;
pub mod sessions;
pub mod steps;
pub mod templates;

#[cfg(test)]
pub(crate) mod fixtures;

use paddy::aggregate::FieldDataAggregator;
use paddy::predictor::Predictor;
use sea_orm::DatabaseConnection;

pub struct Farm<W, S, E> {
    pub db: DatabaseConnection,
    pub sources: FieldDataAggregator<W, S, E>,
    /// `None` when training failed at startup; session creation is refused.
    pub predictor: Option<Predictor>,
}

impl<W, S, E> Farm<W, S, E> {
    pub fn new(
        db: DatabaseConnection,
        sources: FieldDataAggregator<W, S, E>,
        predictor: Option<Predictor>,
    ) -> Self {
        Self {
            db,
            sources,
            predictor,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.predictor.is_some()
    }
}

/// Trims a required text field, rejecting blanks.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String, crate::FarmError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(crate::FarmError::Invalid(field, "must not be empty".to_string()));
    }
    Ok(value.to_string())
}

/// Blank optional text is stored as NULL.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<f64, crate::FarmError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(crate::FarmError::Invalid(field, format!("{value} is not a positive number")))
    }
}
