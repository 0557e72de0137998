//! Core of the paddy yield service.
//!
//! Raw inputs for a field are gathered from the external providers through the
//! traits in [`sources`], merged by [`aggregate::FieldDataAggregator`], scaled by
//! [`normalize`] and fed to a [`predictor::Predictor`]. [`advisory`] turns the
//! same inputs into a suitability memo and [`schedule`] lays out the
//! cultivation tasks for a planting date.

pub mod advisory;
pub mod aggregate;
pub mod error;
pub mod feature;
pub mod normalize;
pub mod predictor;
pub mod schedule;
pub mod sources;

pub use feature::{Feature, FeatureVector};
