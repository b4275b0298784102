//! SDK resource modules
//!
//! This module contains resource-specific clients for the service's
//! dataset, training and prediction endpoints.

pub mod datasets;
pub mod training;
pub mod predictions;

pub use datasets::DatasetsClient;
pub use training::TrainingClient;
pub use predictions::PredictionsClient;
