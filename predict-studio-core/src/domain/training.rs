use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::ModelKind;

/// Payload sent to one of the training endpoints.
///
/// The model kind is not part of the body: it selects which endpoint is
/// called, see [`ModelKind::training_path`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TrainingRequest {
    #[serde(skip)]
    pub kind: ModelKind,
    #[validate(length(min = 1, message = "target column is required"))]
    pub target_column: String,
    #[validate(length(min = 1, message = "select at least one feature"))]
    pub feature_columns: Vec<String>,
    #[validate(range(
        exclusive_min = 0.0,
        exclusive_max = 1.0,
        message = "test split must be strictly between 0 and 1"
    ))]
    pub test_size: f64,
}

impl TrainingRequest {
    pub fn new(
        kind: ModelKind,
        target_column: impl Into<String>,
        feature_columns: Vec<String>,
        test_size: f64,
    ) -> Self {
        Self {
            kind,
            target_column: target_column.into(),
            feature_columns,
            test_size,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.kind.training_path()
    }
}
