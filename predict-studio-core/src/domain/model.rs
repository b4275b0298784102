use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{StudioError, StudioResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Regression,
    Classification,
}

impl ModelKind {
    /// Training endpoint for this kind of model.
    pub fn training_path(&self) -> &'static str {
        match self {
            Self::Regression => "/train-regression",
            Self::Classification => "/train-classification",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regression => write!(f, "regression"),
            Self::Classification => write!(f, "classification"),
        }
    }
}

impl std::str::FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regression" | "reg" => Ok(Self::Regression),
            "classification" | "clf" => Ok(Self::Classification),
            _ => Err(format!("Unknown model kind: {}", s)),
        }
    }
}

/// Performance metrics; which set is present depends on the model kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelMetrics {
    Regression {
        train_r2: f64,
        test_r2: f64,
        train_rmse: f64,
        test_rmse: f64,
    },
    Classification {
        train_accuracy: f64,
        test_accuracy: f64,
    },
}

impl ModelMetrics {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelMetrics::Regression { .. } => ModelKind::Regression,
            ModelMetrics::Classification { .. } => ModelKind::Classification,
        }
    }
}

/// Per-feature contribution weights, ordered by descending weight.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureImportance {
    entries: Vec<(String, f64)>,
}

impl FeatureImportance {
    /// Build from a name → weight mapping. Weights must be finite and non-negative.
    pub fn from_map(weights: HashMap<String, f64>) -> StudioResult<Self> {
        let mut entries = Vec::with_capacity(weights.len());
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(StudioError::Backend(format!(
                    "feature importance for '{}' must be a non-negative number, got {}",
                    name, weight
                )));
            }
            entries.push((name, weight));
        }
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, w)| *w)
    }

    pub fn max_weight(&self) -> Option<f64> {
        self.entries.iter().map(|(_, w)| *w).reduce(f64::max)
    }
}

/// One held-out row shown next to the model's prediction for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePair {
    pub actual: serde_json::Value,
    pub predicted: serde_json::Value,
}

/// Outcome of the most recent successful training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub kind: ModelKind,
    pub metrics: ModelMetrics,
    pub feature_importance: FeatureImportance,
    pub samples: Vec<SamplePair>,
    pub target_column: String,
    pub feature_columns: Vec<String>,
    /// Dataset the model was trained against.
    pub dataset: String,
    #[serde(default)]
    pub classes: Option<Vec<serde_json::Value>>,
    pub trained_at: DateTime<Utc>,
}

impl TrainedModel {
    pub fn new(metrics: ModelMetrics, feature_importance: FeatureImportance) -> Self {
        Self {
            kind: metrics.kind(),
            metrics,
            feature_importance,
            samples: Vec::new(),
            target_column: String::new(),
            feature_columns: Vec::new(),
            dataset: String::new(),
            classes: None,
            trained_at: Utc::now(),
        }
    }

    /// Pair the first `count` actual/predicted values; extra values on either side are dropped.
    pub fn with_samples(
        mut self,
        count: usize,
        actual: Vec<serde_json::Value>,
        predicted: Vec<serde_json::Value>,
    ) -> Self {
        self.samples = actual
            .into_iter()
            .zip(predicted)
            .take(count)
            .map(|(actual, predicted)| SamplePair { actual, predicted })
            .collect();
        self
    }

    pub fn with_columns(mut self, target: impl Into<String>, features: Vec<String>) -> Self {
        self.target_column = target.into();
        self.feature_columns = features;
        self
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    pub fn with_classes(mut self, classes: Vec<serde_json::Value>) -> Self {
        self.classes = Some(classes);
        self
    }
}

/// Render a JSON scalar the way a browser would print it in a table cell.
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            (None, Some(f)) => format!("{}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
