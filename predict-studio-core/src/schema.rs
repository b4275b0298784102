//! Column metadata of the active dataset and the form views derived from it.

use serde::{Deserialize, Serialize};
use serde_json::Map;
use tracing::debug;
use validator::Validate;

use crate::domain::{ColumnType, Dataset, InputValue, ModelKind, TrainingRequest};
use crate::error::{Precondition, StudioError, StudioResult};

/// Message shown when training is attempted without any feature selected.
pub const NO_FEATURES_MESSAGE: &str = "Please select at least one feature";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetSelector {
    pub options: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub column: String,
    pub checked: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureChecklist {
    pub entries: Vec<FeatureEntry>,
}

impl FeatureChecklist {
    pub fn entry(&self, column: &str) -> Option<&FeatureEntry> {
        self.entries.iter().find(|e| e.column == column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Number,
}

/// One input of the single-prediction form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    pub id: String,
    pub label: String,
    pub placeholder: String,
    pub kind: InputKind,
    pub step: String,
    pub column_type: ColumnType,
}

impl InputField {
    fn for_column(column: &str, column_type: ColumnType) -> Self {
        Self {
            name: column.to_string(),
            id: format!("input-{}", column),
            label: column.to_string(),
            placeholder: format!("Enter {}", column),
            kind: InputKind::Number,
            step: "any".to_string(),
            column_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionForm {
    pub fields: Vec<InputField>,
}

impl PredictionForm {
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Single source of truth for the active dataset's columns.
///
/// Every derived view is rebuilt from the dataset it holds, so a new upload
/// never leaves a stale selector, checklist or prediction form behind.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    dataset: Option<Dataset>,
    target: TargetSelector,
    features: FeatureChecklist,
    prediction_form: Option<PredictionForm>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn target_selector(&self) -> &TargetSelector {
        &self.target
    }

    pub fn feature_checklist(&self) -> &FeatureChecklist {
        &self.features
    }

    pub fn prediction_form(&self) -> Option<&PredictionForm> {
        self.prediction_form.as_ref()
    }

    /// Replace the dataset and regenerate the selector and checklist.
    pub fn load(&mut self, dataset: Dataset) {
        debug!(
            filename = %dataset.filename,
            columns = dataset.columns.len(),
            "loading dataset schema"
        );

        self.target = TargetSelector {
            options: dataset.columns.clone(),
            selected: dataset.columns.first().cloned(),
        };
        self.features = FeatureChecklist {
            entries: dataset
                .columns
                .iter()
                .map(|c| FeatureEntry {
                    column: c.clone(),
                    checked: true,
                    disabled: false,
                })
                .collect(),
        };
        self.prediction_form = None;
        self.dataset = Some(dataset);
        self.refresh_disabled();
    }

    /// Change the target column; the matching checklist entry becomes disabled.
    pub fn select_target(&mut self, column: &str) -> StudioResult<()> {
        self.require_column(column)?;
        self.target.selected = Some(column.to_string());
        self.refresh_disabled();
        Ok(())
    }

    pub fn set_feature_checked(&mut self, column: &str, checked: bool) -> StudioResult<()> {
        self.require_column(column)?;
        if let Some(entry) = self.features.entries.iter_mut().find(|e| e.column == column) {
            entry.checked = checked;
        }
        Ok(())
    }

    pub fn set_all_features_checked(&mut self, checked: bool) {
        for entry in &mut self.features.entries {
            entry.checked = checked;
        }
    }

    /// Checked and enabled features, in column order.
    pub fn selected_features(&self) -> Vec<String> {
        self.features
            .entries
            .iter()
            .filter(|e| e.checked && !e.disabled)
            .map(|e| e.column.clone())
            .collect()
    }

    /// Assemble and validate a training request from the current selections.
    pub fn training_request(&self, kind: ModelKind, test_size: f64) -> StudioResult<TrainingRequest> {
        if self.dataset.is_none() {
            return Err(StudioError::Precondition(Precondition::NoDataset));
        }

        let target = self
            .target
            .selected
            .clone()
            .ok_or_else(|| StudioError::Validation("Please select a target column".to_string()))?;

        let features = self.selected_features();
        if features.is_empty() {
            return Err(StudioError::Validation(NO_FEATURES_MESSAGE.to_string()));
        }

        let request = TrainingRequest::new(kind, target, features, test_size);
        request.validate()?;
        Ok(request)
    }

    /// Rebuild the prediction form: one numeric input per column.
    pub fn build_prediction_form(&mut self) -> Option<&PredictionForm> {
        let dataset = self.dataset.as_ref()?;
        let fields = dataset
            .columns
            .iter()
            .map(|c| InputField::for_column(c, dataset.column_type(c)))
            .collect();
        self.prediction_form = Some(PredictionForm { fields });
        self.prediction_form.as_ref()
    }

    pub fn clear_prediction_form(&mut self) {
        self.prediction_form = None;
    }

    /// Decode raw form values into the JSON record sent for prediction.
    ///
    /// Form fields without a supplied value are sent as `null`.
    pub fn decode_inputs(&self, raw: &[(String, String)]) -> StudioResult<Map<String, serde_json::Value>> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or(StudioError::Precondition(Precondition::NoDataset))?;

        let mut record = Map::new();
        for (name, text) in raw {
            if !dataset.contains(name) {
                return Err(StudioError::Validation(format!("Unknown input field: {}", name)));
            }
            let value = InputValue::decode(name, &dataset.column_type(name), text)?;
            record.insert(name.clone(), value.to_json());
        }

        if let Some(form) = &self.prediction_form {
            for name in form.field_names() {
                record
                    .entry(name.to_string())
                    .or_insert(serde_json::Value::Null);
            }
        }

        Ok(record)
    }

    fn require_column(&self, column: &str) -> StudioResult<()> {
        match &self.dataset {
            None => Err(StudioError::Precondition(Precondition::NoDataset)),
            Some(d) if d.contains(column) => Ok(()),
            Some(_) => Err(StudioError::Validation(format!("Unknown column: {}", column))),
        }
    }

    fn refresh_disabled(&mut self) {
        let target = self.target.selected.as_deref();
        for entry in &mut self.features.entries {
            entry.disabled = Some(entry.column.as_str()) == target;
        }
    }
}
