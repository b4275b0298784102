//! Workflow state machine gating every action behind its data dependency.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Precondition, StudioError, StudioResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    #[default]
    NoData,
    DataLoaded,
    ModelTrained,
}

impl std::fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData => write!(f, "no-data"),
            Self::DataLoaded => write!(f, "data-loaded"),
            Self::ModelTrained => write!(f, "model-trained"),
        }
    }
}

/// Process-wide phase of the dataset-to-model workflow.
///
/// ```text
/// NoData       --upload--> DataLoaded
/// DataLoaded   --upload--> DataLoaded     (dataset replaced)
/// DataLoaded   --train---> ModelTrained
/// ModelTrained --upload--> DataLoaded     (model invalidated)
/// ModelTrained --train---> ModelTrained   (model replaced)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    phase: WorkflowPhase,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn dataset_loaded(&self) -> bool {
        self.phase != WorkflowPhase::NoData
    }

    pub fn model_trained(&self) -> bool {
        self.phase == WorkflowPhase::ModelTrained
    }

    pub fn require_data_loaded(&self) -> StudioResult<()> {
        if self.dataset_loaded() {
            Ok(())
        } else {
            Err(StudioError::Precondition(Precondition::NoDataset))
        }
    }

    pub fn require_model_trained(&self) -> StudioResult<()> {
        if self.model_trained() {
            Ok(())
        } else {
            Err(StudioError::Precondition(Precondition::NoModel))
        }
    }

    /// A new dataset was accepted; any trained model is now stale.
    pub fn on_upload_success(&mut self) {
        self.transition(WorkflowPhase::DataLoaded);
    }

    pub fn on_train_success(&mut self) -> StudioResult<()> {
        self.require_data_loaded()?;
        self.transition(WorkflowPhase::ModelTrained);
        Ok(())
    }

    fn transition(&mut self, next: WorkflowPhase) {
        info!(from = %self.phase, to = %next, "workflow transition");
        self.phase = next;
    }
}
