use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::FeatureImportance;
use crate::error::StudioResult;

/// Headroom applied above the largest bar so it never touches the frame.
pub const AXIS_HEADROOM: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

/// Description of a bar chart handed to a chart surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartSpec {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub horizontal: bool,
    pub value_axis: AxisRange,
}

impl BarChartSpec {
    /// Horizontal feature-importance chart, zero-based, capped at 1.1 × the largest weight.
    pub fn feature_importance(importance: &FeatureImportance) -> Self {
        let (labels, values): (Vec<String>, Vec<f64>) = importance.entries().iter().cloned().unzip();
        let max = importance.max_weight().unwrap_or(0.0) * AXIS_HEADROOM;
        Self {
            title: "Feature Importance".to_string(),
            labels,
            values,
            horizontal: true,
            value_axis: AxisRange { min: 0.0, max },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartHandle(pub Uuid);

impl ChartHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChartHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Charting library boundary.
pub trait ChartSurface {
    fn create(&mut self, spec: &BarChartSpec) -> ChartHandle;
    fn destroy(&mut self, handle: ChartHandle);
}

/// Temporary local object backing a download, released once the save starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedObject {
    pub id: Uuid,
    pub mime: String,
    pub len: usize,
}

/// Local save boundary used for downloadable artifacts.
#[async_trait]
pub trait DownloadSink: Send {
    async fn stage(&mut self, bytes: Vec<u8>, mime: &str) -> StudioResult<StagedObject>;
    async fn save_as(&mut self, object: &StagedObject, filename: &str) -> StudioResult<PathBuf>;
    async fn release(&mut self, object: StagedObject);
}
