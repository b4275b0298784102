//! Dataset-level summary of the active dataset.

use predict_studio_core::{display_value, StudioResult};
use predict_studio_sdk::{AnalysisResponse, DataSummary};
use serde::Serialize;
use tracing::info;

use crate::session::SessionContext;
use crate::status::StatusRegion;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub rows: u64,
    pub cols: u64,
    pub numeric_cols: Vec<String>,
    pub categorical_cols: Vec<String>,
    /// Columns with a strictly positive missing percentage, in server order.
    pub missing: Vec<(String, f64)>,
}

impl AnalysisReport {
    pub fn shape_label(&self) -> String {
        format!("{} × {}", self.rows, self.cols)
    }

    /// `"col: P% missing"` for every reported column.
    pub fn missing_lines(&self) -> Vec<String> {
        self.missing
            .iter()
            .map(|(col, pct)| format!("{}: {}% missing", col, display_value(&serde_json::json!(pct))))
            .collect()
    }
}

impl From<&AnalysisResponse> for AnalysisReport {
    fn from(r: &AnalysisResponse) -> Self {
        Self {
            rows: r.shape.0,
            cols: r.shape.1,
            numeric_cols: r.numeric_cols.clone(),
            categorical_cols: r.categorical_cols.clone(),
            missing: r.missing_percentages(),
        }
    }
}

pub struct AnalysisController<'s> {
    session: &'s mut SessionContext,
}

impl<'s> AnalysisController<'s> {
    pub(crate) fn new(session: &'s mut SessionContext) -> Self {
        Self { session }
    }

    pub async fn analyze(&mut self) -> StudioResult<AnalysisReport> {
        let s = &mut *self.session;
        s.require_data()?;
        s.status.loading(StatusRegion::Analysis, "Analyzing data...");

        let response = match s.client.datasets().analyze().await {
            Ok(response) => response,
            Err(e) => return Err(s.fail(StatusRegion::Analysis, "Error analyzing data", e.into())),
        };

        let report = AnalysisReport::from(&response);
        info!(
            numeric = report.numeric_cols.len(),
            categorical = report.categorical_cols.len(),
            missing = report.missing.len(),
            "dataset analyzed"
        );
        s.status.clear(StatusRegion::Analysis);
        s.views.analysis = Some(report.clone());
        Ok(report)
    }

    /// Column partition of the active dataset, without statistics.
    pub async fn summary(&mut self) -> StudioResult<DataSummary> {
        let s = &mut *self.session;
        s.require_data()?;
        s.status.loading(StatusRegion::Analysis, "Loading summary...");

        let summary = match s.client.datasets().summary().await {
            Ok(summary) => summary,
            Err(e) => return Err(s.fail(StatusRegion::Analysis, "Error analyzing data", e.into())),
        };

        s.status.clear(StatusRegion::Analysis);
        s.views.summary = Some(summary.clone());
        Ok(summary)
    }
}
