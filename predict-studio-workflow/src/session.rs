//! The single object holding everything one studio session knows.

use predict_studio_core::{
    BarChartSpec, ChartHandle, ChartSurface, ModelKind, SchemaRegistry, StudioError, StudioResult,
    TrainedModel, WorkflowPhase, WorkflowState,
};
use predict_studio_sdk::{DataSummary, StudioClient};
use tracing::{debug, info};

use crate::analysis::{AnalysisController, AnalysisReport};
use crate::prediction::{BatchResultView, PredictionController, PredictionView};
use crate::status::{StatusBoard, StatusRegion};
use crate::tabs::{Tab, TabBar};
use crate::training::{TrainingController, TrainingForm, TrainingResults};
use crate::upload::{DatasetPreview, DropZone, UploadController};

/// Owns the chart surface and the one chart currently drawn on it.
pub struct ChartSlot {
    surface: Box<dyn ChartSurface + Send>,
    active: Option<(ChartHandle, BarChartSpec)>,
}

impl ChartSlot {
    pub fn new(surface: impl ChartSurface + Send + 'static) -> Self {
        Self {
            surface: Box::new(surface),
            active: None,
        }
    }

    pub fn active(&self) -> Option<&BarChartSpec> {
        self.active.as_ref().map(|(_, spec)| spec)
    }

    pub fn handle(&self) -> Option<ChartHandle> {
        self.active.as_ref().map(|(handle, _)| *handle)
    }

    /// Destroy the current chart, then draw `spec` in its place.
    pub fn replace(&mut self, spec: BarChartSpec) -> ChartHandle {
        self.teardown();
        let handle = self.surface.create(&spec);
        debug!(handle = %handle.0, bars = spec.labels.len(), "chart created");
        self.active = Some((handle, spec));
        handle
    }

    pub fn teardown(&mut self) {
        if let Some((handle, _)) = self.active.take() {
            debug!(handle = %handle.0, "chart destroyed");
            self.surface.destroy(handle);
        }
    }
}

impl std::fmt::Debug for ChartSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartSlot")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

/// Rendered output of every region.
#[derive(Debug, Clone, Default)]
pub struct SessionViews {
    pub preview: Option<DatasetPreview>,
    pub analysis: Option<AnalysisReport>,
    pub summary: Option<DataSummary>,
    pub training: Option<TrainingResults>,
    pub prediction: Option<PredictionView>,
    pub batch: Option<BatchResultView>,
}

/// Workflow state, active dataset schema, trained model and views of one session.
///
/// Every controller borrows the session mutably for the whole of one action,
/// so a second action cannot start before the first has resolved.
#[derive(Debug)]
pub struct SessionContext {
    pub(crate) client: StudioClient,
    pub(crate) state: WorkflowState,
    pub(crate) schema: SchemaRegistry,
    pub(crate) model: Option<TrainedModel>,
    pub(crate) chart: ChartSlot,
    pub(crate) status: StatusBoard,
    pub(crate) tabs: TabBar,
    pub(crate) upload_zone: DropZone,
    pub(crate) batch_zone: DropZone,
    pub(crate) training_form: TrainingForm,
    pub(crate) views: SessionViews,
}

impl SessionContext {
    pub fn new(client: StudioClient, charts: impl ChartSurface + Send + 'static) -> Self {
        Self {
            client,
            state: WorkflowState::new(),
            schema: SchemaRegistry::new(),
            model: None,
            chart: ChartSlot::new(charts),
            status: StatusBoard::new(),
            tabs: TabBar::default(),
            upload_zone: DropZone::default(),
            batch_zone: DropZone::default(),
            training_form: TrainingForm::default(),
            views: SessionViews::default(),
        }
    }

    pub fn uploads(&mut self) -> UploadController<'_> {
        UploadController::new(self)
    }

    pub fn analysis(&mut self) -> AnalysisController<'_> {
        AnalysisController::new(self)
    }

    pub fn training(&mut self) -> TrainingController<'_> {
        TrainingController::new(self)
    }

    pub fn predictions(&mut self) -> PredictionController<'_> {
        PredictionController::new(self)
    }

    pub fn client(&self) -> &StudioClient {
        &self.client
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    pub fn chart(&self) -> &ChartSlot {
        &self.chart
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusBoard {
        &mut self.status
    }

    pub fn views(&self) -> &SessionViews {
        &self.views
    }

    pub fn active_tab(&self) -> Tab {
        self.tabs.active()
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        debug!(%tab, "switching tab");
        self.tabs.switch_tab(tab);
    }

    pub fn upload_zone(&self) -> &DropZone {
        &self.upload_zone
    }

    pub fn upload_zone_mut(&mut self) -> &mut DropZone {
        &mut self.upload_zone
    }

    pub fn batch_zone(&self) -> &DropZone {
        &self.batch_zone
    }

    pub fn batch_zone_mut(&mut self) -> &mut DropZone {
        &mut self.batch_zone
    }

    pub fn training_form(&self) -> &TrainingForm {
        &self.training_form
    }

    pub fn set_model_kind(&mut self, kind: ModelKind) {
        self.training_form.kind = kind;
    }

    pub fn set_test_size(&mut self, test_size: f64) {
        self.training_form.test_size = test_size;
    }

    pub fn select_target(&mut self, column: &str) -> StudioResult<()> {
        self.schema.select_target(column)
    }

    pub fn set_feature_checked(&mut self, column: &str, checked: bool) -> StudioResult<()> {
        self.schema.set_feature_checked(column, checked)
    }

    pub fn set_all_features_checked(&mut self, checked: bool) {
        self.schema.set_all_features_checked(checked);
    }

    /// Check that a dataset is loaded, raising a notice when it is not.
    pub(crate) fn require_data(&mut self) -> StudioResult<()> {
        self.state
            .require_data_loaded()
            .map_err(|e| self.reject(e))
    }

    /// Check that a model is trained, raising a notice when it is not.
    pub(crate) fn require_model(&mut self) -> StudioResult<()> {
        self.state
            .require_model_trained()
            .map_err(|e| self.reject(e))
    }

    /// Surface a locally detected error as a blocking notice.
    pub(crate) fn reject(&mut self, err: StudioError) -> StudioError {
        self.status.alert(err.user_message());
        err
    }

    /// Surface a request failure in `region`, prefixed with `context`.
    pub(crate) fn fail(&mut self, region: StatusRegion, context: &str, err: StudioError) -> StudioError {
        self.status
            .error(region, format!("{}: {}", context, err.user_message()));
        err
    }

    /// Drop the model and everything rendered from it.
    pub(crate) fn invalidate_model(&mut self) {
        if self.model.take().is_some() {
            info!("trained model invalidated by new dataset");
        }
        self.chart.teardown();
        self.schema.clear_prediction_form();
        self.views.analysis = None;
        self.views.summary = None;
        self.views.training = None;
        self.views.prediction = None;
        self.views.batch = None;
        self.status.clear(StatusRegion::Analysis);
        self.status.clear(StatusRegion::Training);
        self.status.clear(StatusRegion::SinglePrediction);
        self.status.clear(StatusRegion::BatchPrediction);
    }
}
