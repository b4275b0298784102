use async_trait::async_trait;
use pretty_assertions::assert_eq;
use predict_studio_core::{
    BarChartSpec, ChartHandle, ChartSurface, DownloadSink, ModelKind, Precondition, StagedObject,
    StudioError, StudioResult, WorkflowPhase,
};
use predict_studio_sdk::{SdkConfig, StudioClient};
use predict_studio_workflow::*;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ===== Fakes =====

#[derive(Debug, Clone, PartialEq)]
enum ChartEvent {
    Created(ChartHandle, usize),
    Destroyed(ChartHandle),
}

#[derive(Debug, Clone, Default)]
struct RecordingChart {
    events: Arc<Mutex<Vec<ChartEvent>>>,
}

impl RecordingChart {
    fn events(&self) -> Vec<ChartEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ChartSurface for RecordingChart {
    fn create(&mut self, spec: &BarChartSpec) -> ChartHandle {
        let handle = ChartHandle::new();
        self.events
            .lock()
            .unwrap()
            .push(ChartEvent::Created(handle, spec.labels.len()));
        handle
    }

    fn destroy(&mut self, handle: ChartHandle) {
        self.events.lock().unwrap().push(ChartEvent::Destroyed(handle));
    }
}

#[derive(Debug, Default)]
struct MemorySink {
    events: Vec<String>,
    staged: HashMap<Uuid, Vec<u8>>,
    saved: HashMap<String, Vec<u8>>,
    fail_save: bool,
}

#[async_trait]
impl DownloadSink for MemorySink {
    async fn stage(&mut self, bytes: Vec<u8>, mime: &str) -> StudioResult<StagedObject> {
        let object = StagedObject {
            id: Uuid::new_v4(),
            mime: mime.to_string(),
            len: bytes.len(),
        };
        self.staged.insert(object.id, bytes);
        self.events.push(format!("stage {}", mime));
        Ok(object)
    }

    async fn save_as(&mut self, object: &StagedObject, filename: &str) -> StudioResult<PathBuf> {
        self.events.push(format!("save {}", filename));
        if self.fail_save {
            return Err(StudioError::Transport("disk full".to_string()));
        }
        let bytes = self.staged.get(&object.id).cloned().unwrap_or_default();
        self.saved.insert(filename.to_string(), bytes);
        Ok(PathBuf::from(filename))
    }

    async fn release(&mut self, object: StagedObject) {
        self.staged.remove(&object.id);
        self.events.push("release".to_string());
    }
}

// ===== Setup Helpers =====

fn session_for(server: &MockServer) -> (SessionContext, RecordingChart) {
    let client = StudioClient::new(SdkConfig::new(server.uri())).unwrap();
    let chart = RecordingChart::default();
    (SessionContext::new(client, chart.clone()), chart)
}

fn upload_body() -> serde_json::Value {
    json!({
        "filename": "data.csv",
        "shape": [10, 3],
        "rows": 10,
        "columns": ["a", "b", "c"],
        "dtypes": {"a": "float64", "b": "int64", "c": "object"},
        "null_counts": {"a": 0, "b": 1, "c": 0},
        "head": "<table>head</table>",
        "statistics": "<table>stats</table>"
    })
}

fn regression_body() -> serde_json::Value {
    json!({
        "status": "success",
        "train_r2": 0.8,
        "test_r2": 0.75,
        "train_rmse": 1.234,
        "test_rmse": 1.5,
        "feature_importance": {"a": 0.5, "b": 0.3, "c": 0.2},
        "samples": 2,
        "actual": [1, 2],
        "predicted": [1.1, 1.9]
    })
}

async fn mount_upload(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upload_body()))
        .mount(server)
        .await;
}

async fn mount_regression(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/train-regression"))
        .respond_with(ResponseTemplate::new(200).set_body_json(regression_body()))
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

async fn trained_session(server: &MockServer) -> (SessionContext, RecordingChart) {
    mount_upload(server).await;
    mount_regression(server).await;
    let (mut session, chart) = session_for(server);
    session
        .uploads()
        .upload(&SelectedFile::new("data.csv", "a,b,c\n"))
        .await
        .unwrap();
    session.training().train().await.unwrap();
    (session, chart)
}

// ===== Precondition Gates =====

#[tokio::test]
async fn test_predict_without_model_makes_no_request() {
    let server = MockServer::start().await;
    let (mut session, _) = session_for(&server);

    let err = session
        .predictions()
        .predict_single(&[("a".to_string(), "1".to_string())])
        .await
        .unwrap_err();
    assert_eq!(err, StudioError::Precondition(Precondition::NoModel));
    assert_eq!(session.status().last_alert(), Some("Please train a model first"));

    session
        .predictions()
        .select_batch_file(vec![SelectedFile::new("batch.csv", "a\n1\n")]);
    let err = session.predictions().predict_batch().await.unwrap_err();
    assert_eq!(err, StudioError::Precondition(Precondition::NoModel));

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_analyze_and_train_without_data_make_no_request() {
    let server = MockServer::start().await;
    let (mut session, _) = session_for(&server);

    let err = session.analysis().analyze().await.unwrap_err();
    assert_eq!(err, StudioError::Precondition(Precondition::NoDataset));
    assert_eq!(session.status().last_alert(), Some("Please upload a file first"));

    let err = session.training().train().await.unwrap_err();
    assert_eq!(err, StudioError::Precondition(Precondition::NoDataset));

    assert!(session.analysis().summary().await.is_err());
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_train_with_no_features_makes_no_training_request() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    let (mut session, _) = session_for(&server);
    session
        .uploads()
        .upload(&SelectedFile::new("data.csv", "a,b,c\n"))
        .await
        .unwrap();

    session.set_all_features_checked(false);
    let err = session.training().train().await.unwrap_err();

    assert!(matches!(err, StudioError::Validation(_)));
    assert_eq!(
        session.status().last_alert(),
        Some("Please select at least one feature")
    );
    assert_eq!(request_count(&server).await, 1);
    assert!(session.status().get(StatusRegion::Training).is_none());
}

// ===== Upload =====

#[tokio::test]
async fn test_upload_populates_schema_views() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    let (mut session, _) = session_for(&server);

    let preview = session
        .uploads()
        .upload(&SelectedFile::new("data.csv", "a,b,c\n"))
        .await
        .unwrap();

    assert_eq!(session.phase(), WorkflowPhase::DataLoaded);
    assert_eq!(session.schema().target_selector().options.len(), 3);
    let checklist = &session.schema().feature_checklist().entries;
    assert_eq!(checklist.len(), 3);
    assert!(checklist.iter().all(|e| e.checked));
    assert!(session.schema().prediction_form().is_none());

    assert_eq!(preview.shape, "10 rows × 3 cols");
    assert_eq!(preview.column_count, 3);
    assert_eq!(preview.dtypes, vec!["a: float64", "b: int64", "c: object"]);
    assert_eq!(preview.missing, vec!["b: 1 missing"]);
    assert_eq!(
        session.status().get(StatusRegion::Upload).unwrap().text,
        "File uploaded successfully!"
    );
}

#[tokio::test]
async fn test_failed_upload_keeps_previous_dataset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upload_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Please upload a CSV file"})),
        )
        .mount(&server)
        .await;
    let (mut session, _) = session_for(&server);

    session
        .uploads()
        .upload(&SelectedFile::new("data.csv", "a,b,c\n"))
        .await
        .unwrap();
    let err = session
        .uploads()
        .upload(&SelectedFile::new("notes.txt", "hello"))
        .await
        .unwrap_err();

    assert_eq!(err, StudioError::Transport("Please upload a CSV file".to_string()));
    let status = session.status().get(StatusRegion::Upload).unwrap();
    assert_eq!(status.level, StatusLevel::Error);
    assert_eq!(status.text, "Error uploading file: Please upload a CSV file");
    assert_eq!(session.schema().dataset().unwrap().filename, "data.csv");
    assert_eq!(session.phase(), WorkflowPhase::DataLoaded);
}

#[tokio::test]
async fn test_drop_submits_only_first_file() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    let (mut session, _) = session_for(&server);

    session.upload_zone_mut().drag_over();
    let preview = session
        .uploads()
        .drop_files(vec![
            SelectedFile::new("data.csv", "a,b,c\n"),
            SelectedFile::new("other.csv", "x\n"),
        ])
        .await
        .unwrap();

    assert!(preview.is_some());
    assert!(!session.upload_zone().is_drag_active());
    assert_eq!(session.upload_zone().selection().files().len(), 2);
    assert_eq!(request_count(&server).await, 1);

    let nothing = session.uploads().browse(Vec::new()).await.unwrap();
    assert!(nothing.is_none());
    assert_eq!(request_count(&server).await, 1);
}

// ===== Analysis =====

#[tokio::test]
async fn test_analysis_reports_only_missing_columns() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shape": [10, 3],
            "columns": ["a", "b", "c"],
            "null_percentage": {"a": 0.0, "b": 10.0, "c": 0.0},
            "numeric_cols": ["a", "b"],
            "categorical_cols": ["c"]
        })))
        .mount(&server)
        .await;
    let (mut session, _) = session_for(&server);
    session
        .uploads()
        .upload(&SelectedFile::new("data.csv", "a,b,c\n"))
        .await
        .unwrap();

    let report = session.analysis().analyze().await.unwrap();

    assert_eq!(report.shape_label(), "10 × 3");
    assert_eq!(report.missing_lines(), vec!["b: 10% missing"]);
    assert_eq!(report.categorical_cols, vec!["c"]);
    assert!(session.views().analysis.is_some());
}

// ===== Training =====

#[tokio::test]
async fn test_regression_training_renders_every_view() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    Mock::given(method("POST"))
        .and(path("/train-regression"))
        .and(body_json(json!({
            "target_column": "a",
            "feature_columns": ["b", "c"],
            "test_size": 0.2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(regression_body()))
        .expect(1)
        .mount(&server)
        .await;
    let (mut session, chart) = session_for(&server);
    session
        .uploads()
        .upload(&SelectedFile::new("data.csv", "a,b,c\n"))
        .await
        .unwrap();

    let results = session.training().train().await.unwrap();

    assert_eq!(results.metric("Test R² Score"), Some("0.7500"));
    assert_eq!(results.metrics.len(), 4);
    let axis_max = results.chart.as_ref().unwrap().value_axis.max;
    assert!((axis_max - 0.55).abs() < 1e-9);
    assert_eq!(results.predictions.rows.len(), 2);
    assert_eq!(results.steps, PostTrainingStep::SEQUENCE.to_vec());

    assert_eq!(session.phase(), WorkflowPhase::ModelTrained);
    assert_eq!(session.model().unwrap().dataset, "data.csv");
    assert_eq!(session.schema().prediction_form().unwrap().fields.len(), 3);
    assert_eq!(chart.events().len(), 1);
    assert_eq!(
        session.status().get(StatusRegion::Training).unwrap().text,
        "Model trained successfully!"
    );
}

#[tokio::test]
async fn test_classification_uses_its_own_endpoint() {
    let server = MockServer::start().await;
    mount_upload(&server).await;
    Mock::given(method("POST"))
        .and(path("/train-classification"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "train_accuracy": 0.95,
            "test_accuracy": 0.9,
            "feature_importance": {"b": 0.6, "c": 0.4},
            "samples": 1,
            "actual": ["yes"],
            "predicted": ["no"]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (mut session, _) = session_for(&server);
    session
        .uploads()
        .upload(&SelectedFile::new("data.csv", "a,b,c\n"))
        .await
        .unwrap();
    session.set_model_kind(ModelKind::Classification);

    let results = session.training().train().await.unwrap();

    assert_eq!(results.metric("Test Accuracy"), Some("90.00%"));
    assert_eq!(results.metrics.len(), 2);
    assert_eq!(results.predictions.rows[0].actual, "yes");
}

#[tokio::test]
async fn test_retraining_destroys_previous_chart_first() {
    let server = MockServer::start().await;
    let (mut session, chart) = trained_session(&server).await;

    session.training().train().await.unwrap();

    let events = chart.events();
    assert_eq!(events.len(), 3);
    let first = match &events[0] {
        ChartEvent::Created(handle, bars) => {
            assert_eq!(*bars, 3);
            *handle
        }
        other => panic!("unexpected event: {:?}", other),
    };
    assert_eq!(events[1], ChartEvent::Destroyed(first));
    assert!(matches!(events[2], ChartEvent::Created(h, _) if h != first));
    assert_eq!(session.chart().handle(), match events[2] {
        ChartEvent::Created(h, _) => Some(h),
        _ => None,
    });
}

#[tokio::test]
async fn test_failed_training_keeps_previous_model() {
    let server = MockServer::start().await;
    let (mut session, _) = trained_session(&server).await;
    let before = session.model().cloned();

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/train-regression"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Target column has NaN"})),
        )
        .mount(&server)
        .await;

    let err = session.training().train().await.unwrap_err();

    assert_eq!(err.user_message(), "Target column has NaN");
    assert_eq!(session.model().cloned(), before);
    assert!(session.views().training.is_some());
    assert_eq!(
        session.status().get(StatusRegion::Training).unwrap().text,
        "Error training model: Target column has NaN"
    );
}

#[tokio::test]
async fn test_new_upload_invalidates_trained_model() {
    let server = MockServer::start().await;
    let (mut session, chart) = trained_session(&server).await;

    session
        .uploads()
        .upload(&SelectedFile::new("data.csv", "a,b,c\n"))
        .await
        .unwrap();

    assert_eq!(session.phase(), WorkflowPhase::DataLoaded);
    assert!(session.model().is_none());
    assert!(session.chart().active().is_none());
    assert!(session.schema().prediction_form().is_none());
    assert!(matches!(chart.events().last(), Some(ChartEvent::Destroyed(_))));

    let err = session.predictions().predict_single(&[]).await.unwrap_err();
    assert_eq!(err, StudioError::Precondition(Precondition::NoModel));
}

// ===== Predictions =====

#[tokio::test]
async fn test_single_prediction_sends_typed_record() {
    let server = MockServer::start().await;
    let (mut session, _) = trained_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({"data": {"a": 1.5, "b": null, "c": "red"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "prediction": 12.345678,
            "probability": null,
            "model_type": "regression"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let view = session
        .predictions()
        .predict_single(&[
            ("a".to_string(), "1.5".to_string()),
            ("c".to_string(), "red".to_string()),
        ])
        .await
        .unwrap();

    assert_eq!(
        view,
        PredictionView::Regression {
            value: "12.3457".to_string()
        }
    );
}

#[tokio::test]
async fn test_single_prediction_rejects_text_for_numeric_column() {
    let server = MockServer::start().await;
    let (mut session, _) = trained_session(&server).await;
    let before = request_count(&server).await;

    let err = session
        .predictions()
        .predict_single(&[("b".to_string(), "lots".to_string())])
        .await
        .unwrap_err();

    assert!(matches!(err, StudioError::Validation(_)));
    assert_eq!(request_count(&server).await, before);
}

#[tokio::test]
async fn test_classification_prediction_bars() {
    let server = MockServer::start().await;
    let (mut session, _) = trained_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_type": "classification",
            "prediction": "yes",
            "probability": [0.3, 0.7]
        })))
        .mount(&server)
        .await;

    let view = session.predictions().predict_single(&[]).await.unwrap();

    match view {
        PredictionView::Classification { label, bars } => {
            assert_eq!(label, "yes");
            let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
            assert_eq!(labels, vec!["Class 0: 30.00%", "Class 1: 70.00%"]);
            assert!((bars[0].width_percent - 30.0).abs() < 1e-9);
            assert!((bars[1].width_percent - 70.0).abs() < 1e-9);
        }
        other => panic!("unexpected view: {:?}", other),
    }
}

#[tokio::test]
async fn test_prediction_error_goes_to_its_region() {
    let server = MockServer::start().await;
    let (mut session, _) = trained_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    assert!(session.predictions().predict_single(&[]).await.is_err());
    assert_eq!(
        session.status().get(StatusRegion::SinglePrediction).unwrap().text,
        "Error: Request failed with status code 500"
    );
}

#[tokio::test]
async fn test_batch_without_file_is_validation_error() {
    let server = MockServer::start().await;
    let (mut session, _) = trained_session(&server).await;
    let before = request_count(&server).await;

    let err = session.predictions().predict_batch().await.unwrap_err();

    assert_eq!(
        err,
        StudioError::Validation("Please select a file for batch prediction".to_string())
    );
    assert_eq!(
        session.status().last_alert(),
        Some("Please select a file for batch prediction")
    );
    assert_eq!(request_count(&server).await, before);
}

#[tokio::test]
async fn test_batch_prediction_offers_csv_download() {
    let server = MockServer::start().await;
    let (mut session, _) = trained_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/batch-predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 5,
            "csv": "a,b\n1,2\n"
        })))
        .mount(&server)
        .await;

    session.batch_zone_mut().drag_over();
    session
        .batch_zone_mut()
        .drop(vec![SelectedFile::new("batch.csv", "a,b,c\n1,2,x\n")]);
    let view = session.predictions().predict_batch().await.unwrap();

    assert_eq!(view.count, 5);
    assert_eq!(view.offer.filename, "predictions.csv");

    let mut sink = MemorySink::default();
    let saved = session.predictions().download(&mut sink).await.unwrap();

    assert_eq!(saved, PathBuf::from("predictions.csv"));
    assert_eq!(sink.saved["predictions.csv"], b"a,b\n1,2\n".to_vec());
    assert_eq!(
        sink.events,
        vec!["stage text/csv", "save predictions.csv", "release"]
    );
    assert!(sink.staged.is_empty());
}

#[tokio::test]
async fn test_download_releases_even_when_save_fails() {
    let mut sink = MemorySink {
        fail_save: true,
        ..Default::default()
    };

    let result = download(&DownloadOffer::csv("x\n"), &mut sink).await;

    assert!(result.is_err());
    assert_eq!(sink.events.last().map(String::as_str), Some("release"));
    assert!(sink.staged.is_empty());
}

// ===== Tabs =====

#[tokio::test]
async fn test_switch_tab_is_explicit() {
    let server = MockServer::start().await;
    let (mut session, _) = session_for(&server);
    assert_eq!(session.active_tab(), Tab::Upload);
    session.switch_tab(Tab::Prediction);
    assert_eq!(session.active_tab(), Tab::Prediction);
}
