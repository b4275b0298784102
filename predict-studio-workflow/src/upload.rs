//! Dataset ingestion through a file picker or a drop zone.

use predict_studio_core::{Dataset, StudioError, StudioResult};
use serde::Serialize;
use tracing::info;

pub use predict_studio_sdk::UploadFile as SelectedFile;

use crate::session::SessionContext;
use crate::status::StatusRegion;

/// Ordered files currently held by a file input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<SelectedFile>,
}

impl FileSelection {
    pub fn replace(&mut self, files: Vec<SelectedFile>) {
        self.files = files;
    }

    pub fn first(&self) -> Option<&SelectedFile> {
        self.files.first()
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }
}

/// Drop target with a "drag active" affordance and the file input behind it.
#[derive(Debug, Clone, Default)]
pub struct DropZone {
    drag_active: bool,
    selection: FileSelection,
}

impl DropZone {
    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    /// Returns `true` only when the affordance actually turned on.
    pub fn drag_over(&mut self) -> bool {
        !std::mem::replace(&mut self.drag_active, true)
    }

    /// Returns `true` only when the affordance actually turned off.
    pub fn drag_leave(&mut self) -> bool {
        std::mem::replace(&mut self.drag_active, false)
    }

    /// Accept dropped files into the selection and return the one to submit.
    ///
    /// An empty drop clears the affordance but keeps the previous selection.
    pub fn drop(&mut self, files: Vec<SelectedFile>) -> Option<&SelectedFile> {
        self.drag_active = false;
        if files.is_empty() {
            return None;
        }
        self.selection.replace(files);
        self.selection.first()
    }

    /// Files chosen through the picker.
    pub fn select(&mut self, files: Vec<SelectedFile>) -> Option<&SelectedFile> {
        if files.is_empty() {
            return None;
        }
        self.selection.replace(files);
        self.selection.first()
    }
}

/// Summary of a freshly uploaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetPreview {
    pub filename: String,
    pub shape: String,
    pub rows: u64,
    pub column_count: usize,
    /// `"col: dtype"`, in column order.
    pub dtypes: Vec<String>,
    /// `"col: N missing"` for every column with missing values.
    pub missing: Vec<String>,
    pub head: String,
    pub statistics: String,
}

impl DatasetPreview {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let dtypes = dataset
            .columns
            .iter()
            .filter_map(|c| dataset.dtypes.get(c).map(|t| format!("{}: {}", c, t)))
            .collect();
        let missing = dataset
            .missing_columns()
            .into_iter()
            .map(|(c, n)| format!("{}: {} missing", c, n))
            .collect();

        Self {
            filename: dataset.filename.clone(),
            shape: dataset.shape_label(),
            rows: dataset.rows,
            column_count: dataset.column_count(),
            dtypes,
            missing,
            head: dataset.head.clone(),
            statistics: dataset.statistics.clone(),
        }
    }
}

pub struct UploadController<'s> {
    session: &'s mut SessionContext,
}

impl<'s> UploadController<'s> {
    pub(crate) fn new(session: &'s mut SessionContext) -> Self {
        Self { session }
    }

    /// Submit one file; on failure the previous dataset stays active.
    pub async fn upload(&mut self, file: &SelectedFile) -> StudioResult<DatasetPreview> {
        let s = &mut *self.session;
        s.status.loading(StatusRegion::Upload, "Uploading file...");

        let response = match s.client.datasets().upload(file).await {
            Ok(response) => response,
            Err(e) => return Err(s.fail(StatusRegion::Upload, "Error uploading file", e.into())),
        };

        let dataset: Dataset = response.into();
        let preview = DatasetPreview::from_dataset(&dataset);
        info!(
            filename = %dataset.filename,
            rows = dataset.rows,
            columns = dataset.column_count(),
            "dataset uploaded"
        );

        s.schema.load(dataset);
        s.state.on_upload_success();
        s.invalidate_model();
        s.views.preview = Some(preview.clone());
        s.status
            .success(StatusRegion::Upload, "File uploaded successfully!");

        Ok(preview)
    }

    /// Files chosen with the picker; only the first is submitted.
    pub async fn browse(&mut self, files: Vec<SelectedFile>) -> StudioResult<Option<DatasetPreview>> {
        let first = self.session.upload_zone.select(files).cloned();
        self.submit(first).await
    }

    /// Files dropped on the upload zone; only the first is submitted.
    pub async fn drop_files(&mut self, files: Vec<SelectedFile>) -> StudioResult<Option<DatasetPreview>> {
        let first = self.session.upload_zone.drop(files).cloned();
        self.submit(first).await
    }

    /// Read `path` from disk and upload it.
    pub async fn upload_path(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> StudioResult<DatasetPreview> {
        let file = match SelectedFile::from_path(path).await {
            Ok(file) => file,
            Err(e) => {
                let err: StudioError = e.into();
                return Err(self.session.fail(StatusRegion::Upload, "Error uploading file", err));
            }
        };
        self.session.upload_zone.select(vec![file.clone()]);
        self.upload(&file).await
    }

    async fn submit(&mut self, file: Option<SelectedFile>) -> StudioResult<Option<DatasetPreview>> {
        match file {
            Some(file) => self.upload(&file).await.map(Some),
            None => Ok(None),
        }
    }
}
