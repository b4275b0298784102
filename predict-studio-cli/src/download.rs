//! Saving downloadable results to disk.

use async_trait::async_trait;
use predict_studio_core::{DownloadSink, StagedObject, StudioError, StudioResult};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

/// Stages payloads in temporary files inside the download directory and
/// copies them to their final name on save.
#[derive(Debug)]
pub struct FileDownloadSink {
    dir: PathBuf,
    staged: HashMap<Uuid, NamedTempFile>,
}

impl FileDownloadSink {
    pub fn new(dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            staged: HashMap::new(),
        })
    }

    /// Number of staged objects not yet released
    pub fn pending(&self) -> usize {
        self.staged.len()
    }
}

fn io_error(action: &str, err: std::io::Error) -> StudioError {
    StudioError::Transport(format!("Could not {}: {}", action, err))
}

#[async_trait]
impl DownloadSink for FileDownloadSink {
    async fn stage(&mut self, bytes: Vec<u8>, mime: &str) -> StudioResult<StagedObject> {
        let mut file = tempfile::Builder::new()
            .prefix(".predict-studio-")
            .suffix(".part")
            .tempfile_in(&self.dir)
            .map_err(|e| io_error("stage download", e))?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .map_err(|e| io_error("stage download", e))?;

        let object = StagedObject {
            id: Uuid::new_v4(),
            mime: mime.to_string(),
            len: bytes.len(),
        };
        debug!(id = %object.id, path = %file.path().display(), "download staged");
        self.staged.insert(object.id, file);
        Ok(object)
    }

    async fn save_as(&mut self, object: &StagedObject, filename: &str) -> StudioResult<PathBuf> {
        let file = self
            .staged
            .get(&object.id)
            .ok_or_else(|| StudioError::Validation(format!("Download {} is not staged", object.id)))?;
        let target = self.dir.join(filename);
        tokio::fs::copy(file.path(), &target)
            .await
            .map_err(|e| io_error(&format!("save {}", target.display()), e))?;
        Ok(target)
    }

    async fn release(&mut self, object: StagedObject) {
        if self.staged.remove(&object.id).is_some() {
            debug!(id = %object.id, pending = self.pending(), "staged download released");
        }
    }
}
