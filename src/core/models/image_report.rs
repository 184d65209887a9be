use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use uuid::Uuid;

use super::AnnotationView;

/// One file picked for annotation.
#[derive(Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn read_from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {:?}", path))?;

        Ok(Self::new(display_name(path), bytes))
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone)]
pub enum ImageOutcome {
    Annotated {
        view: AnnotationView,
        raw_response: Value,
    },
    Failed {
        message: String,
    },
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ImageReport {
    pub job_id: Uuid,
    pub file_name: String,
    pub outcome: ImageOutcome,
}

impl ImageReport {
    pub fn failed(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            file_name: file_name.into(),
            outcome: ImageOutcome::Failed {
                message: message.into(),
            },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ImageOutcome::Failed { .. })
    }
}
