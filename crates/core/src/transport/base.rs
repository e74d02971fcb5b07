//! Base Transport trait and supporting types.

use async_trait::async_trait;
use rk_protocol::wire_models::{
    IngestResponse, PredictRequest, PredictResponse, TrainRequest, TrainResponse,
};
use std::path::Path;
use thiserror::Error;

/// A dataset file ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// File name reported to the service (no directory components).
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a payload from disk, keeping only the final path component as
    /// the file name.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// Failure talking to the statistical service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    ///
    /// `message` is the service's own `error` text when it sent one.
    #[error("{message}")]
    Service { status: u16, message: String },

    /// A success response could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Boundary to the statistical service: issues requests and parses replies,
/// with no workflow logic of its own.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit a dataset file (`POST /upload`).
    async fn ingest(&self, payload: &FilePayload) -> Result<IngestResponse, TransportError>;

    /// Fit a model on the given columns of the loaded dataset (`POST /train`).
    async fn train(&self, request: &TrainRequest) -> Result<TrainResponse, TransportError>;

    /// Predict with the last trained model (`POST /predict`).
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, TransportError>;
}
