//! Scripted transport for tests and offline demos.

use crate::transport::base::{FilePayload, Transport, TransportError};
use async_trait::async_trait;
use rk_protocol::wire_models::{
    IngestResponse, PredictRequest, PredictResponse, TrainRequest, TrainResponse,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

#[derive(Default)]
struct Script {
    ingest: VecDeque<Result<IngestResponse, TransportError>>,
    train: VecDeque<Result<TrainResponse, TransportError>>,
    predict: VecDeque<Result<PredictResponse, TransportError>>,
    ingested: Vec<FilePayload>,
    trained: Vec<TrainRequest>,
    predicted: Vec<PredictRequest>,
}

/// Transport that replays queued responses and records every request.
///
/// Each endpoint has its own FIFO queue. A call with nothing queued fails
/// with a network error, so a test that forgets to script a reply fails
/// loudly instead of hanging.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<Script>>,
    gate: Option<Arc<Notify>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every call until `gate` is notified once per call.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn push_ingest(&self, response: Result<IngestResponse, TransportError>) -> &Self {
        self.lock().ingest.push_back(response);
        self
    }

    pub fn push_train(&self, response: Result<TrainResponse, TransportError>) -> &Self {
        self.lock().train.push_back(response);
        self
    }

    pub fn push_predict(&self, response: Result<PredictResponse, TransportError>) -> &Self {
        self.lock().predict.push_back(response);
        self
    }

    /// Payloads received by `ingest`, in call order.
    pub fn ingested(&self) -> Vec<FilePayload> {
        self.lock().ingested.clone()
    }

    /// Requests received by `train`, in call order.
    pub fn trained(&self) -> Vec<TrainRequest> {
        self.lock().trained.clone()
    }

    /// Requests received by `predict`, in call order.
    pub fn predicted(&self) -> Vec<PredictRequest> {
        self.lock().predicted.clone()
    }

    /// Total number of requests across all endpoints.
    pub fn call_count(&self) -> usize {
        let script = self.lock();
        script.ingested.len() + script.trained.len() + script.predicted.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        // A poisoned script only means another test thread panicked mid-push.
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

fn unscripted(endpoint: &str) -> TransportError {
    TransportError::Network(format!("no scripted response for {endpoint}"))
}

#[async_trait]
impl Transport for MockTransport {
    async fn ingest(&self, payload: &FilePayload) -> Result<IngestResponse, TransportError> {
        let next = {
            let mut script = self.lock();
            script.ingested.push(payload.clone());
            script.ingest.pop_front()
        };
        self.wait_for_gate().await;
        next.unwrap_or_else(|| Err(unscripted("/upload")))
    }

    async fn train(&self, request: &TrainRequest) -> Result<TrainResponse, TransportError> {
        let next = {
            let mut script = self.lock();
            script.trained.push(request.clone());
            script.train.pop_front()
        };
        self.wait_for_gate().await;
        next.unwrap_or_else(|| Err(unscripted("/train")))
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, TransportError> {
        let next = {
            let mut script = self.lock();
            script.predicted.push(request.clone());
            script.predict.pop_front()
        };
        self.wait_for_gate().await;
        next.unwrap_or_else(|| Err(unscripted("/predict")))
    }
}
