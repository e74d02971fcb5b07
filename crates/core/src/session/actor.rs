//! The workflow session actor.
//!
//! `WorkflowSession` is the only owner of a [`WorkflowState`]. It receives
//! [`Op`]s from a user interface, runs them through the stage controllers and
//! reports the outcome as [`Event`]s.
//!
//! Network calls run on spawned tasks and report back through an internal
//! channel, so ops keep being received while a call is pending. Those ops are
//! rejected by the busy flag rather than queued.

use log::{debug, info, warn};
use rk_protocol::ipc::{Event, Op};
use rk_protocol::wire_models::{IngestResponse, PredictResponse, TrainRequest, TrainResponse};
use rk_protocol::workflow_models::WorkflowAction;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::controllers::{ingestion, prediction, selection, training};
use crate::error::{StateError, WorkflowError, WorkflowResult};
use crate::state::WorkflowState;
use crate::transport::{Transport, TransportError};

/// Outcome of a spawned network call, fed back into the actor loop.
enum Completion {
    Ingest {
        file_name: String,
        outcome: WorkflowResult<IngestResponse>,
    },
    Train {
        request: TrainRequest,
        outcome: Result<TrainResponse, TransportError>,
    },
    Predict {
        input: String,
        outcome: Result<PredictResponse, TransportError>,
    },
}

/// Single-writer owner of the workflow state.
pub struct WorkflowSession {
    state: WorkflowState,

    /// Connection to the statistical service, shared with in-flight tasks.
    transport: Arc<dyn Transport>,

    /// Channel for sending events to the UI.
    events_tx: mpsc::Sender<Event>,
}

impl WorkflowSession {
    pub fn new(transport: Arc<dyn Transport>, events_tx: mpsc::Sender<Event>) -> Self {
        Self {
            state: WorkflowState::new(),
            transport,
            events_tx,
        }
    }

    /// Spawn the session on the current runtime.
    ///
    /// Returns the op sender and the task handle. The task ends after
    /// `Op::Shutdown` or once every op sender has been dropped.
    pub fn spawn(
        transport: Arc<dyn Transport>,
        events_tx: mpsc::Sender<Event>,
    ) -> (mpsc::UnboundedSender<Op>, JoinHandle<()>) {
        let (op_tx, op_rx) = mpsc::unbounded_channel();
        let session = Self::new(transport, events_tx);
        let handle = tokio::spawn(session.run(op_rx));
        (op_tx, handle)
    }

    /// Process ops until shutdown.
    ///
    /// Calls still in flight at shutdown are abandoned; their results are
    /// dropped.
    pub async fn run(mut self, mut op_rx: mpsc::UnboundedReceiver<Op>) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();

        loop {
            tokio::select! {
                op = op_rx.recv() => match op {
                    Some(Op::Shutdown) | None => break,
                    Some(op) => self.handle_op(op, &done_tx).await,
                },
                Some(done) = done_rx.recv() => self.handle_completion(done).await,
            }
        }

        info!("workflow session stopped");
    }

    async fn handle_op(&mut self, op: Op, done_tx: &mpsc::UnboundedSender<Completion>) {
        debug!("op received: {op:?}");

        match op {
            Op::LoadDataset { path } => self.start_ingest(path, done_tx).await,
            Op::SelectVariables { x, y } => {
                match selection::select(&mut self.state, &x, &y) {
                    Ok(_) => self.emit_snapshot().await,
                    Err(e) => self.fail(WorkflowAction::Select, e).await,
                }
            }
            Op::Train => self.start_train(done_tx).await,
            Op::Predict { value } => self.start_predict(value, done_tx).await,
            Op::SavePlot { path } => {
                if let Err(e) = self.save_plot(&path).await {
                    self.fail(WorkflowAction::SavePlot, e).await;
                }
            }
            Op::GetSnapshot => self.emit_snapshot().await,
            // Handled by the run loop.
            Op::Shutdown => {}
        }
    }

    async fn start_ingest(&mut self, path: PathBuf, done_tx: &mpsc::UnboundedSender<Completion>) {
        if let Err(e) = ingestion::begin(&mut self.state) {
            self.fail(WorkflowAction::Ingest, e).await;
            return;
        }
        self.announce(WorkflowAction::Ingest).await;

        let file_name = display_name(&path);
        let transport = Arc::clone(&self.transport);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let outcome = match ingestion::read_payload(&path).await {
                Ok(payload) => {
                    info!("uploading '{}'", payload.file_name);
                    transport
                        .ingest(&payload)
                        .await
                        .map_err(WorkflowError::from)
                }
                Err(e) => Err(e),
            };
            let _ = done_tx.send(Completion::Ingest { file_name, outcome });
        });
    }

    async fn start_train(&mut self, done_tx: &mpsc::UnboundedSender<Completion>) {
        let request = match training::begin(&mut self.state) {
            Ok(request) => request,
            Err(e) => {
                self.fail(WorkflowAction::Train, e).await;
                return;
            }
        };
        self.announce(WorkflowAction::Train).await;
        info!("training {} ~ {}", request.y_column, request.x_column);

        let transport = Arc::clone(&self.transport);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let outcome = transport.train(&request).await;
            let _ = done_tx.send(Completion::Train { request, outcome });
        });
    }

    async fn start_predict(&mut self, input: String, done_tx: &mpsc::UnboundedSender<Completion>) {
        let request = match prediction::begin(&mut self.state, &input) {
            Ok(request) => request,
            Err(e) => {
                self.fail(WorkflowAction::Predict, e).await;
                return;
            }
        };
        self.announce(WorkflowAction::Predict).await;

        let transport = Arc::clone(&self.transport);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let outcome = transport.predict(&request).await;
            let _ = done_tx.send(Completion::Predict { input, outcome });
        });
    }

    async fn handle_completion(&mut self, done: Completion) {
        match done {
            Completion::Ingest { file_name, outcome } => {
                if let Err(e) = ingestion::complete(&mut self.state, &file_name, outcome) {
                    self.fail(WorkflowAction::Ingest, e).await;
                }
            }
            Completion::Train { request, outcome } => {
                if let Err(e) = training::complete(&mut self.state, &request, outcome) {
                    self.fail(WorkflowAction::Train, e).await;
                }
            }
            Completion::Predict { input, outcome } => {
                match prediction::complete(&mut self.state, &input, outcome) {
                    Ok(prediction) => self.emit(Event::PredictionReady { prediction }).await,
                    Err(e) => self.fail(WorkflowAction::Predict, e).await,
                }
            }
        }

        // The busy flag was cleared whatever the outcome.
        self.emit_snapshot().await;
    }

    async fn save_plot(&mut self, path: &Path) -> WorkflowResult<()> {
        self.state.ensure_idle()?;
        let model = self.state.model().ok_or(StateError::NoModel)?;
        let bytes = model.plot.as_bytes();

        tokio::fs::write(path, bytes)
            .await
            .map_err(|source| WorkflowError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let len = bytes.len();
        info!("plot saved to {} ({len} bytes)", path.display());
        self.emit(Event::PlotSaved {
            path: path.to_path_buf(),
            bytes: len,
        })
        .await;
        Ok(())
    }

    /// Report that `action` is in flight, with the busy snapshot.
    async fn announce(&self, action: WorkflowAction) {
        self.emit(Event::ActionStarted { action }).await;
        self.emit_snapshot().await;
    }

    async fn fail(&self, action: WorkflowAction, error: WorkflowError) {
        warn!("{action} failed: {error}");
        self.emit(Event::ActionFailed {
            action,
            kind: error.kind(),
            message: error.to_string(),
        })
        .await;
    }

    async fn emit_snapshot(&self) {
        self.emit(Event::StateChanged {
            snapshot: self.state.snapshot(),
        })
        .await;
    }

    async fn emit(&self, event: Event) {
        if self.events_tx.send(event).await.is_err() {
            debug!("event receiver dropped");
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
