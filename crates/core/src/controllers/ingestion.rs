//! Ingestion controller: upload a dataset and replace the current one.
//!
//! Always legal (apart from the busy flag). A failure of any kind leaves the
//! previously loaded dataset, selection and model untouched.

use log::{info, warn};
use rk_protocol::wire_models::IngestResponse;
use rk_protocol::workflow_models::{Dataset, WorkflowAction};
use std::path::Path;

use crate::error::{WorkflowError, WorkflowResult};
use crate::state::WorkflowState;
use crate::transport::{FilePayload, Transport};

/// Mark an ingestion as in flight.
pub fn begin(state: &mut WorkflowState) -> WorkflowResult<()> {
    state.begin(WorkflowAction::Ingest)?;
    Ok(())
}

/// Read the dataset file at `path` into an upload payload.
pub async fn read_payload(path: &Path) -> WorkflowResult<FilePayload> {
    FilePayload::read(path)
        .await
        .map_err(|source| WorkflowError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Apply the outcome of an upload and clear the busy flag.
///
/// `file_name` labels the dataset when the service does not supply a label.
pub fn complete(
    state: &mut WorkflowState,
    file_name: &str,
    outcome: WorkflowResult<IngestResponse>,
) -> WorkflowResult<Dataset> {
    state.finish();

    let response = outcome.inspect_err(|e| warn!("ingestion of '{file_name}' failed: {e}"))?;

    if response.columns.is_empty() {
        warn!("'{file_name}' has no columns the service can model");
    }
    let label = if response.label.trim().is_empty() {
        file_name.to_string()
    } else {
        response.label
    };

    Ok(state.set_dataset(response.columns, label).clone())
}

/// Upload `payload` and, on success, make it the current dataset.
pub async fn run(
    state: &mut WorkflowState,
    transport: &dyn Transport,
    payload: &FilePayload,
) -> WorkflowResult<Dataset> {
    begin(state)?;
    info!("uploading '{}'", payload.file_name);

    let outcome = transport.ingest(payload).await.map_err(WorkflowError::from);
    complete(state, &payload.file_name, outcome)
}

/// Read the file at `path`, then upload it as in [`run`].
pub async fn run_file(
    state: &mut WorkflowState,
    transport: &dyn Transport,
    path: &Path,
) -> WorkflowResult<Dataset> {
    state.ensure_idle()?;
    let payload = read_payload(path).await?;
    run(state, transport, &payload).await
}
