//! Test fixtures for datasets, service replies and scripted transports.

use rk_core::transport::{MockTransport, TransportError};
use rk_protocol::wire_models::{IngestResponse, PredictResponse, TrainResponse};
use std::path::PathBuf;
use tempfile::TempDir;

/// The 8-byte PNG signature, base64-encoded.
pub const PLOT_B64: &str = "iVBORw0KGgo=";

/// Create a temporary project directory holding `people.csv`.
///
/// Returns the TempDir (keep it alive for the test duration) and the CSV path.
pub fn create_test_dataset() -> std::io::Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir()?;
    let csv = temp_dir.path().join("people.csv");
    std::fs::write(&csv, "age,income\n25,72.5\n30,85\n40,110\n")?;
    Ok((temp_dir, csv))
}

/// Successful `/upload` reply.
pub fn ingest_ok(columns: &[&str], label: &str) -> Result<IngestResponse, TransportError> {
    Ok(IngestResponse {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        label: label.to_string(),
    })
}

/// Successful `/train` reply with a tiny PNG plot.
pub fn train_ok(m: f64, c: f64, r2: f64) -> Result<TrainResponse, TransportError> {
    Ok(TrainResponse {
        m,
        c,
        r2,
        mse: None,
        plot_url: PLOT_B64.to_string(),
    })
}

/// Successful `/predict` reply.
pub fn predict_ok(prediction: f64) -> Result<PredictResponse, TransportError> {
    Ok(PredictResponse { prediction })
}

/// Error reply as the service sends it for a 400.
pub fn service_error<T>(message: &str) -> Result<T, TransportError> {
    Err(TransportError::Service {
        status: 400,
        message: message.to_string(),
    })
}

/// Transport scripted for one full ingest → train → predict run on
/// `["age", "income"]`.
pub fn happy_path_transport() -> MockTransport {
    let transport = MockTransport::new();
    transport
        .push_ingest(ingest_ok(&["age", "income"], "people.csv"))
        .push_train(train_ok(2.5, 10.0, 0.81))
        .push_predict(predict_ok(85.0));
    transport
}
