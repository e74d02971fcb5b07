//! Prediction controller: ask the trained model for a single value.
//!
//! Predictions are returned to the caller and never stored.

use log::{info, warn};
use rk_protocol::wire_models::{PredictRequest, PredictResponse, PredictValue};
use rk_protocol::workflow_models::{Prediction, WorkflowAction};

use crate::error::{StateError, ValidationError, WorkflowResult};
use crate::state::WorkflowState;
use crate::transport::{Transport, TransportError};

/// Check the prediction precondition and input, mark prediction as in
/// flight and build the request.
///
/// The input is forwarded exactly as given; only emptiness is checked here.
pub fn begin(state: &mut WorkflowState, value: &str) -> WorkflowResult<PredictRequest> {
    state.ensure_idle()?;
    if !state.can_predict() {
        return Err(StateError::NoModel.into());
    }
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyPredictionInput.into());
    }

    state.begin(WorkflowAction::Predict)?;
    Ok(PredictRequest {
        value: PredictValue::from(value),
    })
}

/// Clear the busy flag and turn the outcome into a [`Prediction`].
pub fn complete(
    state: &mut WorkflowState,
    input: &str,
    outcome: Result<PredictResponse, TransportError>,
) -> WorkflowResult<Prediction> {
    state.finish();

    let response = outcome.inspect_err(|e| warn!("prediction for '{input}' failed: {e}"))?;
    Ok(Prediction {
        input: input.to_string(),
        value: response.prediction,
    })
}

/// Predict at `value` with the current model.
pub async fn run(
    state: &mut WorkflowState,
    transport: &dyn Transport,
    value: &str,
) -> WorkflowResult<Prediction> {
    let request = begin(state, value)?;
    info!("predicting at '{value}'");

    let outcome = transport.predict(&request).await;
    complete(state, value, outcome)
}
