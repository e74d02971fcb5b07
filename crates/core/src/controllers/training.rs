//! Training controller: fit a model on the current variable selection.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{info, warn};
use rk_protocol::wire_models::{TrainRequest, TrainResponse};
use rk_protocol::workflow_models::{PlotArtifact, TrainedModel, WorkflowAction};

use crate::error::{StateError, WorkflowError, WorkflowResult};
use crate::state::{ModelFit, WorkflowState};
use crate::transport::{Transport, TransportError};

/// Check the training precondition, mark training as in flight and build the
/// request.
///
/// Nothing is sent when the precondition fails.
pub fn begin(state: &mut WorkflowState) -> WorkflowResult<TrainRequest> {
    state.ensure_idle()?;
    if !state.has_dataset() {
        return Err(StateError::NoDataset.into());
    }
    let selection = state.selection().ok_or(StateError::NoSelection)?;
    let request = TrainRequest {
        x_column: selection.x.clone(),
        y_column: selection.y.clone(),
    };

    state.begin(WorkflowAction::Train)?;
    Ok(request)
}

/// Apply the outcome of a training call and clear the busy flag.
///
/// The result is discarded when the selection no longer matches the one the
/// request was built from.
pub fn complete(
    state: &mut WorkflowState,
    request: &TrainRequest,
    outcome: Result<TrainResponse, TransportError>,
) -> WorkflowResult<TrainedModel> {
    state.finish();

    let response = outcome.inspect_err(|e| warn!("training failed: {e}"))?;

    let current = state.selection().ok_or(StateError::StaleResponse)?;
    if current.x != request.x_column || current.y != request.y_column {
        warn!("discarding training result for a superseded selection");
        return Err(StateError::StaleResponse.into());
    }

    let plot = decode_plot(&response.plot_url)?;
    let model = state.set_model(ModelFit {
        slope: response.m,
        intercept: response.c,
        r2: response.r2,
        mse: response.mse,
        plot,
    })?;
    Ok(model.clone())
}

/// Train on the current selection.
pub async fn run(
    state: &mut WorkflowState,
    transport: &dyn Transport,
) -> WorkflowResult<TrainedModel> {
    let request = begin(state)?;
    info!("training {} ~ {}", request.y_column, request.x_column);

    let outcome = transport.train(&request).await;
    complete(state, &request, outcome)
}

/// Decode the service's base64 plot.
///
/// A `data:<mime>;base64,` prefix is tolerated so either a bare payload or a
/// full data URL is accepted.
pub fn decode_plot(encoded: &str) -> Result<PlotArtifact, WorkflowError> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };

    STANDARD
        .decode(payload.trim())
        .map(PlotArtifact::new)
        .map_err(|e| TransportError::Decode(format!("plot is not valid base64: {e}")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use rk_protocol::workflow_models::WorkflowStage;

    // "\x89PNG" base64-encoded
    const PLOT_B64: &str = "iVBORw==";

    fn train_ok(m: f64, c: f64, r2: f64) -> Result<TrainResponse, TransportError> {
        Ok(TrainResponse {
            m,
            c,
            r2,
            mse: Some(1.5),
            plot_url: PLOT_B64.to_string(),
        })
    }

    fn selected_state() -> WorkflowState {
        let mut state = WorkflowState::new();
        state.set_dataset(vec!["age".to_string(), "income".to_string()], "people.csv".to_string());
        state.set_selection("age", "income").unwrap();
        state
    }

    #[tokio::test]
    async fn test_train_success() {
        let transport = MockTransport::new();
        transport.push_train(train_ok(2.5, 10.0, 0.81));
        let mut state = selected_state();

        let model = run(&mut state, &transport).await.unwrap();

        assert_eq!(model.slope, 2.5);
        assert_eq!(model.intercept, 10.0);
        assert_eq!(model.r2, 0.81);
        assert_eq!(model.mse, Some(1.5));
        assert_eq!(model.plot.as_bytes(), b"\x89PNG");
        assert!(state.can_predict());
        assert_eq!(state.stage(), WorkflowStage::ModelTrained);
        assert_eq!(
            transport.trained(),
            vec![TrainRequest {
                x_column: "age".to_string(),
                y_column: "income".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_train_without_selection_sends_nothing() {
        let transport = MockTransport::new();
        let mut state = WorkflowState::new();
        state.set_dataset(vec!["age".to_string(), "income".to_string()], "people.csv".to_string());

        let err = run(&mut state, &transport).await.unwrap_err();

        assert!(matches!(err, WorkflowError::State(StateError::NoSelection)));
        assert_eq!(transport.call_count(), 0);
        assert_eq!(state.stage(), WorkflowStage::DatasetLoaded);
        assert!(state.busy().is_none());
    }

    #[tokio::test]
    async fn test_train_without_dataset_sends_nothing() {
        let transport = MockTransport::new();
        let mut state = WorkflowState::new();

        let err = run(&mut state, &transport).await.unwrap_err();

        assert!(matches!(err, WorkflowError::State(StateError::NoDataset)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_train_service_error_leaves_state_unchanged() {
        let transport = MockTransport::new();
        transport.push_train(Err(TransportError::Service {
            status: 400,
            message: "Invalid columns".to_string(),
        }));
        let mut state = selected_state();

        let err = run(&mut state, &transport).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid columns");
        assert_eq!(state.stage(), WorkflowStage::VariablesSelected);
        assert!(!state.can_predict());
        assert!(state.busy().is_none());
    }

    #[tokio::test]
    async fn test_retrain_failure_keeps_previous_model() {
        let transport = MockTransport::new();
        transport.push_train(train_ok(2.5, 10.0, 0.81));
        transport.push_train(Err(TransportError::Network("connection reset".to_string())));
        let mut state = selected_state();
        run(&mut state, &transport).await.unwrap();

        assert!(run(&mut state, &transport).await.is_err());

        assert_eq!(state.model().unwrap().slope, 2.5);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = WorkflowState::new();
        state.set_dataset(
            vec!["age".to_string(), "income".to_string(), "height".to_string()],
            "people.csv".to_string(),
        );
        state.set_selection("age", "income").unwrap();
        let request = begin(&mut state).unwrap();

        // Simulate a selection change that slipped in while the call was pending.
        state.finish();
        state.set_selection("height", "income").unwrap();
        state.begin(WorkflowAction::Train).unwrap();

        let err = complete(&mut state, &request, train_ok(1.0, 1.0, 1.0)).unwrap_err();

        assert!(matches!(err, WorkflowError::State(StateError::StaleResponse)));
        assert!(!state.can_predict());
        assert!(state.busy().is_none());
    }

    #[tokio::test]
    async fn test_undecodable_plot_is_transport_error() {
        let transport = MockTransport::new();
        transport.push_train(Ok(TrainResponse {
            m: 1.0,
            c: 0.0,
            r2: 1.0,
            mse: None,
            plot_url: "not base64!".to_string(),
        }));
        let mut state = selected_state();

        let err = run(&mut state, &transport).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Transport(TransportError::Decode(_))));
        assert!(!state.can_predict());
    }

    #[test]
    fn test_decode_plot_accepts_data_url() {
        let plot = decode_plot("data:image/png;base64,iVBORw==").unwrap();
        assert_eq!(plot.as_bytes(), b"\x89PNG");
    }

    #[test]
    fn test_begin_checks_busy_before_selection() {
        let mut state = WorkflowState::new();
        state.begin(WorkflowAction::Ingest).unwrap();

        let err = begin(&mut state).unwrap_err();

        assert!(matches!(err, WorkflowError::State(StateError::Busy { .. })));
        assert_eq!(state.busy(), Some(WorkflowAction::Ingest));
    }
}
