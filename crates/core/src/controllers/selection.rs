//! Selection controller: choose the variable pair. Purely local.

use rk_protocol::workflow_models::VariableSelection;

use crate::error::{StateError, WorkflowResult};
use crate::state::WorkflowState;

/// Validate and apply a new `(x, y)` selection.
///
/// The caller normally offers only known columns, but the names are checked
/// again here. Validation errors from the state are returned unchanged.
pub fn select(state: &mut WorkflowState, x: &str, y: &str) -> WorkflowResult<VariableSelection> {
    state.ensure_idle()?;
    if !state.has_dataset() {
        return Err(StateError::NoDataset.into());
    }

    state.set_selection(x, y)?;
    state
        .selection()
        .cloned()
        .ok_or_else(|| StateError::NoSelection.into())
}
