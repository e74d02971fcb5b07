//! Custom assertion helpers for integration tests.

use rk_core::state::WorkflowState;
use rk_protocol::ipc::{Event, FailureKind};
use rk_protocol::workflow_models::{WorkflowAction, WorkflowSnapshot};

/// Assert that the state holds a dataset with exactly `columns`.
pub fn assert_columns(state: &WorkflowState, columns: &[&str]) {
    let dataset = state.dataset().expect("a dataset should be loaded");
    assert_eq!(dataset.columns, columns, "unexpected dataset columns");
}

/// Assert that the state has the given selection.
pub fn assert_selection(state: &WorkflowState, x: &str, y: &str) {
    let selection = state.selection().expect("a selection should be set");
    assert_eq!((selection.x.as_str(), selection.y.as_str()), (x, y));
}

/// Find the first `ActionFailed` event for `action`.
pub fn find_failure(events: &[Event], action: WorkflowAction) -> Option<(FailureKind, String)> {
    events.iter().find_map(|e| match e {
        Event::ActionFailed {
            action: a,
            kind,
            message,
        } if *a == action => Some((*kind, message.clone())),
        _ => None,
    })
}

/// The last snapshot in an event sequence.
pub fn last_snapshot(events: &[Event]) -> Option<&WorkflowSnapshot> {
    events.iter().rev().find_map(|e| match e {
        Event::StateChanged { snapshot } => Some(snapshot),
        _ => None,
    })
}

/// Assert that events are in the order an accepted network action produces:
/// `ActionStarted` first, a busy snapshot, and a final idle snapshot.
pub fn assert_action_sequence(events: &[Event], action: WorkflowAction) {
    if events.is_empty() {
        panic!("Event sequence is empty");
    }

    assert!(
        matches!(&events[0], Event::ActionStarted { action: a } if *a == action),
        "First event should be ActionStarted({action}), got: {:?}",
        events[0]
    );
    assert!(
        events.iter().any(|e| matches!(
            e,
            Event::StateChanged { snapshot } if snapshot.busy == Some(action)
        )),
        "Expected a busy snapshot for {action}"
    );
    let last = events.last().expect("non-empty");
    assert!(
        matches!(last, Event::StateChanged { snapshot } if snapshot.busy.is_none()),
        "Last event should be an idle StateChanged, got: {:?}",
        last
    );
}
