//! Event handling utilities for the TUI.
//!
//! This module provides functions for handling different types of events:
//! - Session events (mirrored into the `App`)
//! - Keyboard events (user input)
//! - Command dispatch

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rk_protocol::ipc::{Event, Op};
use rk_protocol::workflow_models::{WorkflowAction, WorkflowSnapshot};

use crate::app::{App, Status};
use crate::widgets::Command;

/// Handle an event received from the workflow session.
pub fn handle_core_event(app: &mut App, event: Event) {
    match event {
        Event::ActionStarted { action } => {
            app.in_flight = Some(action);
            app.status = Status::Info(progress_message(action).to_string());
        }
        Event::StateChanged { snapshot } => apply_snapshot(app, snapshot),
        Event::PredictionReady { prediction } => {
            app.status = Status::Info(format!(
                "Prediction at {} = {:.2}",
                prediction.input, prediction.value
            ));
            app.last_prediction = Some(prediction);
        }
        Event::PlotSaved { path, bytes } => {
            app.status = Status::Info(format!("Plot saved to {} ({bytes} bytes)", path.display()));
        }
        Event::ActionFailed {
            action, message, ..
        } => {
            app.in_flight = None;
            app.status = Status::Error(format!("{action} failed: {message}"));
        }
    }
}

fn progress_message(action: WorkflowAction) -> &'static str {
    match action {
        WorkflowAction::Ingest => "Uploading dataset...",
        WorkflowAction::Select => "Selecting variables...",
        WorkflowAction::Train => "Training model...",
        WorkflowAction::Predict => "Predicting...",
        WorkflowAction::SavePlot => "Saving plot...",
    }
}

/// Replace the mirrored snapshot, dropping view state tied to replaced entities.
fn apply_snapshot(app: &mut App, snapshot: WorkflowSnapshot) {
    let old = std::mem::replace(&mut app.snapshot, snapshot);
    let new = &app.snapshot;

    let dataset_id = |s: &WorkflowSnapshot| s.dataset.as_ref().map(|d| d.id);
    if dataset_id(&old) != dataset_id(new) {
        app.pending = Default::default();
    }

    let model_stamp = |s: &WorkflowSnapshot| s.model.as_ref().map(|m| m.trained_at);
    if model_stamp(&old) != model_stamp(new) {
        app.last_prediction = None;
    }

    if new.busy.is_some() {
        return;
    }

    match app.in_flight.take() {
        Some(WorkflowAction::Ingest) => {
            if let Some(dataset) = &new.dataset {
                app.status = Status::Info(format!(
                    "Loaded {} with {} column(s)",
                    dataset.label,
                    dataset.columns.len()
                ));
            }
        }
        Some(WorkflowAction::Train) => {
            if let Some(model) = &new.model {
                app.status = Status::Info(format!(
                    "Model trained: {} (R² = {:.4})",
                    model.equation(),
                    model.r2
                ));
            }
        }
        // Prediction and plot outcomes arrive as their own events.
        Some(_) => {}
        None => {
            if let Some(selection) = new.selection.as_ref().filter(|s| old.selection.as_ref() != Some(*s)) {
                app.status = Status::Info(format!(
                    "Selected X = {}, Y = {}",
                    selection.x, selection.y
                ));
            }
        }
    }
}

/// Handle a keyboard event from the user.
///
/// Returns `true` if the application should exit, `false` otherwise.
pub fn handle_keyboard_event(app: &mut App, key_event: KeyEvent) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return true;
    }

    let composer = &mut app.composer;
    match key_event.code {
        KeyCode::Char('q') if composer.is_empty() => return true,
        KeyCode::Char(c) => composer.insert_char(c),
        KeyCode::Backspace => composer.delete_char(),
        KeyCode::Left => composer.move_cursor_left(),
        KeyCode::Right => composer.move_cursor_right(),
        KeyCode::Up if composer.should_show_popup() => composer.move_selection_up(),
        KeyCode::Down if composer.should_show_popup() => composer.move_selection_down(),
        KeyCode::Tab => composer.complete_with_selection(),
        KeyCode::Esc => composer.clear(),
        KeyCode::Enter => return submit_command(app),
        _ => {}
    }

    false
}

/// Submit the current command input.
///
/// Returns `true` for `/quit`.
fn submit_command(app: &mut App) -> bool {
    let parsed = app.composer.parse_command();
    app.composer.clear();

    match parsed {
        Ok(None) => {}
        Ok(Some(Command::Quit)) => return true,
        Ok(Some(command)) => {
            if let Err(message) = dispatch(app, command) {
                app.status = Status::Error(message);
            }
        }
        Err(message) => app.status = Status::Error(message),
    }

    false
}

/// Turn a command into ops for the session.
fn dispatch(app: &mut App, command: Command) -> Result<(), String> {
    if command.is_workflow_action() {
        if let Some(action) = app.snapshot.busy {
            return Err(format!("Busy: {action} in progress"));
        }
    }

    match command {
        Command::Load(path) => send(app, Op::LoadDataset { path }),
        Command::X(column) => {
            check_column(&app.snapshot, &column)?;
            app.status = Status::Info(format!("X = {column}"));
            app.pending.x = Some(column);
            send_selection_if_complete(app)
        }
        Command::Y(column) => {
            check_column(&app.snapshot, &column)?;
            app.status = Status::Info(format!("Y = {column}"));
            app.pending.y = Some(column);
            send_selection_if_complete(app)
        }
        Command::Train => send(app, Op::Train),
        Command::Predict(value) => send(app, Op::Predict { value }),
        Command::SavePlot(path) => send(app, Op::SavePlot { path }),
        Command::Quit => Ok(()),
    }
}

fn check_column(snapshot: &WorkflowSnapshot, column: &str) -> Result<(), String> {
    let dataset = snapshot
        .dataset
        .as_ref()
        .ok_or_else(|| "No dataset loaded".to_string())?;
    if dataset.has_column(column) {
        Ok(())
    } else {
        Err(format!("Column '{column}' is not in the current dataset"))
    }
}

/// Send a selection once both sides are known.
///
/// A side not chosen in the composer comes from the active selection, so a
/// single `/x` or `/y` after a selection re-selects with the other side kept.
fn send_selection_if_complete(app: &mut App) -> Result<(), String> {
    let active = app.snapshot.selection.as_ref();
    let x = app.pending.x.clone().or_else(|| active.map(|s| s.x.clone()));
    let y = app.pending.y.clone().or_else(|| active.map(|s| s.y.clone()));
    let (Some(x), Some(y)) = (x, y) else {
        return Ok(());
    };

    app.pending = Default::default();
    send(app, Op::SelectVariables { x, y })
}

fn send(app: &App, op: Op) -> Result<(), String> {
    app.op_tx
        .send(op)
        .map_err(|_| "Workflow session has stopped".to_string())
}
