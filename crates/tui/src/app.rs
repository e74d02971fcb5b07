//! TUI application state and event loop.
//!
//! This module defines the main `App` struct that mirrors the workflow
//! session's snapshots and runs the event loop using `tokio::select!`.

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Clear, Paragraph},
    Frame,
};
use rk_protocol::ipc::{Event, Op};
use rk_protocol::workflow_models::{Prediction, WorkflowAction, WorkflowSnapshot};
use tokio::select;
use tokio::sync::mpsc::{Receiver, UnboundedSender};
use tokio_stream::StreamExt;

use crate::event_handler;
use crate::tui::{Tui, TuiEvent};
use crate::widgets::{render_dataset_panel, render_model_panel, CommandComposer};

/// Variables chosen in the composer that have not been sent yet.
///
/// A selection is sent once both sides are chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSelection {
    pub x: Option<String>,
    pub y: Option<String>,
}

/// Content of the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Info(String),
    Error(String),
}

/// Main TUI application state.
pub struct App {
    /// Latest workflow snapshot received from the session.
    pub snapshot: WorkflowSnapshot,
    pub pending: PendingSelection,
    /// Cleared whenever the model changes.
    pub last_prediction: Option<Prediction>,
    /// Action announced by the session and not yet settled.
    pub in_flight: Option<WorkflowAction>,
    pub status: Status,
    pub composer: CommandComposer,
    /// Service address, shown in the status line.
    pub server: String,
    /// Channel to send operations to the session.
    pub op_tx: UnboundedSender<Op>,
    /// Channel to receive events from the session.
    pub event_rx: Receiver<Event>,
    /// Flag to indicate if the application should exit.
    pub should_exit: bool,
}

impl App {
    /// Create a new App with communication channels.
    pub fn new(op_tx: UnboundedSender<Op>, event_rx: Receiver<Event>, server: String) -> Self {
        Self {
            snapshot: WorkflowSnapshot::default(),
            pending: PendingSelection::default(),
            last_prediction: None,
            in_flight: None,
            status: Status::Ready,
            composer: CommandComposer::new(),
            server,
            op_tx,
            event_rx,
            should_exit: false,
        }
    }

    /// Main event loop.
    ///
    /// Uses `tokio::select!` to handle keyboard input and session events concurrently.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();

        tui.frame_requester().schedule_frame();

        while !self.should_exit {
            select! {
                Some(event) = self.event_rx.recv() => {
                    self.handle_core_event(event);
                    tui.frame_requester().schedule_frame();
                }
                Some(tui_event) = tui_events.next() => {
                    self.handle_tui_event(tui, tui_event)?;
                }
            }
        }

        Ok(())
    }

    /// Handle events from the workflow session.
    pub fn handle_core_event(&mut self, event: Event) {
        event_handler::handle_core_event(self, event);
    }

    fn handle_tui_event(&mut self, tui: &mut Tui, event: TuiEvent) -> Result<()> {
        match event {
            TuiEvent::Key(key_event) => {
                self.handle_key_event(key_event);
                tui.frame_requester().schedule_frame();
            }
            TuiEvent::Paste(text) => {
                self.composer.insert_str(&text);
                tui.frame_requester().schedule_frame();
            }
            TuiEvent::Draw => {
                tui.draw(|frame| self.render(frame))?;
            }
        }
        Ok(())
    }

    /// Handle keyboard events.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        if event_handler::handle_keyboard_event(self, key_event) {
            self.should_exit = true;
        }
    }

    /// Render the TUI.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Panels
                Constraint::Length(1), // Status line
                Constraint::Length(3), // Command input
            ])
            .split(area);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[0]);

        render_dataset_panel(frame, panels[0], &self.snapshot, &self.pending);
        render_model_panel(
            frame,
            panels[1],
            &self.snapshot,
            self.last_prediction.as_ref(),
        );
        self.render_status(frame, rows[1]);

        let enabled = self.snapshot.busy.is_none();
        self.composer.render(rows[2], frame.buffer_mut(), enabled);

        let popup_height = self.composer.popup_height().min(rows[0].height);
        if popup_height > 0 {
            let popup = Rect {
                x: rows[2].x,
                y: rows[2].y.saturating_sub(popup_height),
                width: rows[2].width,
                height: popup_height,
            };
            frame.render_widget(Clear, popup);
            self.composer.render_popup(popup, frame.buffer_mut());
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let (text, color) = match &self.status {
            Status::Ready => (format!("Ready - service at {}", self.server), Color::Gray),
            Status::Info(message) => (message.clone(), Color::White),
            Status::Error(message) => (message.clone(), Color::Red),
        };
        let text = match self.snapshot.busy {
            Some(action) if !matches!(self.status, Status::Info(_)) => {
                format!("[{action} in progress] {text}")
            }
            _ => text,
        };

        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(color)),
            area,
        );
    }
}
