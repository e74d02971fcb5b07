//! # rk-tui
//!
//! Terminal User Interface for regression-kit.
//!
//! This crate provides the interactive TUI for loading a dataset, choosing
//! variables, training and predicting. It owns no workflow state: it sends
//! `Op`s to a `WorkflowSession` from `rk-core` and mirrors the `Event`s it
//! receives, using the protocol defined in `rk-protocol`.

pub mod app;
pub mod event_handler;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use tui::Tui;

use anyhow::{Context, Result};
use rk_core::config::models::AppConfig;
use rk_core::logging::{self, LogSink};
use rk_core::session::WorkflowSession;
use rk_core::transport::HttpTransport;
use rk_protocol::ipc::Op;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Capacity of the session → UI event channel.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Run the TUI against the service described by `config` until the user quits.
///
/// Logs go to `logging.file` when configured and are discarded otherwise, so
/// nothing is written over the alternate screen.
pub async fn run_app(config: AppConfig) -> Result<()> {
    let level = config.global.logging.level.clone();
    match config.log_file() {
        Some(path) => logging::init(&level, LogSink::File(&path))?,
        None => logging::init(&level, LogSink::Off)?,
    }

    let transport = HttpTransport::from_config(&config.global.server)
        .context("Failed to set up the service connection")?;
    let server = transport.base_url().to_string();
    log::info!("starting TUI against {server}");

    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (op_tx, session) = WorkflowSession::spawn(Arc::new(transport), events_tx);
    let _ = op_tx.send(Op::GetSnapshot);

    let mut tui = Tui::init()?;
    let mut app = App::new(op_tx.clone(), events_rx, server);
    let result = app.run(&mut tui).await;
    tui.restore()?;

    let _ = op_tx.send(Op::Shutdown);
    if let Err(e) = session.await {
        log::warn!("workflow session ended abnormally: {e}");
    }

    result
}
