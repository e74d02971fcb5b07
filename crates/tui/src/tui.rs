//! Terminal setup and the input/redraw event stream.
//!
//! `Tui` owns the raw-mode alternate screen for the lifetime of the app and
//! restores the terminal on drop or panic. Redraw requests are coalesced by a
//! background scheduler so a burst of session events produces one frame.

use anyhow::Result;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event as TermEvent, EventStream, KeyEvent,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::pin::Pin;
use std::time::Duration;
use tokio::select;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tokio_stream::{Stream, StreamExt};

/// Type alias for the terminal backend we're using.
pub type TerminalBackend = CrosstermBackend<Stdout>;

/// Input and redraw events delivered to the app.
#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    /// Text from a bracketed paste.
    Paste(String),
    /// Time to redraw.
    Draw,
}

pub struct Tui {
    terminal: Terminal<TerminalBackend>,
    frame_tx: mpsc::UnboundedSender<Instant>,
    draw_tx: broadcast::Sender<()>,
    active: bool,
}

impl Tui {
    /// Enter raw mode and the alternate screen.
    pub fn init() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnableBracketedPaste, EnterAlternateScreen)?;
        set_panic_hook();

        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let (draw_tx, _) = broadcast::channel(1);
        tokio::spawn(schedule_frames(frame_rx, draw_tx.clone()));

        Ok(Self {
            terminal,
            frame_tx,
            draw_tx,
            active: true,
        })
    }

    /// Leave the alternate screen. Safe to call more than once.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    pub fn frame_requester(&self) -> FrameRequester {
        FrameRequester {
            frame_tx: self.frame_tx.clone(),
        }
    }

    /// Merge terminal input with scheduled redraws.
    pub fn event_stream(&self) -> Pin<Box<dyn Stream<Item = TuiEvent> + Send + 'static>> {
        let mut input = EventStream::new();
        let mut draw_rx = self.draw_tx.subscribe();

        Box::pin(async_stream::stream! {
            loop {
                select! {
                    Some(Ok(event)) = input.next() => {
                        match event {
                            TermEvent::Key(key) => yield TuiEvent::Key(key),
                            TermEvent::Paste(text) => yield TuiEvent::Paste(text),
                            TermEvent::Resize(_, _) => yield TuiEvent::Draw,
                            _ => {}
                        }
                    }
                    result = draw_rx.recv() => match result {
                        // Lagged receivers only missed duplicate redraws.
                        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => yield TuiEvent::Draw,
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        })
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Handle for scheduling redraws.
#[derive(Clone, Debug)]
pub struct FrameRequester {
    frame_tx: mpsc::UnboundedSender<Instant>,
}

impl FrameRequester {
    /// Redraw as soon as possible.
    pub fn schedule_frame(&self) {
        let _ = self.frame_tx.send(Instant::now());
    }

    /// Redraw after `delay`.
    pub fn schedule_frame_in(&self, delay: Duration) {
        let _ = self.frame_tx.send(Instant::now() + delay);
    }
}

/// Fire one draw per deadline, keeping only the earliest pending deadline.
async fn schedule_frames(mut frame_rx: mpsc::UnboundedReceiver<Instant>, draw_tx: broadcast::Sender<()>) {
    let mut deadline: Option<Instant> = None;

    loop {
        let wake = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));
        select! {
            requested = frame_rx.recv() => match requested {
                Some(at) => deadline = Some(deadline.map_or(at, |d| d.min(at))),
                None => break,
            },
            _ = tokio::time::sleep_until(wake) => {
                if deadline.take().is_some() {
                    let _ = draw_tx.send(());
                }
            }
        }
    }
}

/// Restore the terminal before the default panic output is printed.
fn set_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}
