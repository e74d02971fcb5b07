//! TUI widgets module.
//!
//! This module contains the panels and input widgets of the TUI.

pub mod command_composer;
pub mod dataset_panel;
pub mod model_panel;

pub use command_composer::{Command, CommandComposer};
pub use dataset_panel::render_dataset_panel;
pub use model_panel::render_model_panel;
