//! Main entry point for the rk-tui binary.
//!
//! This executable runs the TUI for the project in the current directory.

use anyhow::Result;
use rk_core::config::loader::load_config;
use rk_tui::run_app;

#[tokio::main]
async fn main() -> Result<()> {
    let root = std::env::current_dir()?;
    let config = load_config(&root).await?;
    run_app(config).await
}
