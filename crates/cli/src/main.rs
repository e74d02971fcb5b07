//! `regress`: terminal client for the regression service.
//!
//! Without a subcommand the interactive TUI is launched. `regress fit` runs
//! the whole workflow once and prints the result.

mod fit;

use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use rk_core::config::loader::load_config_with_server;
use std::path::PathBuf;

use crate::fit::FitArgs;

#[derive(Parser)]
#[command(name = "regress", version)]
#[command(about = "Fit simple linear regressions with a remote statistical service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project root containing .regression-kit/ (defaults to current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Service base URL (overrides config.toml and RK_SERVER_URL)
    #[arg(long, global = true, value_name = "URL")]
    server: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a dataset, train on two columns and optionally predict
    Fit(FitArgs),
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let config = load_config_with_server(&root, cli.server).await?;

    match cli.command {
        // When `regress` is called without a subcommand, launch the TUI
        None => rk_tui::run_app(config)
            .await
            .map_err(|e| eyre!(e)),
        Some(Commands::Fit(args)) => fit::run(config, args).await,
    }
}
