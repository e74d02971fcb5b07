//! Headless `fit` command: ingest, select, train and predict in sequence.
//!
//! Stops at the first failing step; the error becomes the process exit status.

use clap::Args;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use colored::Colorize;
use rk_core::config::models::AppConfig;
use rk_core::controllers::{ingestion, prediction, selection, training};
use rk_core::logging::{self, LogSink};
use rk_core::state::WorkflowState;
use rk_core::transport::HttpTransport;
use rk_protocol::workflow_models::{Dataset, Prediction, TrainedModel};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct FitArgs {
    /// Dataset file to upload
    #[arg(short, long)]
    file: PathBuf,

    /// Independent variable (column name)
    #[arg(short, long)]
    x: String,

    /// Dependent variable (column name)
    #[arg(short, long)]
    y: String,

    /// Predict at this value after training (repeatable)
    #[arg(short, long = "predict", value_name = "VALUE")]
    predict: Vec<String>,

    /// Write the regression plot to this file
    #[arg(long, value_name = "PATH")]
    save_plot: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Everything a successful run produced.
#[derive(Debug, Serialize)]
struct FitReport {
    dataset: Dataset,
    model: TrainedModel,
    predictions: Vec<Prediction>,
    plot_path: Option<PathBuf>,
}

pub async fn run(config: AppConfig, args: FitArgs) -> Result<()> {
    if let Err(e) = logging::init(&config.global.logging.level, LogSink::Stderr) {
        eprintln!("{} {e:#}", "warning:".yellow());
    }

    let transport = HttpTransport::from_config(&config.global.server)?;
    let mut state = WorkflowState::new();

    let dataset = ingestion::run_file(&mut state, &transport, &args.file)
        .await
        .wrap_err_with(|| format!("Failed to load {}", args.file.display()))?;

    selection::select(&mut state, &args.x, &args.y).wrap_err("Invalid variable selection")?;

    let model = training::run(&mut state, &transport)
        .await
        .wrap_err("Training failed")?;

    let mut predictions = Vec::with_capacity(args.predict.len());
    for value in &args.predict {
        let prediction = prediction::run(&mut state, &transport, value)
            .await
            .wrap_err_with(|| format!("Prediction at '{value}' failed"))?;
        predictions.push(prediction);
    }

    if let Some(path) = &args.save_plot {
        tokio::fs::write(path, model.plot.as_bytes())
            .await
            .wrap_err_with(|| format!("Failed to write plot to {}", path.display()))?;
    }

    let report = FitReport {
        dataset,
        model,
        predictions,
        plot_path: args.save_plot,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &FitReport) {
    let model = &report.model;

    println!(
        "{} {} ({} columns)",
        "Dataset:".bold(),
        report.dataset.label,
        report.dataset.columns.len()
    );
    println!(
        "{} X = {}, Y = {}",
        "Variables:".bold(),
        model.selection.x.cyan(),
        model.selection.y.cyan()
    );
    println!("{} {}", "Model:".bold(), model.equation().green().bold());
    println!("  slope      {:.4}", model.slope);
    println!("  intercept  {:.4}", model.intercept);
    println!("  R²         {:.4}", model.r2);
    if let Some(mse) = model.mse {
        println!("  MSE        {mse:.4}");
    }

    for prediction in &report.predictions {
        println!(
            "{} {} = {}",
            "Prediction at".bold(),
            prediction.input,
            format!("{:.4}", prediction.value).green()
        );
    }

    if let Some(path) = &report.plot_path {
        println!(
            "{} {} ({} bytes)",
            "Plot saved to".bold(),
            path.display(),
            model.plot.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rk_protocol::workflow_models::{PlotArtifact, VariableSelection};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        fit: FitArgs,
    }

    #[test]
    fn test_fit_args_parse_repeated_predictions() {
        let cli = TestCli::parse_from([
            "fit", "--file", "people.csv", "--x", "age", "--y", "income", "-p", "30", "-p",
            "40", "--json",
        ]);

        assert_eq!(cli.fit.file, PathBuf::from("people.csv"));
        assert_eq!(cli.fit.predict, vec!["30", "40"]);
        assert!(cli.fit.json);
        assert!(cli.fit.save_plot.is_none());
    }

    #[test]
    fn test_report_json_omits_plot_bytes() {
        let selection = VariableSelection::new("age", "income");
        let report = FitReport {
            dataset: Dataset::new(
                vec!["age".to_string(), "income".to_string()],
                "people.csv".to_string(),
            ),
            model: TrainedModel {
                selection,
                slope: 2.5,
                intercept: 10.0,
                r2: 0.81,
                mse: None,
                plot: PlotArtifact::new(vec![1, 2, 3]),
                trained_at: chrono::Utc::now(),
            },
            predictions: vec![Prediction {
                input: "30".to_string(),
                value: 85.0,
            }],
            plot_path: None,
        };

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["model"]["slope"], 2.5);
        assert_eq!(json["predictions"][0]["value"], 85.0);
        assert!(json["model"].get("plot").is_none());
    }
}
