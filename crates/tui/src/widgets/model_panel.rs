//! Model panel: fitted coefficients, goodness of fit and the last prediction.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use rk_protocol::workflow_models::{Prediction, WorkflowSnapshot};

/// Renders the trained model, or a hint about the next step when there is none.
pub fn render_model_panel(
    frame: &mut Frame,
    area: Rect,
    snapshot: &WorkflowSnapshot,
    last_prediction: Option<&Prediction>,
) {
    let block = Block::default().borders(Borders::ALL).title("Model");

    let lines = match &snapshot.model {
        Some(model) => {
            let label = Style::default().fg(Color::Gray);
            let mut lines = vec![
                Line::from(Span::styled(
                    model.equation(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("X / Y:      ", label),
                    Span::raw(format!("{} / {}", model.selection.x, model.selection.y)),
                ]),
                Line::from(vec![
                    Span::styled("Slope:      ", label),
                    Span::raw(format!("{:.4}", model.slope)),
                ]),
                Line::from(vec![
                    Span::styled("Intercept:  ", label),
                    Span::raw(format!("{:.4}", model.intercept)),
                ]),
                Line::from(vec![
                    Span::styled("R²:         ", label),
                    Span::raw(format!("{:.4}", model.r2)),
                ]),
            ];
            if let Some(mse) = model.mse {
                lines.push(Line::from(vec![
                    Span::styled("MSE:        ", label),
                    Span::raw(format!("{mse:.4}")),
                ]));
            }
            lines.push(Line::from(vec![
                Span::styled("Plot:       ", label),
                Span::raw(format!("{} bytes (/save-plot <path>)", model.plot.len())),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Trained:    ", label),
                Span::raw(model.trained_at.format("%H:%M:%S").to_string()),
            ]));

            if let Some(prediction) = last_prediction {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!(
                        "Prediction at {} = {:.2}",
                        prediction.input, prediction.value
                    ),
                    Style::default().fg(Color::Green),
                )));
            }
            lines
        }
        None => vec![Line::from(next_step_hint(snapshot))],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn next_step_hint(snapshot: &WorkflowSnapshot) -> &'static str {
    if snapshot.dataset.is_none() {
        "No model. Load a dataset first."
    } else if snapshot.selection.is_none() {
        "No model. Choose variables with /x and /y."
    } else {
        "No model. Run /train."
    }
}
