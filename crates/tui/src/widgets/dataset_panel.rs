//! Dataset panel: the loaded columns with their variable roles.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;
use rk_protocol::workflow_models::WorkflowSnapshot;

use crate::app::PendingSelection;

/// Renders the dataset as a table of columns.
///
/// Columns in the active selection are marked `X` / `Y`. Choices made in the
/// composer but not yet sent are marked `x?` / `y?`.
pub fn render_dataset_panel(
    frame: &mut Frame,
    area: Rect,
    snapshot: &WorkflowSnapshot,
    pending: &PendingSelection,
) {
    let Some(dataset) = &snapshot.dataset else {
        let paragraph = Paragraph::new("No dataset loaded.\n\nUse /load <path> to upload one.")
            .block(Block::default().borders(Borders::ALL).title("Dataset"));
        frame.render_widget(paragraph, area);
        return;
    };

    let selection = snapshot.selection.as_ref();
    let rows: Vec<Row> = dataset
        .columns
        .iter()
        .map(|column| {
            let (role, style) = if selection.is_some_and(|s| &s.x == column) {
                ("X", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else if selection.is_some_and(|s| &s.y == column) {
                ("Y", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            } else if pending.x.as_deref() == Some(column.as_str()) {
                ("x?", Style::default().fg(Color::Yellow))
            } else if pending.y.as_deref() == Some(column.as_str()) {
                ("y?", Style::default().fg(Color::Yellow))
            } else {
                ("", Style::default())
            };

            Row::new(vec![Cell::from(role), Cell::from(column.clone())]).style(style)
        })
        .collect();

    let header = Row::new(vec![Cell::from("Role"), Cell::from("Column")]).style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Cyan),
    );

    let title = format!(
        "Dataset - {} ({} columns, #{})",
        dataset.label,
        dataset.columns.len(),
        short_id(&dataset.id.to_string())
    );
    let table = Table::new(rows, [Constraint::Length(5), Constraint::Min(10)])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

/// First 8 characters of an id, enough to tell dataset generations apart.
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}
