//! Command composer widget with slash command autocomplete.
//!
//! This widget provides a text input field for entering commands, with
//! autocomplete suggestions when the user types a slash command.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use std::path::PathBuf;

/// Available slash commands with their descriptions.
const COMMANDS: &[(&str, &str)] = &[
    ("/load <path>", "Upload a dataset file"),
    ("/x <column>", "Choose the independent variable"),
    ("/y <column>", "Choose the dependent variable"),
    ("/train", "Fit a model on the selected variables"),
    ("/predict <value>", "Predict with the trained model"),
    ("/save-plot <path>", "Write the regression plot to a file"),
    ("/quit", "Exit"),
];

/// A parsed composer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    X(String),
    Y(String),
    Train,
    Predict(String),
    SavePlot(PathBuf),
    Quit,
}

impl Command {
    /// Whether the command starts or changes a workflow action.
    pub fn is_workflow_action(&self) -> bool {
        !matches!(self, Command::Quit)
    }
}

/// Command composer state.
#[derive(Debug, Clone, Default)]
pub struct CommandComposer {
    /// Current input text
    input: String,
    /// Cursor position, in characters
    cursor_pos: usize,
    /// Whether autocomplete popup should be shown
    show_popup: bool,
    /// Selected index in the autocomplete list
    selected_index: usize,
}

impl CommandComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current input text.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Check if autocomplete popup should be shown.
    pub fn should_show_popup(&self) -> bool {
        self.show_popup
    }

    /// Get filtered command suggestions based on current input.
    pub fn suggestions(&self) -> Vec<(&'static str, &'static str)> {
        if !self.input.starts_with('/') {
            return Vec::new();
        }

        let filter = self.input.trim();
        COMMANDS
            .iter()
            .filter(|(cmd, _)| {
                let name = cmd.split_whitespace().next().unwrap_or(cmd);
                name.starts_with(filter)
            })
            .copied()
            .collect()
    }

    /// Get the currently selected suggestion.
    pub fn selected_suggestion(&self) -> Option<(&'static str, &'static str)> {
        self.suggestions().get(self.selected_index).copied()
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor_pos);
        self.input.insert(at, c);
        self.cursor_pos += 1;
        self.update_popup_state();
    }

    /// Insert pasted text at the cursor position. Line breaks become spaces.
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(if c == '\n' || c == '\r' { ' ' } else { c });
        }
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char(&mut self) {
        if self.cursor_pos > 0 {
            let at = self.byte_offset(self.cursor_pos - 1);
            self.input.remove(at);
            self.cursor_pos -= 1;
            self.update_popup_state();
        }
    }

    /// Clear all input.
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
        self.show_popup = false;
        self.selected_index = 0;
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_pos < self.input.chars().count() {
            self.cursor_pos += 1;
        }
    }

    /// Move selection up in autocomplete popup.
    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Move selection down in autocomplete popup.
    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.suggestions().len() {
            self.selected_index += 1;
        }
    }

    /// Complete with the currently selected suggestion (Tab key).
    pub fn complete_with_selection(&mut self) {
        if let Some((cmd, _)) = self.selected_suggestion() {
            let name = cmd.split_whitespace().next().unwrap_or(cmd);
            let takes_argument = cmd.contains('<');
            self.input = if takes_argument {
                format!("{name} ")
            } else {
                name.to_string()
            };
            self.cursor_pos = self.input.chars().count();
            self.show_popup = false;
            self.selected_index = 0;
        }
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map_or(self.input.len(), |(i, _)| i)
    }

    fn update_popup_state(&mut self) {
        self.show_popup = self.input.starts_with('/') && !self.input.contains(' ');

        let count = self.suggestions().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Render the input field.
    ///
    /// `enabled` is false while an action is in flight; the field is dimmed.
    pub fn render(&self, area: Rect, buf: &mut Buffer, enabled: bool) {
        let title = if enabled {
            "Command (/ for commands, q to quit)"
        } else {
            "Command (waiting for the service)"
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        let inner = block.inner(area);
        block.render(area, buf);

        let color = if enabled { Color::Yellow } else { Color::DarkGray };
        Paragraph::new(format!("> {}", self.input))
            .style(Style::default().fg(color))
            .render(inner, buf);
    }

    /// Render the autocomplete popup.
    pub fn render_popup(&self, area: Rect, buf: &mut Buffer) {
        if !self.show_popup {
            return;
        }

        let suggestions = self.suggestions();
        if suggestions.is_empty() {
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Commands")
            .style(Style::default().bg(Color::Black));

        let inner = block.inner(area);
        block.render(area, buf);

        for (i, (cmd, desc)) in suggestions.iter().enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.y + inner.height {
                break;
            }

            let style = if i == self.selected_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let line = Line::from(vec![
                Span::styled(format!("{cmd:<20}"), style),
                Span::styled(desc.to_string(), style.fg(Color::Gray)),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }

    /// Height the popup needs, including borders.
    pub fn popup_height(&self) -> u16 {
        if self.show_popup {
            self.suggestions().len() as u16 + 2
        } else {
            0
        }
    }

    /// Parse the current input.
    ///
    /// Returns Ok(Some(Command)) if a valid command was parsed,
    /// Ok(None) if input is empty or whitespace,
    /// Err(String) if the command is invalid.
    pub fn parse_command(&self) -> Result<Option<Command>, String> {
        let input = self.input.trim();

        if input.is_empty() {
            return Ok(None);
        }
        if !input.starts_with('/') {
            return Err("Invalid command. Commands must start with '/'".to_string());
        }

        let (cmd, argument) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };
        let required = |what: &str| {
            if argument.is_empty() {
                Err(format!("Missing {what}"))
            } else {
                Ok(argument.to_string())
            }
        };

        let command = match cmd {
            "/load" => Command::Load(PathBuf::from(required("file path")?)),
            "/x" => Command::X(required("column name")?),
            "/y" => Command::Y(required("column name")?),
            "/train" => Command::Train,
            "/predict" => Command::Predict(required("value")?),
            "/save-plot" => Command::SavePlot(PathBuf::from(required("file path")?)),
            "/quit" => Command::Quit,
            _ => return Err(format!("Unknown command: {cmd}")),
        };
        Ok(Some(command))
    }
}
