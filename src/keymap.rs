// Keyboard shortcuts for the undo history.
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HistoryCommand {
    Undo,
    Redo,
}

/// Ctrl/Cmd+Z undoes; Ctrl/Cmd+Y and Ctrl/Cmd+Shift+Z redo.
pub fn history_command(key: &KeyEvent) -> Option<HistoryCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let command_held = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
    if !command_held {
        return None;
    }
    // Terminals report Shift+Z either as 'Z' or as 'z' with SHIFT set.
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char('z') if !shift => Some(HistoryCommand::Undo),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(HistoryCommand::Redo),
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(HistoryCommand::Redo),
        _ => None,
    }
}
