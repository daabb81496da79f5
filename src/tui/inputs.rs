//! Key and paste event mapping

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Something the user asked the window to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the window
    Quit,
    /// Type a character into the text field
    Char(char),
    /// Insert pasted text
    Paste(String),
    /// Enter: newline in the field, press on a button
    Enter,
    /// Delete the last character
    Backspace,
    /// Move focus forward
    FocusNext,
    /// Move focus backward
    FocusPrev,
    /// Generate shortcut
    Generate,
    /// Clear shortcut
    Clear,
    /// Nothing to do
    None,
}

/// Translate a terminal event into an [`Action`]
pub fn map_event(ev: &Event) -> Action {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press | KeyEventKind::Repeat,
            ..
        }) => map_key(*code, *modifiers),
        Event::Paste(text) => Action::Paste(text.clone()),
        _ => Action::None,
    }
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Action {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('g') if ctrl => Action::Generate,
        KeyCode::Char('l') if ctrl => Action::Clear,
        KeyCode::Char(_) if ctrl => Action::None,
        KeyCode::Char(c) => Action::Char(c),
        KeyCode::Enter => Action::Enter,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Tab => Action::FocusNext,
        KeyCode::BackTab => Action::FocusPrev,
        _ => Action::None,
    }
}
