//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes and submit
//! actions. Key behavior depends on which panel is focused; submissions are
//! returned as [`Action`] values so the I/O they trigger runs in the event
//! loop, keeping this layer pure.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};

/// What the event loop should do after a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No further work; state may have changed.
    None,
    /// Exit the TUI.
    Quit,
    /// Resolve the question currently in the question input.
    SubmitQuestion,
    /// Extract the document at the path currently in the file input.
    SubmitFile,
}

/// Handles a keyboard event and updates the app state accordingly.
///
/// # Event Handling
///
/// - `Ctrl-C`: quit from any focus state (`q` only quits in view panels,
///   since it is a normal character in the inputs)
/// - `Tab` / `Shift-Tab`: cycle focus between panels
/// - `Esc`: return to the question input
/// - `Enter`: submit whichever input is focused
/// - Inputs: character and backspace editing
/// - View panels: `j`/`k` or arrow keys scroll
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    // Global quit; Ctrl-C works even while typing.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    // Global focus cycling with Tab / Shift+Tab (BackTab).
    if key.code == KeyCode::Tab {
        app.next_focus();
        return Action::None;
    }
    if key.code == KeyCode::BackTab {
        app.prev_focus();
        return Action::None;
    }

    // Global Esc - return to the question input.
    if key.code == KeyCode::Esc {
        app.reset_focus();
        return Action::None;
    }

    match app.focus() {
        Focus::QuestionInput => handle_input(app, key, Action::SubmitQuestion),
        Focus::FileInput => handle_input(app, key, Action::SubmitFile),
        Focus::AnswerView | Focus::DocumentView => handle_view(app, key),
    }
}

/// Handles keyboard input when a text input is focused.
///
/// Enter submits the focused input; characters and backspace edit it.
fn handle_input(app: &mut App, key: KeyEvent, submit: Action) -> Action {
    match key.code {
        KeyCode::Enter => submit,
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_input_char(c);
            Action::None
        }
        KeyCode::Backspace => {
            app.pop_input_char();
            Action::None
        }
        _ => Action::None,
    }
}

/// Handles keyboard input when a view panel is focused.
///
/// Supports Vim-style scrolling (j/k), arrow keys, and `q` to quit.
fn handle_view(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::PageUp => app.scroll_up(10),
        _ => {}
    }
    Action::None
}
