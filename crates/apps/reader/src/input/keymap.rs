//! Key bindings for the results screen

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mail::SortField;

use super::commands::Command;

/// What a key press asks the app to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Run(Command),
    SelectNext,
    SelectPrev,
    OpenSelected,
    CycleRows,
    /// Start the command line with the given text
    BeginInput(&'static str),
    None,
}

/// A key binding for display in the help overlay
pub struct Shortcut {
    pub keys: &'static str,
    pub description: &'static str,
}

pub const SHORTCUTS: &[Shortcut] = &[
    Shortcut { keys: "/", description: "Search" },
    Shortcut { keys: ":", description: "Command line (any command from the list below)" },
    Shortcut { keys: "j / k, Down / Up", description: "Move the selection" },
    Shortcut { keys: "Enter", description: "Open the selected message in Gmail" },
    Shortcut { keys: "l / h, PgDn / PgUp", description: "Next or previous page" },
    Shortcut { keys: "s / d / n", description: "Sort by subject, date or snippet" },
    Shortcut { keys: "r", description: "Cycle rows per page" },
    Shortcut { keys: "L", description: "Sign in" },
    Shortcut { keys: "?", description: "Toggle this help" },
    Shortcut { keys: "q / Esc", description: "Quit" },
];

/// Map a key on the results screen (not the command line) to an action
pub fn action_for(key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => KeyAction::Run(Command::Quit),
            _ => KeyAction::None,
        };
    }

    match key.code {
        KeyCode::Char('/') => KeyAction::BeginInput("search "),
        KeyCode::Char(':') => KeyAction::BeginInput(""),
        KeyCode::Char('j') | KeyCode::Down => KeyAction::SelectNext,
        KeyCode::Char('k') | KeyCode::Up => KeyAction::SelectPrev,
        KeyCode::Enter => KeyAction::OpenSelected,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => KeyAction::Run(Command::Next),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => KeyAction::Run(Command::Prev),
        KeyCode::Char('s') => KeyAction::Run(Command::Sort(SortField::Subject)),
        KeyCode::Char('d') => KeyAction::Run(Command::Sort(SortField::Date)),
        KeyCode::Char('n') => KeyAction::Run(Command::Sort(SortField::Snippet)),
        KeyCode::Char('r') => KeyAction::CycleRows,
        KeyCode::Char('L') => KeyAction::Run(Command::Login),
        KeyCode::Char('?') => KeyAction::Run(Command::Help),
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Run(Command::Quit),
        _ => KeyAction::None,
    }
}
