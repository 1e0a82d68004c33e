use crate::app::InputMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Down,
    Up,
    Left,
    Right,
    PageDown,
    PageUp,
    Top,
    Bottom,
    ToggleFocus,
    Select,
    Refresh,
    RefreshCatalog,
    ToggleWatch,
    Describe,
    Logs,
    Create,
    PickNamespace,
    AllNamespaces,
    StartFilter,
    ToggleHelp,
    Close,
    EditDraft,
    ApplyDraft,
    ResetDraft,
    SubmitInput,
    CancelInput,
    Backspace,
    InputChar(char),
}

pub fn map_key(mode: InputMode, key: KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    match mode {
        InputMode::Normal => map_normal_mode_key(key),
        InputMode::Filter => map_filter_mode_key(key),
        InputMode::Namespace => map_namespace_mode_key(key),
        InputMode::Describe => map_viewer_key(key),
        InputMode::Logs => match key.code {
            KeyCode::Char('w') => Some(Action::ToggleWatch),
            KeyCode::Char('r') | KeyCode::F(5) => Some(Action::Refresh),
            _ => map_viewer_key(key),
        },
        InputMode::Create => map_create_mode_key(key),
    }
}

fn map_normal_mode_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::Describe)
        }
        _ if key.modifiers.contains(KeyModifiers::CONTROL) => None,
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Left => Some(Action::Left),
        KeyCode::Right => Some(Action::Right),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::Top),
        KeyCode::Char('G') | KeyCode::End => Some(Action::Bottom),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::ToggleFocus),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Char('r') | KeyCode::F(5) => Some(Action::Refresh),
        KeyCode::Char('R') => Some(Action::RefreshCatalog),
        KeyCode::Char('w') => Some(Action::ToggleWatch),
        KeyCode::Char('d') => Some(Action::Describe),
        KeyCode::Char('l') => Some(Action::Logs),
        KeyCode::Char('c') => Some(Action::Create),
        KeyCode::Char('n') => Some(Action::PickNamespace),
        KeyCode::Char('/') => Some(Action::StartFilter),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Esc => Some(Action::Close),
        _ => None,
    }
}

fn map_filter_mode_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::SubmitInput),
        KeyCode::Esc => Some(Action::CancelInput),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            Some(Action::InputChar(c))
        }
        _ => None,
    }
}

fn map_namespace_mode_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::Top),
        KeyCode::Char('G') | KeyCode::End => Some(Action::Bottom),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Char('a') => Some(Action::AllNamespaces),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Close),
        _ => None,
    }
}

fn map_viewer_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::Top),
        KeyCode::Char('G') | KeyCode::End => Some(Action::Bottom),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Close),
        _ => None,
    }
}

fn map_create_mode_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::ApplyDraft)
        }
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::ResetDraft)
        }
        KeyCode::Char('e') if key.modifiers.is_empty() => Some(Action::EditDraft),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Esc => Some(Action::Close),
        _ => None,
    }
}
