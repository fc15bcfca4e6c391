//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation
    GoLogin,
    GoSignup,
    GoHome,
    OpenAddShipment,
    BackToShipments,
    Logout,
    Refresh,

    // Form editing
    NextField,
    PrevField,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    Submit,

    // Shipments table
    SelectNext,
    SelectPrev,
    ShowDetails,
    EditHighlighted,
    EditSelected,
    CloseModal,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Which key map applies (derived from the render state)
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Screen {
    Home,
    Login,
    Signup,
    Shipments,
    EditModal,
    AddShipment,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, screen: Screen, show_help: bool) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match screen {
        Screen::Home => match key.code {
            KeyCode::Char('l') => Some(UiEvent::GoLogin),
            KeyCode::Char('s') => Some(UiEvent::GoSignup),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('q') | KeyCode::Esc => Some(UiEvent::Quit),
            _ => None,
        },
        Screen::Shipments => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
            KeyCode::Enter => Some(UiEvent::ShowDetails),
            KeyCode::Char('e') => Some(UiEvent::EditHighlighted),
            KeyCode::Char('E') => Some(UiEvent::EditSelected),
            KeyCode::Char('a') => Some(UiEvent::OpenAddShipment),
            KeyCode::Char('r') => Some(UiEvent::Refresh),
            KeyCode::Char('o') => Some(UiEvent::Logout),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('q') => Some(UiEvent::Quit),
            _ => None,
        },
        Screen::Login | Screen::Signup | Screen::AddShipment | Screen::EditModal => {
            form_keys(key, screen)
        }
    }
}

/// Forms capture printable keys; Esc leaves the form
fn form_keys(key: KeyEvent, screen: Screen) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(match screen {
            Screen::AddShipment => UiEvent::BackToShipments,
            Screen::EditModal => UiEvent::CloseModal,
            _ => UiEvent::GoHome,
        }),
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}
