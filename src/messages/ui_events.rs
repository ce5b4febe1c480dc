//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application tabs
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AppTab {
    #[default]
    Home,
    Search,
    Saved,
    Profile,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Which auth popup is requested
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

/// Field focused inside the auth popup
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AuthField {
    #[default]
    Email,
    Password,
    Username,
}

impl AuthField {
    /// Next field for the given mode (sign-in has no username)
    pub fn next(&self, mode: AuthMode) -> AuthField {
        match (self, mode) {
            (AuthField::Email, _) => AuthField::Password,
            (AuthField::Password, AuthMode::SignUp) => AuthField::Username,
            (AuthField::Password, AuthMode::SignIn) => AuthField::Email,
            (AuthField::Username, _) => AuthField::Email,
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Tab navigation
    SwitchTab(AppTab),

    // List navigation on the active tab
    MoveUp,
    MoveDown,
    OpenDetails,

    // Home tab
    Refresh,
    LoadMore,

    // Search tab
    StartSearchInput,
    StopSearchInput,
    SearchChar(char),
    SearchBackspace,
    SubmitSearch,

    // Details view
    CloseDetails,
    ToggleSaved,
    DetailsScrollUp,
    DetailsScrollDown,

    // Auth popup
    OpenAuth(AuthMode),
    AuthChar(char),
    AuthBackspace,
    AuthNextField,
    AuthSubmit,
    AuthCancel,

    // Profile
    SignOut,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_tab: AppTab,
    input_mode: InputMode,
    show_help: bool,
    show_auth: bool,
    details_open: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    // Handle popups first (same for all tabs)
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if show_auth {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::AuthCancel),
            KeyCode::Enter => Some(UiEvent::AuthSubmit),
            KeyCode::Tab => Some(UiEvent::AuthNextField),
            KeyCode::Backspace => Some(UiEvent::AuthBackspace),
            KeyCode::Char(c) => Some(UiEvent::AuthChar(c)),
            _ => None,
        };
    }

    if details_open {
        return match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                Some(UiEvent::CloseDetails)
            }
            KeyCode::Char('s') => Some(UiEvent::ToggleSaved),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::DetailsScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::DetailsScrollDown),
            _ => None,
        };
    }

    // Tab switching: number keys (only in normal mode, not editing)
    if input_mode == InputMode::Normal {
        match key.code {
            KeyCode::Char('1') => return Some(UiEvent::SwitchTab(AppTab::Home)),
            KeyCode::Char('2') => return Some(UiEvent::SwitchTab(AppTab::Search)),
            KeyCode::Char('3') => return Some(UiEvent::SwitchTab(AppTab::Saved)),
            KeyCode::Char('4') => return Some(UiEvent::SwitchTab(AppTab::Profile)),
            _ => {}
        }
    }

    match active_tab {
        AppTab::Home => handle_home_tab_keys(key),
        AppTab::Search => handle_search_tab_keys(key, input_mode),
        AppTab::Saved => handle_saved_tab_keys(key),
        AppTab::Profile => handle_profile_tab_keys(key),
    }
}

/// Handle keys for the Home tab
fn handle_home_tab_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::MoveDown),
        KeyCode::Enter => Some(UiEvent::OpenDetails),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        KeyCode::Char('m') => Some(UiEvent::LoadMore),
        _ => None,
    }
}

/// Handle keys for the Search tab
fn handle_search_tab_keys(key: KeyEvent, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('/') | KeyCode::Char('e') => Some(UiEvent::StartSearchInput),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::MoveDown),
            KeyCode::Enter => Some(UiEvent::OpenDetails),
            KeyCode::Char('m') => Some(UiEvent::LoadMore),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopSearchInput),
            KeyCode::Enter => Some(UiEvent::SubmitSearch),
            KeyCode::Backspace => Some(UiEvent::SearchBackspace),
            KeyCode::Char(c) => Some(UiEvent::SearchChar(c)),
            _ => None,
        },
    }
}

/// Handle keys for the Saved tab
fn handle_saved_tab_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::MoveDown),
        KeyCode::Enter => Some(UiEvent::OpenDetails),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        _ => None,
    }
}

/// Handle keys for the Profile tab
fn handle_profile_tab_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('i') => Some(UiEvent::OpenAuth(AuthMode::SignIn)),
        KeyCode::Char('u') => Some(UiEvent::OpenAuth(AuthMode::SignUp)),
        KeyCode::Char('o') => Some(UiEvent::SignOut),
        _ => None,
    }
}
