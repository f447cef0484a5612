use crate::ui_components::toast::ToastManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    /// Entry screen with the login form; always reachable while logged out
    Dashboard,
    /// Main hub with the gem counter and settings overlay
    Hub,
}

pub struct UiState {
    // Navigation
    pub screen: AppScreen,

    // Settings overlay
    pub menu_open: bool,
    pub player_visible: bool,

    // Toast Notifications
    pub toasts: ToastManager,

    // Login form
    pub login_username_input: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            screen: AppScreen::Hub,
            menu_open: false,
            player_visible: false,
            toasts: ToastManager::default(),
            login_username_input: String::new(),
        }
    }
}
