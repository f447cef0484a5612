//! Login gate: forces the dashboard screen for unauthenticated users
//!
//! Whether every screen past the entry screen should redirect is
//! configurable rather than hard-coded.

use crate::state::ui_state::AppScreen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    /// Every screen except the dashboard requires a login (default)
    AllScreens,
    /// No forced navigation; widgets simply stay dormant while logged out
    Disabled,
}

#[derive(Debug, Clone, Copy)]
pub struct LoginGate {
    pub mode: GateMode,
}

impl LoginGate {
    pub fn from_env() -> Self {
        let mode = match std::env::var("HUBRS_LOGIN_GATE").as_deref() {
            Ok("off") | Ok("disabled") => GateMode::Disabled,
            _ => GateMode::AllScreens,
        };
        Self { mode }
    }

    /// Should `screen` be redirected to the dashboard for a logged-out user?
    pub fn requires_login(&self, screen: AppScreen) -> bool {
        match self.mode {
            GateMode::Disabled => false,
            GateMode::AllScreens => screen != AppScreen::Dashboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_screens_mode_gates_everything_but_dashboard() {
        let gate = LoginGate {
            mode: GateMode::AllScreens,
        };
        assert!(!gate.requires_login(AppScreen::Dashboard));
        assert!(gate.requires_login(AppScreen::Hub));
    }

    #[test]
    fn disabled_mode_gates_nothing() {
        let gate = LoginGate {
            mode: GateMode::Disabled,
        };
        assert!(!gate.requires_login(AppScreen::Dashboard));
        assert!(!gate.requires_login(AppScreen::Hub));
    }
}
