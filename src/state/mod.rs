pub mod auth_state;
pub mod background_tasks;
pub mod content_state;
pub mod settings_state;
pub mod ui_state;

pub use auth_state::AuthState;
pub use background_tasks::BackgroundTasks;
pub use content_state::ContentState;
pub use settings_state::{AppliedSettings, Preferences, SettingsState};
pub use ui_state::UiState;
