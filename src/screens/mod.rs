// Screen rendering, one file per view

pub mod dashboard;
pub mod hub;
pub mod settings_menu;

pub use dashboard::render_dashboard;
pub use hub::{render_hub, render_top_bar};
pub use settings_menu::render_settings_menu;
