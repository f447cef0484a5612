mod api;
mod app;
mod constants;
mod models;
mod rewards;
mod screens;
mod services;
mod state;
mod ui_components;
mod utils;

use app::HubApp;
use eframe::egui;

// App version and metadata
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_NAME: &str = "HubRS";
const APP_DESCRIPTION: &str = "Web Hub Desktop Companion";

fn main() -> Result<(), eframe::Error> {
    // Initialize logger with default settings
    // Set RUST_LOG=debug for verbose output, RUST_LOG=info for normal logs
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // .env is optional; SPOTIFY_CLIENT_ID may also come from the environment
    if let Err(e) = dotenvy::dotenv() {
        log::debug!("[Main] No .env file loaded: {}", e);
    }

    log::info!("[Main] Starting {} v{}", APP_NAME, APP_VERSION);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{} - {}",
                APP_NAME, APP_VERSION, APP_DESCRIPTION
            ))
            .with_inner_size([constants::APP_WIDTH, constants::APP_HEIGHT])
            .with_min_inner_size([640.0, 480.0])
            .with_resizable(true),
        persist_window: true, // Remember window position
        ..Default::default()
    };

    eframe::run_native(
        &format!("{} v{}", APP_NAME, APP_VERSION),
        options,
        Box::new(|cc| Ok(Box::new(HubApp::new(cc)))),
    )
}
