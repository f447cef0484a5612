use eframe::egui;

use crate::app::HubApp;
use crate::constants::{FONT_SIZE_MAX, FONT_SIZE_MIN};

/// Togglable settings overlay: the four preferences, the Spotify connection
/// and the playlist selector. Apply pushes every effect and persists.
pub fn render_settings_menu(app: &mut HubApp, ctx: &egui::Context) {
    let mut open = app.ui.menu_open;

    egui::Window::new("Settings")
        .open(&mut open)
        .resizable(false)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.label(format!("Your gems: {}", app.gem_balance.get()));
            ui.separator();

            ui.add(
                egui::Slider::new(&mut app.settings.volume, 0..=100).text("Volume"),
            );

            egui::ComboBox::from_label("Spotify Player")
                .selected_text(if app.settings.player_enabled { "On" } else { "Off" })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut app.settings.player_enabled, false, "Off");
                    ui.selectable_value(&mut app.settings.player_enabled, true, "On");
                });

            ui.add_space(8.0);
            render_spotify_section(app, ui);
            ui.add_space(8.0);

            egui::ComboBox::from_label("Theme")
                .selected_text(if app.settings.theme == "dark" { "Dark" } else { "Light" })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut app.settings.theme, "light".to_string(), "Light");
                    ui.selectable_value(&mut app.settings.theme, "dark".to_string(), "Dark");
                });

            ui.horizontal(|ui| {
                ui.label("Font Size (px):");
                ui.add(
                    egui::DragValue::new(&mut app.settings.font_size)
                        .range(FONT_SIZE_MIN..=FONT_SIZE_MAX),
                );
            });

            ui.add_space(12.0);
            if ui.button("Apply Settings").clicked() {
                app.apply_settings(ctx);
            }
        });

    app.ui.menu_open = open;
}

fn render_spotify_section(app: &mut HubApp, ui: &mut egui::Ui) {
    if !app.auth.is_configured() {
        ui.label(egui::RichText::new("Spotify is not configured").weak());
        return;
    }

    if !app.auth.startup_check_done {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Restoring Spotify session...");
        });
    } else if app.auth.is_connected() {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Spotify connected").weak());
            if ui.button("Disconnect").clicked() {
                app.disconnect_spotify();
            }
        });
    } else if app.auth.connecting {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Waiting for Spotify authorization...");
        });
    } else if ui.button("Connect Spotify").clicked() {
        app.connect_spotify();
    }

    if app.content.playlists_loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading playlists...");
        });
        return;
    }
    if app.content.playlists.is_empty() {
        return;
    }

    let selected_name = app
        .content
        .selected_playlist()
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "Select a playlist".to_string());

    let mut clicked: Option<String> = None;
    egui::ComboBox::from_label("Your Playlists")
        .selected_text(selected_name)
        .show_ui(ui, |ui| {
            for playlist in &app.content.playlists {
                let selected =
                    app.content.selected_playlist_id.as_deref() == Some(playlist.id.as_str());
                if ui.selectable_label(selected, &playlist.name).clicked() {
                    clicked = Some(playlist.id.clone());
                }
            }
        });
    if let Some(id) = clicked {
        app.select_playlist(id);
    }
}
