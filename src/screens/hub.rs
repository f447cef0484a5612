use eframe::egui;

use crate::app::hub_app::TransportAction;
use crate::app::HubApp;
use crate::rewards::ActivityState;
use crate::state::ui_state::AppScreen;

/// Top bar: gem counter, login status, menu toggle. Counters simply read the
/// shared balance; when the user is logged out they are not shown at all.
pub fn render_top_bar(app: &mut HubApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("HubRS").strong());
            ui.separator();

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if app.is_logged_in() {
                    if ui.button("Logout").clicked() {
                        app.logout();
                    }
                    if app.ui.screen == AppScreen::Hub && ui.button("Menu").clicked() {
                        app.ui.menu_open = !app.ui.menu_open;
                    }
                    ui.label(format!("💎 {}", app.gem_balance.get()));
                    if let Some(username) = app.username() {
                        ui.label(egui::RichText::new(username).weak());
                    }
                } else {
                    if ui.button("Login").clicked() {
                        app.ui.screen = AppScreen::Dashboard;
                    }
                }
            });
        });
    });
}

/// Main hub view: gem status card plus the player region
pub fn render_hub(app: &mut HubApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.add_space(16.0);
            ui.heading("Hub");
            ui.add_space(8.0);

            render_gem_card(app, ui);
            ui.add_space(16.0);

            if app.ui.player_visible {
                render_player_panel(app, ui);
            } else {
                ui.label(
                    egui::RichText::new("Enable the Spotify player in Settings (press X)").weak(),
                );
            }
        });
    });
}

fn render_gem_card(app: &mut HubApp, ui: &mut egui::Ui) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("💎").size(28.0));
            ui.vertical(|ui| {
                ui.label(
                    egui::RichText::new(format!("{} gems", app.gem_balance.get())).strong(),
                );
                let status = match app.rewards.activity() {
                    ActivityState::Active => "Earning gems every 5 minutes",
                    ActivityState::Inactive => "Paused while inactive, move the mouse to resume",
                };
                ui.label(egui::RichText::new(status).weak());
            });
        });
    });
}

/// Player region: cover art, now-playing line, transport controls. Labels are
/// derived from the last fetched playback state, never tracked locally.
fn render_player_panel(app: &mut HubApp, ui: &mut egui::Ui) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            if let Some(texture) = &app.content.cover_texture {
                ui.image((texture.id(), egui::vec2(96.0, 96.0)));
            }
            ui.vertical(|ui| {
                if let Some(playlist) = app.content.selected_playlist() {
                    ui.label(egui::RichText::new(&playlist.name).strong());
                }
                let line = app
                    .content
                    .playback
                    .as_ref()
                    .and_then(|s| s.now_playing_line());
                match line {
                    Some(line) => {
                        ui.label(line);
                    }
                    None => {
                        ui.label(egui::RichText::new("Nothing playing").weak());
                    }
                }
                if app.content.playback_loading {
                    ui.spinner();
                }
            });
        });

        ui.add_space(8.0);

        let playback = app.content.playback.as_ref();
        let play_label = match playback {
            Some(state) if state.is_playing => "Pause",
            _ => "Play",
        };
        let shuffle_on = playback.map(|s| s.shuffle_state).unwrap_or(false);
        let repeat_on = playback.map(|s| s.repeat_state != "off").unwrap_or(false);

        ui.horizontal(|ui| {
            if ui.button(play_label).clicked() {
                app.transport(TransportAction::PlayPause);
            }
            if ui.button("Previous").clicked() {
                app.transport(TransportAction::Previous);
            }
            if ui.button("Next").clicked() {
                app.transport(TransportAction::Next);
            }
            if ui
                .button(format!("Shuffle: {}", if shuffle_on { "On" } else { "Off" }))
                .clicked()
            {
                app.transport(TransportAction::Shuffle);
            }
            if ui
                .button(format!("Repeat: {}", if repeat_on { "On" } else { "Off" }))
                .clicked()
            {
                app.transport(TransportAction::Repeat);
            }
            if ui.button("Preview clip").clicked() {
                app.play_current_preview();
            }
            if ui.button("Stop preview").clicked() {
                app.preview.stop();
            }
        });
    });
}
