use eframe::egui;

use crate::app::HubApp;

/// Entry screen: the login form. Reward accrual and the settings overlay only
/// exist past this point.
pub fn render_dashboard(app: &mut HubApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.heading("Welcome to the Hub");
            ui.add_space(8.0);
            ui.label("Log in to start earning gems while you browse.");
            ui.add_space(24.0);

            ui.scope(|ui| {
                ui.set_max_width(280.0);
                ui.label("Username:");
                let response = ui.text_edit_singleline(&mut app.ui.login_username_input);
                ui.add_space(12.0);

                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Login").clicked() || submitted {
                    app.login();
                }
            });
        });
    });
}
