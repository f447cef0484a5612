//! Transient on-page notices, auto-dismissed after a fixed duration

use std::time::{Duration, Instant};

use crate::constants::TOAST_DURATION_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

struct Toast {
    message: String,
    kind: ToastKind,
    created: Instant,
}

#[derive(Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message.into(), ToastKind::Info);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("[Toast] {}", message);
        self.push(message, ToastKind::Error);
    }

    fn push(&mut self, message: String, kind: ToastKind) {
        self.toasts.push(Toast {
            message,
            kind,
            created: Instant::now(),
        });
    }

    pub fn active_count(&self) -> usize {
        self.toasts.len()
    }

    /// Drop expired toasts and render the rest in the top-right corner
    pub fn show(&mut self, ctx: &egui::Context) {
        let lifetime = Duration::from_secs(TOAST_DURATION_SECS);
        self.toasts.retain(|t| t.created.elapsed() < lifetime);
        if self.toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toast_area"))
            .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    let (fill, text_color) = match toast.kind {
                        ToastKind::Info => {
                            (egui::Color32::from_rgb(35, 70, 45), egui::Color32::WHITE)
                        }
                        ToastKind::Error => {
                            (egui::Color32::from_rgb(95, 35, 35), egui::Color32::WHITE)
                        }
                    };
                    egui::Frame::popup(ui.style())
                        .fill(fill)
                        .show(ui, |ui| {
                            ui.colored_label(text_color, &toast.message);
                        });
                    ui.add_space(4.0);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_accumulate() {
        let mut manager = ToastManager::default();
        manager.info("saved");
        manager.error("boom");
        assert_eq!(manager.active_count(), 2);
    }
}
