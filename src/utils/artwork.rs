//! Background fetch of playlist cover art

use std::sync::mpsc::{channel, Receiver};

/// Download and decode a cover image off-thread; the decoded image arrives on
/// the returned channel once ready. Failures are logged and nothing is sent.
pub fn fetch_cover(url: String) -> Receiver<egui::ColorImage> {
    let (tx, rx) = channel();
    std::thread::spawn(move || {
        let bytes = match reqwest::blocking::get(&url).and_then(|r| r.error_for_status()) {
            Ok(response) => match response.bytes() {
                Ok(b) => b,
                Err(e) => {
                    log::warn!("[Artwork] Failed to read cover bytes: {}", e);
                    return;
                }
            },
            Err(e) => {
                log::warn!("[Artwork] Failed to fetch cover: {}", e);
                return;
            }
        };

        match image::load_from_memory(&bytes) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                let _ = tx.send(color_image);
            }
            Err(e) => log::warn!("[Artwork] Failed to decode cover: {}", e),
        }
    });
    rx
}
