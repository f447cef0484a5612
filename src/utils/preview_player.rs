//! Local preview playback on a dedicated audio thread
//!
//! Track preview clips are short public MP3s; each is downloaded whole, then
//! decoded into a fresh rodio sink. The thread owns the output stream and
//! reacts to `PlayerCommand`s from the media bus. On machines without an audio
//! device the thread degrades to draining commands as no-ops.

use std::io::Cursor;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::utils::media_bus::PlayerCommand;

pub struct PreviewPlayer {
    tx: Sender<PlayerCommand>,
}

impl PreviewPlayer {
    /// Spawn the audio thread and return its command handle. Attach a clone of
    /// `handle()` to the media bus so settings volume reaches this player.
    pub fn spawn() -> Self {
        let (tx, rx) = channel();
        std::thread::spawn(move || run_audio_thread(rx));
        Self { tx }
    }

    pub fn handle(&self) -> Sender<PlayerCommand> {
        self.tx.clone()
    }

    pub fn play(&self, url: String) {
        let _ = self.tx.send(PlayerCommand::Play { url });
    }

    pub fn stop(&self) {
        let _ = self.tx.send(PlayerCommand::Stop);
    }
}

fn run_audio_thread(rx: Receiver<PlayerCommand>) {
    let (_stream, stream_handle) = match rodio::OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            log::warn!("[Preview] No audio output available, previews disabled: {}", e);
            // Keep the channel alive so senders never error; commands become no-ops
            while rx.recv().is_ok() {}
            return;
        }
    };

    let mut sink: Option<rodio::Sink> = None;
    let mut volume: f32 = 0.5;

    while let Ok(command) = rx.recv() {
        match command {
            PlayerCommand::Play { url } => {
                if let Some(old) = sink.take() {
                    old.stop();
                }
                match fetch_preview(&url) {
                    Ok(bytes) => match rodio::Decoder::new(Cursor::new(bytes)) {
                        Ok(source) => match rodio::Sink::try_new(&stream_handle) {
                            Ok(new_sink) => {
                                new_sink.set_volume(volume);
                                new_sink.append(source);
                                log::info!("[Preview] Playing preview clip");
                                sink = Some(new_sink);
                            }
                            Err(e) => log::error!("[Preview] Failed to create sink: {}", e),
                        },
                        Err(e) => log::error!("[Preview] Failed to decode preview: {}", e),
                    },
                    Err(e) => log::error!("[Preview] Failed to download preview: {}", e),
                }
            }
            PlayerCommand::Stop => {
                if let Some(old) = sink.take() {
                    old.stop();
                }
            }
            PlayerCommand::SetVolume(v) => {
                volume = v;
                if let Some(s) = &sink {
                    s.set_volume(volume);
                }
            }
        }
    }
}

fn fetch_preview(url: &str) -> Result<Vec<u8>, String> {
    let response = reqwest::blocking::get(url).map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("preview fetch returned {}", response.status()));
    }
    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| e.to_string())
}
