use std::sync::mpsc::Receiver;

use crate::models::{PlaybackState, Playlist};
use crate::utils::async_helper::AsyncTaskResult;

/// Receivers for in-flight background work, polled once per frame
#[derive(Default)]
pub struct BackgroundTasks {
    // OAuth flow
    pub auth_code_rx: Option<Receiver<String>>,
    pub token_exchange_rx: Option<Receiver<AsyncTaskResult<()>>>,
    pub token_refresh_rx: Option<Receiver<AsyncTaskResult<()>>>,

    // Spotify content
    pub playlists_rx: Option<Receiver<AsyncTaskResult<Vec<Playlist>>>>,
    pub playback_rx: Option<Receiver<AsyncTaskResult<Option<PlaybackState>>>>,

    // Cover art
    pub cover_rx: Option<Receiver<egui::ColorImage>>,
}

impl BackgroundTasks {
    /// Clear all task receivers (for teardown)
    pub fn clear_all(&mut self) {
        self.auth_code_rx = None;
        self.token_exchange_rx = None;
        self.token_refresh_rx = None;
        self.playlists_rx = None;
        self.playback_rx = None;
        self.cover_rx = None;
    }
}
