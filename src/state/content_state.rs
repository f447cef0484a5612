use egui::TextureHandle;

use crate::models::{PlaybackState, Playlist};

/// Spotify content shown in the player region
#[derive(Default)]
pub struct ContentState {
    pub playlists: Vec<Playlist>,
    pub playlists_loading: bool,
    pub selected_playlist_id: Option<String>,

    pub playback: Option<PlaybackState>,
    pub playback_loading: bool,

    pub cover_texture: Option<TextureHandle>,
}

impl ContentState {
    pub fn selected_playlist(&self) -> Option<&Playlist> {
        let id = self.selected_playlist_id.as_deref()?;
        self.playlists.iter().find(|p| p.id == id)
    }

    /// Reset everything fetched from the API (Spotify disconnect)
    pub fn reset(&mut self) {
        self.playlists.clear();
        self.playlists_loading = false;
        self.selected_playlist_id = None;
        self.playback = None;
        self.playback_loading = false;
        self.cover_texture = None;
    }
}
