use serde::Deserialize;

/// Player state from `GET /me/player`. Spotify returns 204 with no body when
/// nothing is playing anywhere; that case never reaches deserialization.
#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct PlaybackState {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub shuffle_state: bool,
    /// "off", "context" or "track"
    #[serde(default = "default_repeat_state")]
    pub repeat_state: String,
    pub item: Option<PlayingItem>,
    #[serde(default)]
    pub progress_ms: u64,
    pub device: Option<Device>,
}

fn default_repeat_state() -> String {
    "off".to_string()
}

impl PlaybackState {
    /// "Now Playing: <track> by <artist>" display line, when a track is loaded
    pub fn now_playing_line(&self) -> Option<String> {
        let item = self.item.as_ref()?;
        let artist = item
            .artists
            .first()
            .map(|a| a.name.as_str())
            .unwrap_or("Unknown Artist");
        Some(format!("Now Playing: {} by {}", item.name, artist))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct PlayingItem {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub duration_ms: u64,
    pub preview_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct Device {
    pub name: String,
    pub volume_percent: Option<u8>,
}
