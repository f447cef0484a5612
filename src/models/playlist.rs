use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<CoverImage>,
    pub tracks: Option<TracksSummary>,
}

impl Playlist {
    /// Largest available cover image URL
    pub fn cover_url(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct CoverImage {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct TracksSummary {
    #[serde(default)]
    pub total: u32,
}

/// Paged response from `GET /me/playlists`
#[derive(Debug, Deserialize)]
pub struct PlaylistsResponse {
    #[serde(default)]
    pub items: Vec<Playlist>,
    pub next: Option<String>,
}
