// Data models for Spotify API entities

pub mod playback;
pub mod playlist;

// Re-export commonly used types
pub use playback::{Artist, Device, PlaybackState, PlayingItem};
pub use playlist::{CoverImage, Playlist, PlaylistsResponse};
