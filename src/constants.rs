//! Application constants and configuration values

// === Gem Rewards ===
pub const GEMS_PER_INTERVAL: u64 = 10;
pub const ACCRUAL_INTERVAL_MS: i64 = 5 * 60 * 1000; // 5 minutes
pub const INACTIVITY_LIMIT_MS: i64 = 30 * 60 * 1000; // 30 minutes

// === UI & Layout ===
pub const APP_WIDTH: f32 = 1100.0;
pub const APP_HEIGHT: f32 = 720.0;
pub const TOAST_DURATION_SECS: u64 = 5;
pub const REPAINT_INTERVAL_SECS: u64 = 1; // keeps deadlines observed without input

// === Settings ===
pub const DEFAULT_VOLUME: u8 = 50;
pub const DEFAULT_FONT_SIZE: u8 = 16;
pub const FONT_SIZE_MIN: u8 = 12;
pub const FONT_SIZE_MAX: u8 = 24;

// === Spotify OAuth ===
pub const SPOTIFY_AUTH_ENDPOINT: &str = "https://accounts.spotify.com/authorize";
pub const SPOTIFY_TOKEN_ENDPOINT: &str = "https://accounts.spotify.com/api/token";
pub const SPOTIFY_API_ENDPOINT: &str = "https://api.spotify.com/v1";
pub const OAUTH_REDIRECT_URI: &str = "http://127.0.0.1:3000/callback";
pub const OAUTH_CALLBACK_ADDR: &str = "127.0.0.1:3000";
pub const PKCE_VERIFIER_LEN: usize = 128;
pub const SPOTIFY_SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "streaming",
    "playlist-read-private",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
];

// === API & Content ===
pub const PLAYLISTS_PAGE_LIMIT: usize = 50;
pub const MAX_PLAYLIST_PAGES: usize = 10; // 500 playlists max per fetch

// === Storage Keys ===
pub const KEY_IS_LOGGED_IN: &str = "is_logged_in";
pub const KEY_USERNAME: &str = "username";
pub const KEY_SETTINGS: &str = "settings";
pub const KEY_CODE_VERIFIER: &str = "spotify_code_verifier";
pub const KEY_SPOTIFY_TOKENS: &str = "spotify_tokens";
