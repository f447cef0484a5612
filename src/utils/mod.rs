pub mod artwork;
pub mod async_helper;
pub mod clock;
pub mod error_handling;
pub mod http;
pub mod kv_store;
pub mod media_bus;
pub mod oauth;
pub mod preview_player;
pub mod token_store;

// Re-export commonly used types
pub use http::ApiClient;
pub use kv_store::KvStore;
pub use media_bus::{MediaBus, PlayerCommand};
pub use oauth::{OAuthConfig, OAuthManager};
pub use token_store::{TokenData, TokenStore};
