use crate::utils::http::ApiClient;
use crate::utils::oauth::OAuthManager;

/// Spotify integration state. `oauth`/`api` stay `None` when the client id is
/// not configured; the rest of the app runs without the integration.
pub struct AuthState {
    pub oauth: Option<OAuthManager>,
    pub api: Option<ApiClient>,
    /// Configuration error is reported exactly once
    pub config_error_pending: bool,
    pub connecting: bool,
    pub startup_check_done: bool,
}

impl AuthState {
    pub fn configured(oauth: OAuthManager) -> Self {
        Self {
            api: Some(ApiClient::new(oauth.clone())),
            oauth: Some(oauth),
            config_error_pending: false,
            connecting: false,
            startup_check_done: false,
        }
    }

    pub fn unconfigured() -> Self {
        log::error!("[OAuth] SPOTIFY_CLIENT_ID not configured, Spotify panel disabled");
        Self {
            oauth: None,
            api: None,
            config_error_pending: true,
            connecting: false,
            startup_check_done: true,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.oauth.is_some()
    }

    /// True when a token record is stored (it may still be expired; the API
    /// layer refreshes on 401)
    pub fn is_connected(&self) -> bool {
        self.oauth
            .as_ref()
            .map(|o| o.has_stored_session())
            .unwrap_or(false)
    }
}
