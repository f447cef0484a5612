//! Spotify OAuth Authorization-Code-with-PKCE flow
//!
//! The user is sent to the authorization endpoint in the system browser; a
//! loopback listener catches the redirect and hands the one-time code back to
//! the UI thread over a channel. The code verifier is persisted for the
//! duration of the flow and cleared after a successful exchange so a restart
//! can never replay it.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::Rng;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::sync::mpsc::{channel, Receiver};

use crate::constants::{
    KEY_CODE_VERIFIER, OAUTH_CALLBACK_ADDR, OAUTH_REDIRECT_URI, PKCE_VERIFIER_LEN,
    SPOTIFY_API_ENDPOINT, SPOTIFY_AUTH_ENDPOINT, SPOTIFY_SCOPES, SPOTIFY_TOKEN_ENDPOINT,
};
use crate::utils::clock::epoch_secs;
use crate::utils::kv_store::KvStore;
use crate::utils::token_store::{TokenData, TokenStore};

const VERIFIER_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub auth_endpoint: String,
    pub token_endpoint: String,
    pub api_endpoint: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            redirect_uri: OAUTH_REDIRECT_URI.to_string(),
            auth_endpoint: SPOTIFY_AUTH_ENDPOINT.to_string(),
            token_endpoint: SPOTIFY_TOKEN_ENDPOINT.to_string(),
            api_endpoint: SPOTIFY_API_ENDPOINT.to_string(),
            scopes: SPOTIFY_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Read the client id from the environment; `None` means the Spotify
    /// section is unconfigured and must not initialize
    pub fn from_env() -> Option<Self> {
        match std::env::var("SPOTIFY_CLIENT_ID") {
            Ok(id) if !id.trim().is_empty() => Some(Self::new(id)),
            _ => None,
        }
    }
}

/// Token endpoint response, both grant types
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

#[derive(Clone)]
pub struct OAuthManager {
    config: OAuthConfig,
    tokens: TokenStore,
    kv: KvStore,
    http: reqwest::Client,
}

impl OAuthManager {
    pub fn new(config: OAuthConfig, tokens: TokenStore, kv: KvStore) -> Self {
        Self {
            config,
            tokens,
            kv,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// 128 random characters from the RFC 7636 unreserved alphabet subset
    pub fn generate_code_verifier() -> String {
        let mut rng = rand::rng();
        (0..PKCE_VERIFIER_LEN)
            .map(|_| VERIFIER_CHARS[rng.random_range(0..VERIFIER_CHARS.len())] as char)
            .collect()
    }

    /// S256 challenge: base64url(SHA-256(verifier)), no padding
    pub fn code_challenge(verifier: &str) -> String {
        let digest = Sha256::digest(verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(digest)
    }

    pub fn authorize_url(&self, challenge: &str) -> String {
        format!(
            "{}?client_id={}&response_type=code&redirect_uri={}&code_challenge_method=S256&code_challenge={}&scope={}",
            self.config.auth_endpoint,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(challenge),
            urlencoding::encode(&self.config.scopes.join(" ")),
        )
    }

    /// Kick off the flow: store a fresh verifier, start the loopback listener,
    /// open the authorization page in the system browser. The returned channel
    /// yields the one-time authorization code.
    pub fn begin_authorization(&self) -> Result<Receiver<String>, String> {
        let verifier = Self::generate_code_verifier();
        self.kv.set(KEY_CODE_VERIFIER, &verifier);
        let challenge = Self::code_challenge(&verifier);
        let url = self.authorize_url(&challenge);

        let rx = spawn_callback_listener()?;
        webbrowser::open(&url).map_err(|e| format!("Failed to open browser: {}", e))?;
        log::info!("[OAuth] Authorization started, waiting for callback");
        Ok(rx)
    }

    /// Exchange the authorization code plus the stored verifier for tokens
    pub async fn exchange_code(&self, code: &str) -> Result<(), String> {
        let verifier = self
            .kv
            .get(KEY_CODE_VERIFIER)
            .ok_or("No PKCE verifier stored. Please reconnect Spotify.")?;

        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code_verifier", verifier.as_str()),
            ])
            .send()
            .await
            .map_err(|e| format!("Token exchange failed: {}", e))?;

        let tokens = Self::parse_token_response(response).await?;
        self.tokens.save(&tokens);
        self.kv.remove(KEY_CODE_VERIFIER);
        log::info!("[OAuth] Token exchange complete, expires_at={}", tokens.expires_at);
        Ok(())
    }

    /// One refresh attempt with the stored refresh token. Any failure destroys
    /// the persisted session; callers surface the error and do not retry.
    pub async fn refresh_access_token(&self) -> Result<(), String> {
        let refresh_token = match self.tokens.load().and_then(|t| t.refresh_token) {
            Some(t) => t,
            None => {
                self.tokens.clear();
                return Err("No refresh token available. Please reconnect Spotify.".to_string());
            }
        };

        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                self.tokens.clear();
                format!("Error refreshing Spotify token: {}", e)
            })?;

        match Self::parse_token_response(response).await {
            Ok(mut tokens) => {
                // Spotify may omit the refresh token on renewal; keep the old one
                if tokens.refresh_token.is_none() {
                    tokens.refresh_token = Some(refresh_token);
                }
                self.tokens.save(&tokens);
                log::info!("[OAuth] Access token refreshed");
                Ok(())
            }
            Err(e) => {
                self.tokens.clear();
                Err(format!("Failed to refresh Spotify token: {}", e))
            }
        }
    }

    async fn parse_token_response(response: reqwest::Response) -> Result<TokenData, String> {
        let status = response.status();
        if !status.is_success() {
            let description = match response.json::<TokenErrorResponse>().await {
                Ok(err) if !err.error_description.is_empty() => err.error_description,
                Ok(err) if !err.error.is_empty() => err.error,
                _ => format!("token endpoint returned {}", status),
            };
            return Err(description);
        }
        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| format!("Malformed token response: {}", e))?;
        Ok(TokenData {
            access_token: parsed.access_token,
            refresh_token: parsed.refresh_token,
            expires_at: epoch_secs() + parsed.expires_in,
        })
    }

    /// Current access token, if a session is stored (expiry is enforced by
    /// the API layer reacting to 401s, not preemptively here)
    pub fn access_token(&self) -> Option<String> {
        self.tokens.load().map(|t| t.access_token)
    }

    /// True when a stored token exists and its absolute expiry is in the future
    pub fn has_valid_token(&self) -> bool {
        self.tokens
            .load()
            .map(|t| !t.is_expired(epoch_secs()))
            .unwrap_or(false)
    }

    pub fn has_stored_session(&self) -> bool {
        self.tokens.load().is_some()
    }

    /// Destroy the stored session and any in-flight verifier
    pub fn logout(&self) {
        self.tokens.clear();
        self.kv.remove(KEY_CODE_VERIFIER);
        log::info!("[OAuth] Session cleared");
    }

    pub(crate) fn clear_tokens(&self) {
        self.tokens.clear();
    }
}

/// Accepts a single redirect on the loopback address and forwards the
/// authorization code. The listener thread exits after the first code.
fn spawn_callback_listener() -> Result<Receiver<String>, String> {
    let server = tiny_http::Server::http(OAUTH_CALLBACK_ADDR)
        .map_err(|e| format!("Failed to bind callback listener: {}", e))?;
    let (tx, rx) = channel();

    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let code = extract_code(request.url());
            let body = if code.is_some() {
                "<html><body><h2>Spotify connected</h2>You can close this window and return to HubRS.</body></html>"
            } else {
                "<html><body><h2>Authorization failed</h2>No code received. You can close this window.</body></html>"
            };
            let mut response = tiny_http::Response::from_string(body);
            if let Ok(header) = tiny_http::Header::from_bytes(
                &b"Content-Type"[..],
                &b"text/html; charset=utf-8"[..],
            ) {
                response = response.with_header(header);
            }
            let _ = request.respond(response);

            if let Some(code) = code {
                let _ = tx.send(code);
                break;
            }
            log::warn!("[OAuth] Callback hit without an authorization code");
        }
    });

    Ok(rx)
}

/// Pull the `code` query parameter out of the redirect URL
fn extract_code(url: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == "code" && !value.is_empty() {
            return urlencoding::decode(value).ok().map(|v| v.into_owned());
        }
    }
    None
}
