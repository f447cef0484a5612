//! Bearer-authorized Spotify API transport
//!
//! Retry-after-refresh is an explicit bounded loop: one attempt, at most one
//! token refresh, one retry. A second consecutive 401 (or a failed refresh)
//! destroys the stored session and surfaces the error; there is no further
//! automatic retry.

use reqwest::{Method, StatusCode};

use crate::utils::oauth::OAuthManager;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    oauth: OAuthManager,
}

impl ApiClient {
    pub fn new(oauth: OAuthManager) -> Self {
        Self {
            http: reqwest::Client::new(),
            oauth,
        }
    }

    fn endpoint(&self, path_and_query: &str) -> String {
        format!("{}{}", self.oauth.config().api_endpoint, path_and_query)
    }

    /// Issue a bearer-authorized request with the refresh-once policy
    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
    ) -> Result<reqwest::Response, BoxError> {
        let url = self.endpoint(path_and_query);
        self.request_url(method, &url).await
    }

    /// Same policy against an absolute URL (paged `next` links)
    pub async fn request_url(
        &self,
        method: Method,
        url: &str,
    ) -> Result<reqwest::Response, BoxError> {
        let mut refreshed = false;

        loop {
            let token = self
                .oauth
                .access_token()
                .ok_or("Not connected to Spotify")?;

            let mut builder = self.http.request(method.clone(), url).bearer_auth(&token);
            if method != Method::GET {
                // Spotify rejects bodyless mutations without a Content-Length
                builder = builder.body("");
            }
            let response = builder
                .send()
                .await
                .map_err(|e| format!("Network error at {}: {}", url, e))?;

            if response.status() == StatusCode::UNAUTHORIZED {
                if refreshed {
                    log::warn!(
                        "[Api] Still unauthorized after refresh at {}, clearing session",
                        url
                    );
                    self.oauth.clear_tokens();
                    return Err("Spotify session expired. Please reconnect.".into());
                }
                log::info!("[Api] 401 at {}, attempting token refresh", url);
                refreshed = true;
                self.oauth.refresh_access_token().await?;
                continue;
            }

            return Ok(response);
        }
    }

    pub async fn get(&self, path_and_query: &str) -> Result<reqwest::Response, BoxError> {
        self.request(Method::GET, path_and_query).await
    }

    pub async fn put(&self, path_and_query: &str) -> Result<reqwest::Response, BoxError> {
        self.request(Method::PUT, path_and_query).await
    }

    pub async fn post(&self, path_and_query: &str) -> Result<reqwest::Response, BoxError> {
        self.request(Method::POST, path_and_query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error_handling::create_runtime;
    use crate::utils::kv_store::KvStore;
    use crate::utils::oauth::OAuthConfig;
    use crate::utils::token_store::{TokenData, TokenStore};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct MockSpotify {
        base: String,
        resource_hits: Arc<AtomicUsize>,
        token_hits: Arc<AtomicUsize>,
        auth_headers: Arc<Mutex<Vec<String>>>,
    }

    /// One server playing both the resource API and the token endpoint.
    /// `resource_statuses` is consumed per request; exhausted means 200.
    fn start_mock(resource_statuses: Vec<u16>, token_ok: bool) -> MockSpotify {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let base = format!("http://127.0.0.1:{}", port);

        let resource_hits = Arc::new(AtomicUsize::new(0));
        let token_hits = Arc::new(AtomicUsize::new(0));
        let auth_headers = Arc::new(Mutex::new(Vec::new()));

        let r_hits = resource_hits.clone();
        let t_hits = token_hits.clone();
        let headers = auth_headers.clone();
        std::thread::spawn(move || {
            let mut statuses = VecDeque::from(resource_statuses);
            for request in server.incoming_requests() {
                if request.url().starts_with("/api/token") {
                    t_hits.fetch_add(1, Ordering::SeqCst);
                    let (body, status): (&str, u16) = if token_ok {
                        (r#"{"access_token":"new-token","expires_in":3600}"#, 200)
                    } else {
                        (
                            r#"{"error":"invalid_grant","error_description":"Refresh token revoked"}"#,
                            400,
                        )
                    };
                    let _ = request
                        .respond(tiny_http::Response::from_string(body).with_status_code(status));
                    continue;
                }

                r_hits.fetch_add(1, Ordering::SeqCst);
                if let Some(h) = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Authorization"))
                {
                    headers.lock().unwrap().push(h.value.as_str().to_string());
                }
                let status = statuses.pop_front().unwrap_or(200);
                let body = if status == 200 {
                    r#"{"is_playing":true}"#
                } else {
                    r#"{"error":{"status":401,"message":"The access token expired"}}"#
                };
                let _ = request
                    .respond(tiny_http::Response::from_string(body).with_status_code(status));
            }
        });

        MockSpotify {
            base,
            resource_hits,
            token_hits,
            auth_headers,
        }
    }

    fn client_against(mock: &MockSpotify) -> (ApiClient, TokenStore) {
        let kv = KvStore::in_memory().unwrap();
        let tokens = TokenStore::with_key(kv.clone(), [3u8; 32]);
        tokens.save(&TokenData {
            access_token: "old-token".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            expires_at: u64::MAX,
        });
        let mut config = OAuthConfig::new("client-id".to_string());
        config.api_endpoint = format!("{}/v1", mock.base);
        config.token_endpoint = format!("{}/api/token", mock.base);
        let oauth = OAuthManager::new(config, tokens.clone(), kv);
        (ApiClient::new(oauth), tokens)
    }

    #[test]
    fn unauthorized_triggers_one_refresh_and_retry() {
        let mock = start_mock(vec![401, 200], true);
        let (client, tokens) = client_against(&mock);

        let rt = create_runtime().unwrap();
        let response = rt.block_on(client.get("/me/player")).unwrap();
        assert!(response.status().is_success());

        assert_eq!(mock.resource_hits.load(Ordering::SeqCst), 2);
        assert_eq!(mock.token_hits.load(Ordering::SeqCst), 1);
        // the retry carried the refreshed token
        let headers = mock.auth_headers.lock().unwrap();
        assert_eq!(headers[0], "Bearer old-token");
        assert_eq!(headers[1], "Bearer new-token");
        assert_eq!(tokens.load().unwrap().access_token, "new-token");
    }

    #[test]
    fn second_unauthorized_clears_session_without_retry() {
        let mock = start_mock(vec![401, 401, 401], true);
        let (client, tokens) = client_against(&mock);

        let rt = create_runtime().unwrap();
        let result = rt.block_on(client.get("/me/player"));
        assert!(result.is_err());

        // attempt + single retry, never a third call
        assert_eq!(mock.resource_hits.load(Ordering::SeqCst), 2);
        assert_eq!(mock.token_hits.load(Ordering::SeqCst), 1);
        assert!(tokens.load().is_none());
    }

    #[test]
    fn failed_refresh_clears_session_and_aborts() {
        let mock = start_mock(vec![401], false);
        let (client, tokens) = client_against(&mock);

        let rt = create_runtime().unwrap();
        let result = rt.block_on(client.get("/me/player"));
        assert!(result.is_err());

        assert_eq!(mock.resource_hits.load(Ordering::SeqCst), 1);
        assert_eq!(mock.token_hits.load(Ordering::SeqCst), 1);
        assert!(tokens.load().is_none());
    }

    #[test]
    fn missing_token_aborts_before_network() {
        let mock = start_mock(vec![], true);
        let kv = KvStore::in_memory().unwrap();
        let tokens = TokenStore::with_key(kv.clone(), [3u8; 32]);
        let mut config = OAuthConfig::new("client-id".to_string());
        config.api_endpoint = format!("{}/v1", mock.base);
        let client = ApiClient::new(OAuthManager::new(config, tokens, kv));

        let rt = create_runtime().unwrap();
        let result = rt.block_on(client.get("/me/player"));
        assert!(result.is_err());
        assert_eq!(mock.resource_hits.load(Ordering::SeqCst), 0);
    }
}
