// Playlist API endpoints

use crate::constants::{MAX_PLAYLIST_PAGES, PLAYLISTS_PAGE_LIMIT};
use crate::models::{Playlist, PlaylistsResponse};
use crate::utils::http::{ApiClient, BoxError};

/// Fetch the user's playlists, following paging links up to a bounded number
/// of pages to prevent excessive API calls
pub async fn fetch_playlists(client: &ApiClient) -> Result<Vec<Playlist>, BoxError> {
    let first_url = format!("/me/playlists?limit={}", PLAYLISTS_PAGE_LIMIT);
    log::debug!("[Playlists] Fetching playlists: {}", first_url);

    let mut playlists = Vec::new();
    let mut pages_fetched = 0;

    let response = client.get(&first_url).await?;
    if !response.status().is_success() {
        return Err(format!("API returned status: {}", response.status()).into());
    }
    let mut page: PlaylistsResponse = response.json().await?;

    loop {
        playlists.extend(page.items);
        pages_fetched += 1;

        let Some(next_url) = page.next else {
            break;
        };
        if pages_fetched >= MAX_PLAYLIST_PAGES {
            log::warn!(
                "[Playlists] Stopping after {} pages, more playlists remain",
                pages_fetched
            );
            break;
        }

        let response = client.request_url(reqwest::Method::GET, &next_url).await?;
        if !response.status().is_success() {
            log::warn!(
                "[Playlists] Failed to fetch playlist page: {}",
                response.status()
            );
            break;
        }
        page = response.json().await?;
    }

    log::info!(
        "[Playlists] Fetched {} playlists in {} page(s)",
        playlists.len(),
        pages_fetched
    );
    Ok(playlists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error_handling::create_runtime;
    use crate::utils::kv_store::KvStore;
    use crate::utils::oauth::{OAuthConfig, OAuthManager};
    use crate::utils::token_store::{TokenData, TokenStore};

    fn start_paged_mock() -> String {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let base = format!("http://127.0.0.1:{}", port);

        let next = format!("{}/v1/me/playlists?offset=50&limit=50", base);
        std::thread::spawn(move || {
            for request in server.incoming_requests() {
                let body = if request.url().contains("offset=50") {
                    r#"{"items":[{"id":"p3","name":"Focus","images":[]}],"next":null}"#.to_string()
                } else {
                    format!(
                        r#"{{"items":[{{"id":"p1","name":"Liked","images":[{{"url":"http://x/cover.jpg","width":300,"height":300}}]}},{{"id":"p2","name":"Gym","images":[]}}],"next":"{}"}}"#,
                        next
                    )
                };
                let _ = request.respond(tiny_http::Response::from_string(body));
            }
        });
        base
    }

    #[test]
    fn follows_paging_links() {
        let base = start_paged_mock();
        let kv = KvStore::in_memory().unwrap();
        let tokens = TokenStore::with_key(kv.clone(), [5u8; 32]);
        tokens.save(&TokenData {
            access_token: "tok".to_string(),
            refresh_token: None,
            expires_at: u64::MAX,
        });
        let mut config = OAuthConfig::new("id".to_string());
        config.api_endpoint = format!("{}/v1", base);
        let client = ApiClient::new(OAuthManager::new(config, tokens, kv));

        let rt = create_runtime().unwrap();
        let playlists = rt.block_on(fetch_playlists(&client)).unwrap();
        assert_eq!(playlists.len(), 3);
        assert_eq!(playlists[0].name, "Liked");
        assert_eq!(playlists[0].cover_url(), Some("http://x/cover.jpg"));
        assert_eq!(playlists[2].id, "p3");
    }
}
