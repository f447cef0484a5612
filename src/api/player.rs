// Player (transport) API endpoints

use reqwest::StatusCode;

use crate::models::PlaybackState;
use crate::utils::http::{ApiClient, BoxError};

fn expect_success(response: &reqwest::Response, what: &str) -> Result<(), BoxError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("{} returned status: {}", what, response.status()).into())
    }
}

/// Current playback state; `None` when nothing is playing anywhere (204)
pub async fn fetch_playback_state(client: &ApiClient) -> Result<Option<PlaybackState>, BoxError> {
    let response = client.get("/me/player").await?;
    if response.status() == StatusCode::NO_CONTENT {
        log::debug!("[Api] No active playback");
        return Ok(None);
    }
    expect_success(&response, "player state")?;
    Ok(Some(response.json().await?))
}

pub async fn play(client: &ApiClient) -> Result<(), BoxError> {
    let response = client.put("/me/player/play").await?;
    expect_success(&response, "play")
}

pub async fn pause(client: &ApiClient) -> Result<(), BoxError> {
    let response = client.put("/me/player/pause").await?;
    expect_success(&response, "pause")
}

pub async fn next_track(client: &ApiClient) -> Result<(), BoxError> {
    let response = client.post("/me/player/next").await?;
    expect_success(&response, "next track")
}

pub async fn previous_track(client: &ApiClient) -> Result<(), BoxError> {
    let response = client.post("/me/player/previous").await?;
    expect_success(&response, "previous track")
}

pub async fn set_shuffle(client: &ApiClient, state: bool) -> Result<(), BoxError> {
    let response = client
        .put(&format!("/me/player/shuffle?state={}", state))
        .await?;
    expect_success(&response, "shuffle")
}

/// `state` is "off", "context" or "track"
pub async fn set_repeat(client: &ApiClient, state: &str) -> Result<(), BoxError> {
    let response = client
        .put(&format!("/me/player/repeat?state={}", state))
        .await?;
    expect_success(&response, "repeat")
}
