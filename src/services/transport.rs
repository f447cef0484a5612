//! Transport control service for remote Spotify playback
//!
//! Each control reads the current playback state, computes the flipped or
//! advanced target, issues the mutation, then re-fetches the state so the
//! displayed labels always come from the API rather than local bookkeeping.
//! Every operation reports the resulting state (or error) on a channel the
//! UI thread polls.

use std::sync::mpsc::Sender;

use crate::api;
use crate::models::PlaybackState;
use crate::utils::async_helper::{spawn_and_send, AsyncTaskResult};
use crate::utils::http::ApiClient;

/// Shuffle is a two-valued flip of the state just fetched
pub fn next_shuffle(state: &PlaybackState) -> bool {
    !state.shuffle_state
}

/// Repeat maps "off" to "context" and anything else back to "off"
pub fn next_repeat(state: &PlaybackState) -> &'static str {
    if state.repeat_state == "off" {
        "context"
    } else {
        "off"
    }
}

/// Toggle play/pause based on the just-fetched state; no active playback
/// leaves the mutation unsent
pub fn toggle_play_pause(client: ApiClient, tx: Sender<AsyncTaskResult<Option<PlaybackState>>>) {
    spawn_and_send(
        move || {
            Box::pin(async move {
                let state = api::fetch_playback_state(&client)
                    .await
                    .map_err(|e| e.to_string())?;
                match state {
                    Some(state) if state.is_playing => {
                        api::pause(&client).await.map_err(|e| e.to_string())?
                    }
                    Some(_) => api::play(&client).await.map_err(|e| e.to_string())?,
                    None => {
                        log::info!("[Transport] No active playback to toggle");
                        return Ok(None);
                    }
                }
                api::fetch_playback_state(&client)
                    .await
                    .map_err(|e| e.to_string())
            })
        },
        tx,
    );
}

pub fn skip_next(client: ApiClient, tx: Sender<AsyncTaskResult<Option<PlaybackState>>>) {
    spawn_and_send(
        move || {
            Box::pin(async move {
                api::next_track(&client).await.map_err(|e| e.to_string())?;
                api::fetch_playback_state(&client)
                    .await
                    .map_err(|e| e.to_string())
            })
        },
        tx,
    );
}

pub fn skip_previous(client: ApiClient, tx: Sender<AsyncTaskResult<Option<PlaybackState>>>) {
    spawn_and_send(
        move || {
            Box::pin(async move {
                api::previous_track(&client)
                    .await
                    .map_err(|e| e.to_string())?;
                api::fetch_playback_state(&client)
                    .await
                    .map_err(|e| e.to_string())
            })
        },
        tx,
    );
}

pub fn toggle_shuffle(client: ApiClient, tx: Sender<AsyncTaskResult<Option<PlaybackState>>>) {
    spawn_and_send(
        move || {
            Box::pin(async move {
                let state = api::fetch_playback_state(&client)
                    .await
                    .map_err(|e| e.to_string())?;
                let Some(state) = state else {
                    log::info!("[Transport] No active playback, shuffle unchanged");
                    return Ok(None);
                };
                api::set_shuffle(&client, next_shuffle(&state))
                    .await
                    .map_err(|e| e.to_string())?;
                api::fetch_playback_state(&client)
                    .await
                    .map_err(|e| e.to_string())
            })
        },
        tx,
    );
}

pub fn toggle_repeat(client: ApiClient, tx: Sender<AsyncTaskResult<Option<PlaybackState>>>) {
    spawn_and_send(
        move || {
            Box::pin(async move {
                let state = api::fetch_playback_state(&client)
                    .await
                    .map_err(|e| e.to_string())?;
                let Some(state) = state else {
                    log::info!("[Transport] No active playback, repeat unchanged");
                    return Ok(None);
                };
                api::set_repeat(&client, next_repeat(&state))
                    .await
                    .map_err(|e| e.to_string())?;
                api::fetch_playback_state(&client)
                    .await
                    .map_err(|e| e.to_string())
            })
        },
        tx,
    );
}

/// Plain state refresh (startup and after token exchange)
pub fn refresh_playback_state(client: ApiClient, tx: Sender<AsyncTaskResult<Option<PlaybackState>>>) {
    spawn_and_send(
        move || {
            Box::pin(async move {
                api::fetch_playback_state(&client)
                    .await
                    .map_err(|e| e.to_string())
            })
        },
        tx,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(shuffle: bool, repeat: &str) -> PlaybackState {
        PlaybackState {
            is_playing: true,
            shuffle_state: shuffle,
            repeat_state: repeat.to_string(),
            item: None,
            progress_ms: 0,
            device: None,
        }
    }

    #[test]
    fn shuffle_is_a_two_valued_flip() {
        assert!(next_shuffle(&state(false, "off")));
        assert!(!next_shuffle(&state(true, "off")));
    }

    #[test]
    fn repeat_flips_between_off_and_context() {
        assert_eq!(next_repeat(&state(false, "off")), "context");
        assert_eq!(next_repeat(&state(false, "context")), "off");
        // "track" counts as on, so the flip turns it off
        assert_eq!(next_repeat(&state(false, "track")), "off");
    }
}
