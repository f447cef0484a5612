use eframe::egui;
use std::sync::mpsc::{channel, TryRecvError};
use std::time::Duration;

use crate::app::login_gate::LoginGate;
use crate::constants::*;
use crate::rewards::{RewardSession, SharedBalance};
use crate::services::transport;
use crate::state::ui_state::AppScreen;
use crate::state::{AuthState, BackgroundTasks, ContentState, SettingsState, UiState};
use crate::utils::artwork;
use crate::utils::async_helper::spawn_and_send;
use crate::utils::clock::epoch_ms;
use crate::utils::http::ApiClient;
use crate::utils::media_bus::MediaBus;
use crate::utils::oauth::{OAuthConfig, OAuthManager};
use crate::utils::preview_player::PreviewPlayer;
use crate::utils::token_store::TokenStore;
use crate::utils::KvStore;

#[derive(Debug, Clone, Copy)]
pub enum TransportAction {
    PlayPause,
    Next,
    Previous,
    Shuffle,
    Repeat,
}

pub struct HubApp {
    pub store: KvStore,

    // Gem rewards (balance mirror read by the UI each frame)
    pub rewards: RewardSession,
    pub gem_balance: SharedBalance,

    // Spotify integration
    pub auth: AuthState,
    pub content: ContentState,

    // Settings form and page-level effects
    pub settings: SettingsState,
    pub media: MediaBus,
    pub preview: PreviewPlayer,

    // UI and background work
    pub ui: UiState,
    pub tasks: BackgroundTasks,
    pub gate: LoginGate,
}

impl HubApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut startup_notices: Vec<String> = Vec::new();

        let store = match KvStore::open() {
            Ok(store) => store,
            Err(e) => {
                log::error!("[Main] {}", e);
                startup_notices.push("Storage unavailable, state will not persist".to_string());
                // in-memory creation only fails if SQLite itself is broken
                KvStore::in_memory().unwrap_or_else(|e| panic!("sqlite unusable: {}", e))
            }
        };

        let gem_balance = SharedBalance::default();
        let rewards = RewardSession::new(store.clone(), Box::new(gem_balance.clone()));

        let auth = match OAuthConfig::from_env() {
            Some(config) => {
                let tokens = match TokenStore::open(store.clone()) {
                    Ok(tokens) => tokens,
                    Err(e) => {
                        log::warn!("[OAuth] {}; using session-only token storage", e);
                        let mut key = [0u8; 32];
                        rand::Rng::fill(&mut rand::rng(), &mut key[..]);
                        TokenStore::with_key(store.clone(), key)
                    }
                };
                AuthState::configured(OAuthManager::new(config, tokens, store.clone()))
            }
            None => AuthState::unconfigured(),
        };

        let preview = PreviewPlayer::spawn();
        let mut media = MediaBus::default();
        media.attach(preview.handle());

        let mut app = Self {
            store,
            rewards,
            gem_balance,
            auth,
            content: ContentState::default(),
            settings: SettingsState::default(),
            media,
            preview,
            ui: UiState::default(),
            tasks: BackgroundTasks::default(),
            gate: LoginGate::from_env(),
        };

        for notice in startup_notices {
            app.ui.toasts.error(notice);
        }

        app.restore_saved_settings(&cc.egui_ctx);
        app.restore_login_session();
        app.startup_spotify_check();

        app
    }

    /// Load and apply previously saved preferences; invalid records are ignored
    fn restore_saved_settings(&mut self, ctx: &egui::Context) {
        if let Some(prefs) = crate::state::Preferences::load_saved(&self.store) {
            self.settings.load_from(&prefs);
            let effects = prefs.effects();
            self.media.set_volume(effects.volume);
            self.ui.player_visible = effects.player_visible;
            Self::apply_theme_and_font(ctx, effects);
        }
    }

    /// Resume the reward session when the login flag survived the restart
    fn restore_login_session(&mut self) {
        let logged_in = self.store.flag(KEY_IS_LOGGED_IN);
        let username = self.store.get(KEY_USERNAME);
        match (logged_in, username) {
            (true, Some(username)) if !username.is_empty() => {
                self.rewards.login(&username, epoch_ms());
                self.ui.screen = AppScreen::Hub;
            }
            _ => {
                self.ui.screen = if self.gate.requires_login(AppScreen::Hub) {
                    AppScreen::Dashboard
                } else {
                    AppScreen::Hub
                };
            }
        }
    }

    /// Resume the Spotify session: a live token loads content immediately, an
    /// expired one gets a single refresh attempt first
    fn startup_spotify_check(&mut self) {
        let Some(oauth) = self.auth.oauth.clone() else {
            return;
        };
        if !oauth.has_stored_session() {
            self.auth.startup_check_done = true;
            return;
        }
        if oauth.has_valid_token() {
            self.refresh_spotify_content();
            self.auth.startup_check_done = true;
            return;
        }
        log::info!("[OAuth] Stored token expired, attempting refresh");
        let (tx, rx) = channel();
        self.tasks.token_refresh_rx = Some(rx);
        spawn_and_send(
            move || Box::pin(async move { oauth.refresh_access_token().await }),
            tx,
        );
    }

    fn api_client(&self) -> Option<ApiClient> {
        self.auth.api.clone()
    }

    /// Fetch playlists and playback state in the background
    pub fn refresh_spotify_content(&mut self) {
        let Some(client) = self.api_client() else {
            return;
        };
        self.content.playlists_loading = true;
        let (tx, rx) = channel();
        self.tasks.playlists_rx = Some(rx);
        spawn_and_send(
            move || {
                Box::pin(async move {
                    crate::api::fetch_playlists(&client)
                        .await
                        .map_err(|e| e.to_string())
                })
            },
            tx,
        );
        self.refresh_playback_state();
    }

    pub fn refresh_playback_state(&mut self) {
        let Some(client) = self.api_client() else {
            return;
        };
        self.content.playback_loading = true;
        let (tx, rx) = channel();
        self.tasks.playback_rx = Some(rx);
        transport::refresh_playback_state(client, tx);
    }

    /// Start the OAuth flow: browser out, loopback listener waiting
    pub fn connect_spotify(&mut self) {
        let Some(oauth) = &self.auth.oauth else {
            self.ui.toasts.error("Spotify Client ID not configured");
            return;
        };
        match oauth.begin_authorization() {
            Ok(rx) => {
                self.tasks.auth_code_rx = Some(rx);
                self.auth.connecting = true;
                self.ui
                    .toasts
                    .info("Continue in your browser to connect Spotify");
            }
            Err(e) => self.ui.toasts.error(e),
        }
    }

    /// Explicit disconnect: destroys the stored session and drops all content
    pub fn disconnect_spotify(&mut self) {
        if let Some(oauth) = &self.auth.oauth {
            oauth.logout();
        }
        self.tasks.clear_all();
        self.content.reset();
        self.auth.connecting = false;
        self.preview.stop();
        self.ui.toasts.info("Spotify disconnected");
    }

    /// Transport buttons; every action requires a connected session
    pub fn transport(&mut self, action: TransportAction) {
        if !self.auth.is_connected() {
            self.ui.toasts.error("Please connect to Spotify first.");
            return;
        }
        let Some(client) = self.api_client() else {
            return;
        };
        self.content.playback_loading = true;
        let (tx, rx) = channel();
        self.tasks.playback_rx = Some(rx);
        match action {
            TransportAction::PlayPause => transport::toggle_play_pause(client, tx),
            TransportAction::Next => transport::skip_next(client, tx),
            TransportAction::Previous => transport::skip_previous(client, tx),
            TransportAction::Shuffle => transport::toggle_shuffle(client, tx),
            TransportAction::Repeat => transport::toggle_repeat(client, tx),
        }
    }

    /// Select a playlist: reveal the player region and pull its cover art
    pub fn select_playlist(&mut self, playlist_id: String) {
        self.content.selected_playlist_id = Some(playlist_id);
        self.ui.player_visible = true;
        self.settings.player_enabled = true;
        self.content.cover_texture = None;
        if let Some(url) = self
            .content
            .selected_playlist()
            .and_then(|p| p.cover_url())
            .map(|u| u.to_string())
        {
            self.tasks.cover_rx = Some(artwork::fetch_cover(url));
        }
        self.refresh_playback_state();
    }

    /// Audition the preview clip of the currently playing track, if any
    pub fn play_current_preview(&mut self) {
        let preview_url = self
            .content
            .playback
            .as_ref()
            .and_then(|s| s.item.as_ref())
            .and_then(|i| i.preview_url.clone());
        match preview_url {
            Some(url) => self.preview.play(url),
            None => self.ui.toasts.info("No preview available for this track"),
        }
    }

    /// Apply the settings form: volume to every media element, player region
    /// visibility, theme, font size, then persist the four values
    pub fn apply_settings(&mut self, ctx: &egui::Context) {
        let prefs = self.settings.to_preferences();
        let effects = prefs.effects();
        self.media.set_volume(effects.volume);
        self.ui.player_visible = effects.player_visible;
        Self::apply_theme_and_font(ctx, effects);
        prefs.save(&self.store);
        self.ui.toasts.info("Settings applied");
    }

    fn apply_theme_and_font(ctx: &egui::Context, effects: crate::state::AppliedSettings) {
        ctx.set_visuals(if effects.dark_theme {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        let px = effects.font_px;
        ctx.style_mut(|style| {
            style.text_styles = [
                (egui::TextStyle::Heading, egui::FontId::proportional(px * 1.5)),
                (egui::TextStyle::Body, egui::FontId::proportional(px)),
                (egui::TextStyle::Monospace, egui::FontId::monospace(px)),
                (egui::TextStyle::Button, egui::FontId::proportional(px)),
                (egui::TextStyle::Small, egui::FontId::proportional(px * 0.8)),
            ]
            .into();
        });
    }

    /// Dashboard login: sets the flag and username, brings the session up
    pub fn login(&mut self) {
        let username = self.ui.login_username_input.trim().to_string();
        if username.is_empty() {
            self.ui.toasts.error("Enter a username to log in");
            return;
        }
        self.store.set(KEY_IS_LOGGED_IN, "true");
        self.store.set(KEY_USERNAME, &username);
        self.rewards.login(&username, epoch_ms());
        self.ui.login_username_input.clear();
        self.ui.screen = AppScreen::Hub;
    }

    /// Logout: both reward timers canceled, login keys dropped
    pub fn logout(&mut self) {
        self.rewards.teardown();
        self.store.remove(KEY_IS_LOGGED_IN);
        self.store.remove(KEY_USERNAME);
        self.media.stop_all();
        self.ui.screen = AppScreen::Dashboard;
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.flag(KEY_IS_LOGGED_IN)
    }

    pub fn username(&self) -> Option<String> {
        self.store.get(KEY_USERNAME)
    }

    /// Pointer movement or key press counts as qualifying activity
    fn observe_activity(&mut self, ctx: &egui::Context) {
        let qualifying = ctx.input(|i| {
            i.events.iter().any(|e| {
                matches!(
                    e,
                    egui::Event::PointerMoved(_)
                        | egui::Event::MouseMoved(_)
                        | egui::Event::Key { pressed: true, .. }
                )
            })
        });
        if qualifying {
            self.rewards.note_activity(epoch_ms());
        }
    }

    /// Drain finished background work; receivers are put back while pending
    fn poll_tasks(&mut self, ctx: &egui::Context) {
        if let Some(rx) = self.tasks.auth_code_rx.take() {
            match rx.try_recv() {
                Ok(code) => {
                    log::info!("[OAuth] Authorization code received");
                    if let Some(oauth) = self.auth.oauth.clone() {
                        let (tx, exchange_rx) = channel();
                        self.tasks.token_exchange_rx = Some(exchange_rx);
                        spawn_and_send(
                            move || Box::pin(async move { oauth.exchange_code(&code).await }),
                            tx,
                        );
                    }
                }
                Err(TryRecvError::Empty) => self.tasks.auth_code_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {}
            }
        }

        if let Some(rx) = self.tasks.token_exchange_rx.take() {
            match rx.try_recv() {
                Ok(Ok(())) => {
                    self.auth.connecting = false;
                    self.ui.toasts.info("Spotify connected");
                    self.refresh_spotify_content();
                }
                Ok(Err(e)) => {
                    self.auth.connecting = false;
                    self.ui.toasts.error(format!("Spotify login failed: {}", e));
                }
                Err(TryRecvError::Empty) => self.tasks.token_exchange_rx = Some(rx),
                Err(TryRecvError::Disconnected) => self.auth.connecting = false,
            }
        }

        if let Some(rx) = self.tasks.token_refresh_rx.take() {
            match rx.try_recv() {
                Ok(Ok(())) => {
                    self.auth.startup_check_done = true;
                    self.refresh_spotify_content();
                }
                Ok(Err(e)) => {
                    self.auth.startup_check_done = true;
                    self.ui.toasts.error(e);
                }
                Err(TryRecvError::Empty) => self.tasks.token_refresh_rx = Some(rx),
                Err(TryRecvError::Disconnected) => self.auth.startup_check_done = true,
            }
        }

        if let Some(rx) = self.tasks.playlists_rx.take() {
            match rx.try_recv() {
                Ok(Ok(playlists)) => {
                    self.content.playlists = playlists;
                    self.content.playlists_loading = false;
                }
                Ok(Err(e)) => {
                    self.content.playlists_loading = false;
                    self.ui.toasts.error(e);
                }
                Err(TryRecvError::Empty) => self.tasks.playlists_rx = Some(rx),
                Err(TryRecvError::Disconnected) => self.content.playlists_loading = false,
            }
        }

        if let Some(rx) = self.tasks.playback_rx.take() {
            match rx.try_recv() {
                Ok(Ok(state)) => {
                    self.content.playback = state;
                    self.content.playback_loading = false;
                }
                Ok(Err(e)) => {
                    self.content.playback_loading = false;
                    self.ui.toasts.error(e);
                }
                Err(TryRecvError::Empty) => self.tasks.playback_rx = Some(rx),
                Err(TryRecvError::Disconnected) => self.content.playback_loading = false,
            }
        }

        if let Some(rx) = self.tasks.cover_rx.take() {
            match rx.try_recv() {
                Ok(image) => {
                    self.content.cover_texture = Some(ctx.load_texture(
                        "playlist_cover",
                        image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
                Err(TryRecvError::Empty) => self.tasks.cover_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {}
            }
        }
    }

    fn enforce_login_gate(&mut self) {
        if !self.is_logged_in() && self.gate.requires_login(self.ui.screen) {
            log::debug!("[Main] Unauthenticated, redirecting to dashboard");
            self.ui.screen = AppScreen::Dashboard;
        }
    }
}

impl eframe::App for HubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.observe_activity(ctx);
        self.rewards.tick(epoch_ms());
        self.poll_tasks(ctx);

        if self.auth.config_error_pending {
            self.auth.config_error_pending = false;
            self.ui.toasts.error("Spotify Client ID not configured");
        }

        self.enforce_login_gate();

        // Keyboard shortcut for the settings overlay
        if self.ui.screen == AppScreen::Hub
            && !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::X))
        {
            self.ui.menu_open = !self.ui.menu_open;
        }

        crate::screens::render_top_bar(self, ctx);
        match self.ui.screen {
            AppScreen::Dashboard => crate::screens::render_dashboard(self, ctx),
            AppScreen::Hub => crate::screens::render_hub(self, ctx),
        }
        if self.ui.menu_open && self.ui.screen == AppScreen::Hub {
            crate::screens::render_settings_menu(self, ctx);
        }

        self.ui.toasts.show(ctx);

        // Deadlines must be observed even when no input arrives
        ctx.request_repaint_after(Duration::from_secs(REPAINT_INTERVAL_SECS));
    }
}
