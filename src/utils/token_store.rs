//! Encrypted-at-rest storage for the Spotify OAuth session
//!
//! The token record is serialized to JSON, sealed with AES-256-GCM under a
//! locally generated key file, and stored in the kv table as base64. A fresh
//! random nonce is prepended to every ciphertext.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::KEY_SPOTIFY_TOKENS;
use crate::utils::kv_store::KvStore;

const NONCE_LEN: usize = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Absolute expiry, seconds since the Unix epoch
    pub expires_at: u64,
}

impl TokenData {
    pub fn is_expired(&self, now_secs: u64) -> bool {
        now_secs >= self.expires_at
    }
}

#[derive(Clone)]
pub struct TokenStore {
    kv: KvStore,
    key: [u8; 32],
}

impl TokenStore {
    /// Open the store, loading or creating the local key file
    pub fn open(kv: KvStore) -> Result<Self, String> {
        let key = Self::load_or_create_key()?;
        Ok(Self { kv, key })
    }

    /// Construct with an explicit key (tests)
    pub fn with_key(kv: KvStore, key: [u8; 32]) -> Self {
        Self { kv, key }
    }

    fn key_path() -> Result<PathBuf, String> {
        let base = dirs::config_dir().ok_or("No config directory available")?;
        Ok(base.join("hubrs").join("token.key"))
    }

    fn load_or_create_key() -> Result<[u8; 32], String> {
        let path = Self::key_path()?;
        if let Ok(bytes) = std::fs::read(&path) {
            if bytes.len() == 32 {
                let mut key = [0u8; 32];
                key.copy_from_slice(&bytes);
                return Ok(key);
            }
            log::warn!("[Store] Token key file has wrong length, regenerating");
        }
        let mut key = [0u8; 32];
        rand::rng().fill(&mut key[..]);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }
        std::fs::write(&path, key).map_err(|e| format!("Failed to write token key: {}", e))?;
        Ok(key)
    }

    /// Persist the token record, replacing any previous one
    pub fn save(&self, tokens: &TokenData) {
        let plaintext = match serde_json::to_vec(tokens) {
            Ok(p) => p,
            Err(e) => {
                log::error!("[Store] Failed to serialize tokens: {}", e);
                return;
            }
        };
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill(&mut nonce[..]);
        let sealed = match cipher.encrypt(Nonce::from_slice(&nonce), plaintext.as_slice()) {
            Ok(s) => s,
            Err(_) => {
                log::error!("[Store] Token encryption failed");
                return;
            }
        };
        let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&sealed);
        self.kv.set(KEY_SPOTIFY_TOKENS, &BASE64.encode(blob));
    }

    /// Load the token record; `None` when absent or undecryptable
    pub fn load(&self) -> Option<TokenData> {
        let blob = self.kv.get(KEY_SPOTIFY_TOKENS)?;
        let bytes = match BASE64.decode(blob) {
            Ok(b) if b.len() > NONCE_LEN => b,
            _ => {
                log::warn!("[Store] Stored token blob is malformed, ignoring");
                return None;
            }
        };
        let (nonce, sealed) = bytes.split_at(NONCE_LEN);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key));
        let plaintext = match cipher.decrypt(Nonce::from_slice(nonce), sealed) {
            Ok(p) => p,
            Err(_) => {
                log::warn!("[Store] Stored tokens failed to decrypt, ignoring");
                return None;
            }
        };
        match serde_json::from_slice(&plaintext) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                log::warn!("[Store] Stored token record is malformed: {}", e);
                None
            }
        }
    }

    /// Destroy the persisted session
    pub fn clear(&self) {
        self.kv.remove(KEY_SPOTIFY_TOKENS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TokenStore {
        TokenStore::with_key(KvStore::in_memory().unwrap(), [7u8; 32])
    }

    fn sample() -> TokenData {
        TokenData {
            access_token: "acc-123".to_string(),
            refresh_token: Some("ref-456".to_string()),
            expires_at: 1_700_000_000,
        }
    }

    #[test]
    fn save_load_roundtrip() {
        let store = store();
        store.save(&sample());
        let loaded = store.load().unwrap();
        assert_eq!(loaded.access_token, "acc-123");
        assert_eq!(loaded.refresh_token.as_deref(), Some("ref-456"));
        assert_eq!(loaded.expires_at, 1_700_000_000);
    }

    #[test]
    fn clear_destroys_session() {
        let store = store();
        store.save(&sample());
        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn wrong_key_yields_none() {
        let kv = KvStore::in_memory().unwrap();
        let writer = TokenStore::with_key(kv.clone(), [1u8; 32]);
        writer.save(&sample());
        let reader = TokenStore::with_key(kv, [2u8; 32]);
        assert!(reader.load().is_none());
    }

    #[test]
    fn garbage_blob_yields_none() {
        let kv = KvStore::in_memory().unwrap();
        kv.set(KEY_SPOTIFY_TOKENS, "not base64!!");
        let store = TokenStore::with_key(kv, [7u8; 32]);
        assert!(store.load().is_none());
    }

    #[test]
    fn expiry_check() {
        let tokens = sample();
        assert!(!tokens.is_expired(1_699_999_999));
        assert!(tokens.is_expired(1_700_000_000));
    }
}
