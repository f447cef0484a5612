//! Per-user reward account persistence
//!
//! Balance and last-award timestamp are stored as plain strings keyed by
//! username. Malformed numerics never propagate: a balance that fails to
//! parse reads as zero, a timestamp that fails to parse reads as absent.

use crate::utils::kv_store::KvStore;

pub fn balance_key(username: &str) -> String {
    format!("gems_{}", username)
}

pub fn last_award_key(username: &str) -> String {
    format!("last_gem_time_{}", username)
}

/// Stored balance; missing or malformed values read as 0
pub fn load_balance(store: &KvStore, username: &str) -> u64 {
    store
        .get(&balance_key(username))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Stored last-award instant (epoch millis); `None` when missing or malformed
pub fn load_last_award(store: &KvStore, username: &str) -> Option<i64> {
    store
        .get(&last_award_key(username))
        .and_then(|v| v.parse().ok())
}

/// Persist an award: both fields, one logical write
pub fn save_award(store: &KvStore, username: &str, balance: u64, awarded_at_ms: i64) {
    store.set(&balance_key(username), &balance.to_string());
    store.set(&last_award_key(username), &awarded_at_ms.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_balance_reads_zero() {
        let store = KvStore::in_memory().unwrap();
        assert_eq!(load_balance(&store, "alice"), 0);
    }

    #[test]
    fn malformed_balance_reads_zero() {
        let store = KvStore::in_memory().unwrap();
        store.set(&balance_key("alice"), "not-a-number");
        assert_eq!(load_balance(&store, "alice"), 0);
    }

    #[test]
    fn malformed_timestamp_reads_absent() {
        let store = KvStore::in_memory().unwrap();
        store.set(&last_award_key("alice"), "NaN");
        assert_eq!(load_last_award(&store, "alice"), None);
    }

    #[test]
    fn save_award_roundtrip() {
        let store = KvStore::in_memory().unwrap();
        save_award(&store, "alice", 30, 1_000_000);
        assert_eq!(load_balance(&store, "alice"), 30);
        assert_eq!(load_last_award(&store, "alice"), Some(1_000_000));
    }

    #[test]
    fn accounts_are_keyed_per_username() {
        let store = KvStore::in_memory().unwrap();
        save_award(&store, "alice", 10, 1);
        save_award(&store, "bob", 20, 2);
        assert_eq!(load_balance(&store, "alice"), 10);
        assert_eq!(load_balance(&store, "bob"), 20);
    }
}
