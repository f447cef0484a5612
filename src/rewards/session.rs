//! Reward accrual session: the activity state machine and both timers
//!
//! The accrual schedule and the inactivity watchdog are deadline instants
//! (epoch millis) owned by one session object and checked from the frame
//! loop via `tick`. They are independent: canceling one never cancels the
//! other, and `teardown` must clear both. At most one accrual schedule exists
//! per session; `start` always replaces any prior one.
//!
//! All methods take the current time as a parameter so scheduling is
//! deterministic under test.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::constants::{ACCRUAL_INTERVAL_MS, GEMS_PER_INTERVAL, INACTIVITY_LIMIT_MS};
use crate::rewards::account;
use crate::utils::kv_store::KvStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityState {
    Active,
    Inactive,
}

/// On-screen counter sink. Display is optional by design: core logic never
/// checks whether a counter exists, it just notifies the sink.
pub trait BalanceDisplay {
    fn show_balance(&self, balance: u64);
}

/// Sink for when no counter is present
pub struct NullDisplay;

impl BalanceDisplay for NullDisplay {
    fn show_balance(&self, _balance: u64) {}
}

/// Sink backing the egui counters: the UI reads the atomic each frame
#[derive(Clone, Default)]
pub struct SharedBalance(Arc<AtomicU64>);

impl SharedBalance {
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl BalanceDisplay for SharedBalance {
    fn show_balance(&self, balance: u64) {
        self.0.store(balance, Ordering::Relaxed);
    }
}

pub struct RewardSession {
    store: KvStore,
    display: Box<dyn BalanceDisplay>,
    activity: ActivityState,
    /// Inactivity watchdog deadline; `None` means the watchdog is not armed
    watchdog_deadline_ms: Option<i64>,
    /// Next accrual firing; `None` means no schedule exists
    next_fire_ms: Option<i64>,
    username: Option<String>,
}

impl RewardSession {
    pub fn new(store: KvStore, display: Box<dyn BalanceDisplay>) -> Self {
        Self {
            store,
            display,
            activity: ActivityState::Active,
            watchdog_deadline_ms: None,
            next_fire_ms: None,
            username: None,
        }
    }

    pub fn activity(&self) -> ActivityState {
        self.activity
    }

    pub fn is_running(&self) -> bool {
        self.next_fire_ms.is_some()
    }

    /// Bring the session up for a logged-in user: state resets to Active, the
    /// watchdog is armed, and the schedule starts per the resume policy.
    pub fn login(&mut self, username: &str, now_ms: i64) {
        log::info!("[Gems] Session starting for '{}'", username);
        self.activity = ActivityState::Active;
        self.watchdog_deadline_ms = Some(now_ms + INACTIVITY_LIMIT_MS);
        self.start(username, now_ms);
    }

    /// (Re)arm the accrual schedule, canceling any prior one first.
    ///
    /// Resume policy: firings stay phase-aligned to the persisted last-award
    /// instant. Elapsed time at or beyond the interval grants one immediate
    /// award (when Active) and restarts a full period from now; anything less
    /// delays the first firing by the remainder.
    pub fn start(&mut self, username: &str, now_ms: i64) {
        self.stop();
        self.username = Some(username.to_string());

        let balance = account::load_balance(&self.store, username);
        self.display.show_balance(balance);

        let last_award = account::load_last_award(&self.store, username).unwrap_or(now_ms);
        let elapsed = (now_ms - last_award).max(0);

        if elapsed >= ACCRUAL_INTERVAL_MS {
            if self.activity == ActivityState::Active {
                self.award(now_ms);
            }
            self.next_fire_ms = Some(now_ms + ACCRUAL_INTERVAL_MS);
        } else {
            self.next_fire_ms = Some(now_ms + (ACCRUAL_INTERVAL_MS - elapsed));
        }
    }

    /// Cancel the accrual schedule. The watchdog is untouched.
    pub fn stop(&mut self) {
        self.next_fire_ms = None;
    }

    /// A qualifying input event (pointer movement, key press) landed.
    /// Re-arms the watchdog; an Inactive session flips back to Active and
    /// re-arms the schedule per the resume policy.
    pub fn note_activity(&mut self, now_ms: i64) {
        let Some(username) = self.username.clone() else {
            return; // not logged in, nothing to track
        };
        self.watchdog_deadline_ms = Some(now_ms + INACTIVITY_LIMIT_MS);
        if self.activity == ActivityState::Inactive {
            log::debug!("[Gems] Activity resumed for '{}'", username);
            self.activity = ActivityState::Active;
            self.start(&username, now_ms);
        }
    }

    /// Advance both timers to `now_ms`. The watchdog fires first so that a
    /// firing due at the same instant as the deadline is already gated; every
    /// overdue accrual firing is then processed, advancing the schedule by
    /// whole intervals (skipped firings are not queued).
    pub fn tick(&mut self, now_ms: i64) {
        if let Some(deadline) = self.watchdog_deadline_ms {
            if now_ms >= deadline {
                log::info!("[Gems] Inactivity limit reached, pausing accrual");
                self.activity = ActivityState::Inactive;
                self.watchdog_deadline_ms = None;
            }
        }

        while let Some(next_fire) = self.next_fire_ms {
            if now_ms < next_fire {
                break;
            }
            if self.activity == ActivityState::Active {
                self.award(now_ms);
            }
            self.next_fire_ms = Some(next_fire + ACCRUAL_INTERVAL_MS);
        }
    }

    /// Tear the session down on logout: both timers canceled, state forced
    /// Inactive, user detached. No balance mutation can happen afterward.
    pub fn teardown(&mut self) {
        if let Some(username) = &self.username {
            log::info!("[Gems] Session stopped for '{}'", username);
        }
        self.stop();
        self.watchdog_deadline_ms = None;
        self.activity = ActivityState::Inactive;
        self.username = None;
    }

    fn award(&mut self, now_ms: i64) {
        let Some(username) = &self.username else {
            return;
        };
        let balance = account::load_balance(&self.store, username) + GEMS_PER_INTERVAL;
        account::save_award(&self.store, username, balance, now_ms);
        self.display.show_balance(balance);
        log::debug!("[Gems] Awarded {} gems to '{}', balance {}", GEMS_PER_INTERVAL, username, balance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::account::{load_balance, save_award};

    const INTERVAL: i64 = ACCRUAL_INTERVAL_MS;
    const LIMIT: i64 = INACTIVITY_LIMIT_MS;

    fn session() -> (RewardSession, KvStore, SharedBalance) {
        let store = KvStore::in_memory().unwrap();
        let display = SharedBalance::default();
        let session = RewardSession::new(store.clone(), Box::new(display.clone()));
        (session, store, display)
    }

    #[test]
    fn fresh_user_first_award_after_full_interval() {
        let (mut s, store, _) = session();
        s.login("alice", 0);
        s.tick(INTERVAL - 1);
        assert_eq!(load_balance(&store, "alice"), 0);
        s.tick(INTERVAL);
        assert_eq!(load_balance(&store, "alice"), 10);
    }

    #[test]
    fn restart_with_partial_elapsed_delays_by_remainder() {
        let (mut s, store, _) = session();
        // last award at t=1000, restart 2 minutes later
        let e = 2 * 60 * 1000;
        save_award(&store, "alice", 50, 1000);
        s.login("alice", 1000 + e);

        // not immediately, and not a full interval out either
        s.tick(1000 + e);
        assert_eq!(load_balance(&store, "alice"), 50);
        s.tick(1000 + INTERVAL - 1);
        assert_eq!(load_balance(&store, "alice"), 50);
        // phase-aligned: fires exactly interval - e after restart
        s.tick(1000 + INTERVAL);
        assert_eq!(load_balance(&store, "alice"), 60);
    }

    #[test]
    fn restart_overdue_grants_exactly_one_immediate_award() {
        let (mut s, store, _) = session();
        save_award(&store, "alice", 50, 0);
        s.login("alice", INTERVAL * 3); // long overdue
        assert_eq!(load_balance(&store, "alice"), 60); // one award, not three

        // cadence resumes with a full period from the restart
        s.tick(INTERVAL * 4 - 1);
        assert_eq!(load_balance(&store, "alice"), 60);
        s.tick(INTERVAL * 4);
        assert_eq!(load_balance(&store, "alice"), 70);
    }

    #[test]
    fn balance_is_monotonic_across_firings() {
        let (mut s, store, _) = session();
        s.login("alice", 0);
        let mut previous = 0;
        for i in 1..=12 {
            s.tick(i * INTERVAL);
            let balance = load_balance(&store, "alice");
            assert!(balance >= previous);
            previous = balance;
        }
        assert_eq!(previous, 120);
    }

    #[test]
    fn no_award_while_inactive_and_skips_are_not_queued() {
        let (mut s, store, _) = session();
        s.login("alice", 0);
        for i in 1..=5 {
            s.tick(i * INTERVAL);
        }
        assert_eq!(load_balance(&store, "alice"), 50);

        // watchdog fires before the firing due at the same instant
        s.tick(LIMIT);
        assert_eq!(s.activity(), ActivityState::Inactive);
        assert_eq!(load_balance(&store, "alice"), 50);

        // schedule keeps firing but every firing is a no-op
        s.tick(LIMIT + 4 * INTERVAL);
        assert_eq!(load_balance(&store, "alice"), 50);
    }

    #[test]
    fn reactivation_rearms_and_awards_when_overdue() {
        let (mut s, store, _) = session();
        s.login("alice", 0);
        for i in 1..=5 {
            s.tick(i * INTERVAL);
        }
        s.tick(LIMIT); // inactive at 30 min with 5 awards banked
        let banked = load_balance(&store, "alice");
        assert_eq!(s.activity(), ActivityState::Inactive);

        // hours later the user comes back; skipped firings stay skipped,
        // the overdue interval grants exactly one immediate award
        let back = LIMIT + 10 * INTERVAL;
        s.tick(back);
        assert_eq!(load_balance(&store, "alice"), banked);
        s.note_activity(back);
        assert_eq!(s.activity(), ActivityState::Active);
        assert_eq!(load_balance(&store, "alice"), banked + GEMS_PER_INTERVAL);

        // and cadence continues a full period later
        s.tick(back + INTERVAL);
        assert_eq!(load_balance(&store, "alice"), banked + 2 * GEMS_PER_INTERVAL);
    }

    #[test]
    fn activity_keeps_watchdog_at_bay() {
        let (mut s, _, _) = session();
        s.login("alice", 0);
        for i in 1..=10 {
            s.note_activity(i * (LIMIT - 1000));
            s.tick(i * (LIMIT - 1000));
            assert_eq!(s.activity(), ActivityState::Active);
        }
    }

    #[test]
    fn teardown_cancels_both_timers() {
        let (mut s, store, _) = session();
        s.login("alice", 0);
        s.tick(INTERVAL);
        assert_eq!(load_balance(&store, "alice"), 10);

        s.teardown();
        assert!(!s.is_running());
        assert_eq!(s.activity(), ActivityState::Inactive);

        // no further mutation regardless of elapsed time
        s.tick(INTERVAL * 1000);
        assert_eq!(load_balance(&store, "alice"), 10);
        // and the watchdog is gone too: activity events are ignored
        s.note_activity(INTERVAL * 1000);
        s.tick(INTERVAL * 2000);
        assert_eq!(load_balance(&store, "alice"), 10);
    }

    #[test]
    fn restart_replaces_prior_schedule() {
        let (mut s, store, _) = session();
        s.login("alice", 0);
        // re-login shortly after; only one schedule may exist, so exactly one
        // award lands at the phase-aligned instant
        s.login("alice", 1000);
        s.tick(INTERVAL);
        s.tick(INTERVAL + 1000);
        assert_eq!(load_balance(&store, "alice"), 10);
    }

    #[test]
    fn catch_up_tick_processes_each_overdue_firing() {
        let (mut s, store, _) = session();
        s.login("alice", 0);
        // window was minimized for 17 minutes: 3 firings due at once
        s.tick(INTERVAL * 3 + 2 * 60 * 1000);
        assert_eq!(load_balance(&store, "alice"), 30);
        // phase preserved: next firing still lands on the original cadence
        s.tick(INTERVAL * 4);
        assert_eq!(load_balance(&store, "alice"), 40);
    }

    #[test]
    fn malformed_stored_values_default_to_zero() {
        let (mut s, store, _) = session();
        store.set("gems_alice", "garbage");
        store.set("last_gem_time_alice", "also-garbage");
        s.login("alice", 0);
        // malformed timestamp counts as "now": no immediate award
        assert_eq!(load_balance(&store, "alice"), 0);
        s.tick(INTERVAL);
        // malformed balance counted as zero before the award
        assert_eq!(load_balance(&store, "alice"), 10);
    }

    #[test]
    fn display_sink_tracks_balance() {
        let (mut s, _, display) = session();
        s.login("alice", 0);
        assert_eq!(display.get(), 0);
        s.tick(INTERVAL * 2);
        assert_eq!(display.get(), 20);
    }

    #[test]
    fn null_display_never_errors() {
        let store = KvStore::in_memory().unwrap();
        let mut s = RewardSession::new(store, Box::new(NullDisplay));
        s.login("alice", 0);
        s.tick(INTERVAL);
    }

    #[test]
    fn activity_without_login_is_ignored() {
        let (mut s, store, _) = session();
        s.note_activity(0);
        s.tick(INTERVAL * 5);
        assert_eq!(load_balance(&store, "alice"), 0);
        assert!(!s.is_running());
    }
}
