// Gem reward engine: activity-gated interval accrual

pub mod account;
pub mod session;

pub use session::{ActivityState, BalanceDisplay, NullDisplay, RewardSession, SharedBalance};
