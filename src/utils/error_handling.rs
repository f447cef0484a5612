use std::sync::{Mutex, MutexGuard};
use tokio::runtime::Runtime;

/// Creates a lightweight single-threaded Tokio runtime
///
/// Uses current_thread scheduler to avoid thread explosion (default multi-threaded
/// runtime spawns N worker threads where N = CPU cores). Multiple runtimes across
/// the app would create excessive threads on small machines.
///
/// Returns `Ok(Runtime)` if successful, or `Err(String)` with error message
pub fn create_runtime() -> Result<Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to create runtime: {}", e))
}

/// Safely locks a mutex with poisoning recovery
///
/// If the mutex is poisoned (previous holder panicked), this function
/// will recover by extracting the inner value. Safe for our use case
/// where the data is a single-writer key-value handle.
///
/// Returns `Some(MutexGuard)` if successful, or `None` if lock failed
pub fn safe_lock<'a, T>(mutex: &'a Mutex<T>, context: &str) -> Option<MutexGuard<'a, T>> {
    match mutex.lock() {
        Ok(guard) => Some(guard),
        Err(poisoned) => {
            log::warn!("[{}] Mutex poisoned, recovering from panic", context);
            Some(poisoned.into_inner())
        }
    }
}
