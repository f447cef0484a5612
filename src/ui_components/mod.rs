pub mod toast;

pub use toast::{ToastKind, ToastManager};
