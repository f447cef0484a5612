pub mod hub_app;
pub mod login_gate;

pub use hub_app::HubApp;
pub use login_gate::{GateMode, LoginGate};
