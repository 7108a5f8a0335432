pub mod controller;
pub mod state;

pub use controller::{CallController, CallSnapshot};
pub use state::{CallState, CallStatus, ThreatReport};
