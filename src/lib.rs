//! Ratio Timer - a study timer that earns break time as you study
//!
//! Every few minutes of study earn one minute of break, at a ratio the user
//! picks. This library holds the timer state machine, the local store for
//! settings and session history, the ticker task and the HTTP API that UI
//! layers drive.

pub mod api;
pub mod config;
pub mod services;
pub mod shortcuts;
pub mod state;
pub mod store;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use store::LocalStore;
pub use utils::signals::shutdown_signal;
