//! Side-effect services
//!
//! Things the timer asks for but never waits on.

pub mod sound;

// Re-export main types
pub use sound::SoundPlayer;
