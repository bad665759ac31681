//! Sync health tracking and health-check reporting
//!
//! The tracker accumulates per-item failure streaks across sync passes
//! and derives the single health flag that gates outbound pings.

mod ping;
mod tracker;

pub use ping::HealthcheckPinger;
pub use tracker::SyncErrorTracker;
