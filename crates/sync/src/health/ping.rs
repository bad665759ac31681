//! Outbound health-check ping
//!
//! Reports process liveness to an external monitor (e.g. healthchecks.io)
//! with a plain HTTP GET. The caller gates each ping on
//! [`SyncErrorTracker::healthy`](super::SyncErrorTracker::healthy);
//! a persistently broken sync stops the pings so the monitor alerts on
//! their absence.

use anyhow::{Context, Result};
use log::debug;

/// Pings a configured health-check URL
pub struct HealthcheckPinger {
    url: String,
}

impl HealthcheckPinger {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one liveness ping
    pub fn ping(&self) -> Result<()> {
        ureq::get(&self.url)
            .call()
            .with_context(|| format!("Failed to ping healthcheck at {}", self.url))?;
        debug!("pinged healthcheck at {}", self.url);
        Ok(())
    }
}
