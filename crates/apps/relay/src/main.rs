//! Relay - a scheduled Google Keep to Todoist bridge
//!
//! Drains configured Keep checklists into Todoist tasks on a fixed
//! interval and reports liveness to an optional health-check URL while
//! the sync is healthy.

use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Duration;

use sync::{
    HealthcheckPinger, IntervalTimer, KeepAuth, KeepClient, Settings, SettingsManager,
    SyncErrorTracker, TodoistClient, run_pass,
};

/// Seconds between scheduler ticks
const TICK_S: u64 = 1;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let arg = std::env::args().nth(1);

    // `relay logout` drops the cached Google tokens and exits; the next
    // start runs the browser flow again.
    if arg.as_deref() == Some("logout") {
        match KeepAuth::logout() {
            Ok(()) => info!("removed cached Google tokens"),
            Err(e) => {
                error!("logout failed: {:#}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let config_path = arg
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.yaml"));

    if let Err(e) = run(config_path) {
        error!("relay exited with error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(config_path: PathBuf) -> Result<()> {
    let mut manager = SettingsManager::new(&config_path)
        .with_context(|| format!("invalid settings file {}", config_path.display()))?;

    let credentials = manager.settings().google_credentials()?;
    let keep = KeepClient::new(KeepAuth::new(
        credentials.client_id,
        credentials.client_secret,
    ));
    if !keep.is_authenticated() {
        info!("no usable Google token cached, starting browser sign-in");
    }
    keep.authenticate()
        .context("Google Keep authentication failed")?;

    let mut todoist = TodoistClient::new(manager.settings().todoist_api_token.clone());

    // The tracker lives for the whole process; a restart resets all
    // failure history. Its threshold is fixed at startup.
    let startup_threshold = manager.settings().unhealthy_after;
    let mut tracker = SyncErrorTracker::new(startup_threshold);

    let mut sync_timer = IntervalTimer::new(manager.settings().update_interval_s);
    let mut ping = build_pinger(manager.settings());

    info!(
        "starting scheduler: sync every {}s, {} list(s) configured",
        manager.settings().update_interval_s,
        manager.settings().keep_lists.len()
    );

    loop {
        if manager.needs_reload() && manager.reload() {
            let settings = manager.settings();
            todoist = TodoistClient::new(settings.todoist_api_token.clone());
            sync_timer.set_period(settings.update_interval_s);
            ping = build_pinger(settings);
            if settings.unhealthy_after != startup_threshold {
                warn!(
                    "unhealthy_after changed to {}; takes effect after restart",
                    settings.unhealthy_after
                );
            }
        }

        if sync_timer.due() {
            let rules = manager.settings().keep_lists.clone();
            let stats = run_pass(&keep, &todoist, &rules, &mut tracker);
            info!(
                "sync pass done: {} item(s) found, {} task(s) created, {} deleted, {} error(s) in {}ms",
                stats.items_found,
                stats.tasks_created,
                stats.items_deleted,
                stats.errors,
                stats.duration_ms
            );
            sync_timer.mark_run();
        }

        if let Some((timer, pinger)) = ping.as_mut()
            && timer.due()
        {
            if tracker.healthy() {
                if let Err(e) = pinger.ping() {
                    warn!("healthcheck ping failed: {:#}", e);
                }
            } else {
                warn!("skipping healthcheck ping: sync is unhealthy");
            }
            timer.mark_run();
        }

        std::thread::sleep(Duration::from_secs(TICK_S));
    }
}

/// Build the ping timer and pinger when a healthcheck is configured
fn build_pinger(settings: &Settings) -> Option<(IntervalTimer, HealthcheckPinger)> {
    settings.healthcheck.as_ref().map(|healthcheck| {
        (
            IntervalTimer::new(healthcheck.ping_interval_s),
            HealthcheckPinger::new(healthcheck.url.clone()),
        )
    })
}
