//! Runtime settings for the bridge
//!
//! Settings live in a YAML file and are revalidated on every reload.
//! The file is watched by modification time: each scheduler tick asks
//! [`SettingsManager::needs_reload`] and a bad edit never kills the
//! process - the previous settings stay active until the file parses
//! and validates again.

use log::{error, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Errors from loading or validating the settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("todoist_api_token must not be empty")]
    EmptyApiToken,

    #[error("update_interval_s must be at least 1")]
    ZeroUpdateInterval,

    #[error("unhealthy_after must be at least 1")]
    ZeroUnhealthyAfter,

    #[error("at least one keep list must be configured")]
    NoLists,

    #[error("keep list names must not be empty")]
    EmptyListName,

    #[error("keep list '{0}' is configured twice")]
    DuplicateList(String),

    #[error("keep list '{list}' sets assignee_email but no todoist_project")]
    AssigneeWithoutProject { list: String },

    #[error("healthcheck url '{url}' is not an absolute http(s) url")]
    InvalidHealthcheckUrl { url: String },

    #[error("healthcheck ping_interval_s must be at least 1")]
    ZeroPingInterval,
}

/// OAuth client credentials for the Google Keep API
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl GoogleCredentials {
    /// Load credentials from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        use anyhow::Context;
        let client_id = std::env::var("GOOGLE_CLIENT_ID")
            .context("GOOGLE_CLIENT_ID environment variable not set")?;
        let client_secret = std::env::var("GOOGLE_CLIENT_SECRET")
            .context("GOOGLE_CLIENT_SECRET environment variable not set")?;
        Ok(Self {
            client_id,
            client_secret,
        })
    }
}

/// Liveness reporting to an external monitor
#[derive(Debug, Clone, Deserialize)]
pub struct HealthcheckSettings {
    /// Ping target, e.g. https://hc-ping.com/<uuid>
    pub url: String,
    /// Seconds between pings
    #[serde(default = "default_ping_interval_s")]
    pub ping_interval_s: u64,
}

fn default_ping_interval_s() -> u64 {
    60
}

/// One source list and how its items become tasks
#[derive(Debug, Clone, Deserialize)]
pub struct ListRule {
    /// Title of the Keep checklist note to drain
    pub name: String,
    /// Destination project by name; tasks land in the inbox when unset
    pub todoist_project: Option<String>,
    /// Natural-language due string applied to every created task
    pub due_str_en: Option<String>,
    /// Copy the note's Keep labels onto created tasks
    #[serde(default)]
    pub sync_labels: bool,
    /// Assign created tasks to this collaborator of the destination project
    pub assignee_email: Option<String>,
}

/// Deserialized and validated contents of the settings file
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// OAuth client for Keep; falls back to GOOGLE_CLIENT_ID /
    /// GOOGLE_CLIENT_SECRET when absent
    pub google: Option<GoogleCredentials>,
    pub todoist_api_token: String,
    /// Seconds between sync passes
    pub update_interval_s: u64,
    /// Failure streak per item after which the bridge reports unhealthy
    #[serde(default = "default_unhealthy_after")]
    pub unhealthy_after: u32,
    pub healthcheck: Option<HealthcheckSettings>,
    pub keep_lists: Vec<ListRule>,
}

fn default_unhealthy_after() -> u32 {
    crate::health::SyncErrorTracker::DEFAULT_UNHEALTHY_AFTER
}

impl Settings {
    /// Load and validate settings from a YAML file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_yaml::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Settings =
            serde_yaml::from_str(yaml).map_err(|source| SettingsError::Parse {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the schema-level constraints and the cross-field rule:
    /// an assignee can only be resolved against a concrete project, so
    /// `assignee_email` requires `todoist_project` on the same list.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.todoist_api_token.trim().is_empty() {
            return Err(SettingsError::EmptyApiToken);
        }
        if self.update_interval_s == 0 {
            return Err(SettingsError::ZeroUpdateInterval);
        }
        if self.unhealthy_after == 0 {
            return Err(SettingsError::ZeroUnhealthyAfter);
        }
        if self.keep_lists.is_empty() {
            return Err(SettingsError::NoLists);
        }

        let mut seen = std::collections::HashSet::new();
        for rule in &self.keep_lists {
            if rule.name.trim().is_empty() {
                return Err(SettingsError::EmptyListName);
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(SettingsError::DuplicateList(rule.name.clone()));
            }
            if rule.assignee_email.is_some() && rule.todoist_project.is_none() {
                return Err(SettingsError::AssigneeWithoutProject {
                    list: rule.name.clone(),
                });
            }
        }

        if let Some(healthcheck) = &self.healthcheck {
            let parsed = url::Url::parse(&healthcheck.url);
            let scheme_ok =
                parsed.is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host());
            if !scheme_ok {
                return Err(SettingsError::InvalidHealthcheckUrl {
                    url: healthcheck.url.clone(),
                });
            }
            if healthcheck.ping_interval_s == 0 {
                return Err(SettingsError::ZeroPingInterval);
            }
        }

        Ok(())
    }

    /// Google OAuth credentials from the file, or from the environment
    pub fn google_credentials(&self) -> anyhow::Result<GoogleCredentials> {
        match &self.google {
            Some(credentials) => Ok(credentials.clone()),
            None => GoogleCredentials::from_env(),
        }
    }
}

/// Keeps the active settings in sync with the file on disk
///
/// Change detection compares the file's modification time against the
/// one cached at the last load; a comparison updates the cache, so each
/// change is reported once.
pub struct SettingsManager {
    path: PathBuf,
    cached_mtime: Option<SystemTime>,
    settings: Settings,
}

impl SettingsManager {
    /// Load the initial settings; a broken file at startup is fatal
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = Settings::load(&path)?;
        let cached_mtime = file_mtime(&path);
        Ok(Self {
            path,
            cached_mtime,
            settings,
        })
    }

    /// Currently active settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Check if the file changed since the last load
    pub fn needs_reload(&mut self) -> bool {
        let mtime = file_mtime(&self.path);
        if mtime != self.cached_mtime {
            info!("settings change detected at {}", self.path.display());
            self.cached_mtime = mtime;
            return true;
        }
        false
    }

    /// Reload from disk
    ///
    /// Returns true when new settings became active. On any load or
    /// validation error the previous settings stay in place.
    pub fn reload(&mut self) -> bool {
        match Settings::load(&self.path) {
            Ok(settings) => {
                self.settings = settings;
                info!("settings reloaded from {}", self.path.display());
                true
            }
            Err(e) => {
                error!("could not reload settings, keeping previous: {e}");
                false
            }
        }
    }
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
