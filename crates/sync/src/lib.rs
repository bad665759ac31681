//! Sync crate - Business logic for the Keep-to-Todoist bridge
//!
//! This crate provides platform-independent sync functionality including:
//! - Domain models (NoteList, NoteItem, NewTask)
//! - Google Keep API client and OAuth authentication
//! - Todoist REST API client
//! - YAML settings with validation and change-detection reload
//! - Transfer engine moving checklist items into tasks
//! - In-memory sync-error tracking and health-check gating
//!
//! This crate has zero UI dependencies; the `relay` binary wires it
//! to a serial scheduler loop.

pub mod health;
pub mod keep;
pub mod models;
pub mod settings;
pub mod todoist;
pub mod transfer;

pub use health::{HealthcheckPinger, SyncErrorTracker};
pub use keep::{KeepAuth, KeepClient};
pub use models::{NewTask, NoteId, NoteItem, NoteItemId, NoteList, ProjectId, TaskId};
pub use settings::{
    GoogleCredentials, HealthcheckSettings, ListRule, Settings, SettingsError, SettingsManager,
};
pub use todoist::TodoistClient;
pub use transfer::{
    // Seam traits for the transfer engine
    NotesSource, TaskSink,
    // Transfer execution
    TransferStats, run_pass, transfer_list,
    // Scheduling helpers (for the app loop)
    IntervalTimer, interval_elapsed,
};
