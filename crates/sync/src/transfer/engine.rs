//! One-directional transfer pass implementation

use anyhow::{Result, anyhow};
use log::{debug, info, warn};

use super::{NotesSource, TaskSink};
use crate::health::SyncErrorTracker;
use crate::models::{NewTask, ProjectId};
use crate::settings::ListRule;

/// Statistics from a transfer pass
#[derive(Debug, Default, Clone)]
pub struct TransferStats {
    /// Open checklist items found across fetched lists
    pub items_found: usize,
    /// Tasks created in the destination service
    pub tasks_created: usize,
    /// Source entries deleted after a full transfer
    pub items_deleted: usize,
    /// Per-item and per-list errors encountered
    pub errors: usize,
    /// Duration of the pass
    pub duration_ms: u64,
}

impl TransferStats {
    fn absorb(&mut self, other: TransferStats) {
        self.items_found += other.items_found;
        self.tasks_created += other.tasks_created;
        self.items_deleted += other.items_deleted;
        self.errors += other.errors;
    }
}

/// Routing resolved once per list: destination project and assignee
struct ListRouting {
    project_id: Option<ProjectId>,
    assignee_id: Option<String>,
}

/// Transfer all open items of one configured list
///
/// Every item is attempted independently: a failing item is recorded in
/// the tracker and skipped, the rest of the list continues. An item
/// counts as transferred only after create AND delete succeeded.
///
/// Returns `Err` only when the source list cannot be fetched at all.
pub fn transfer_list(
    source: &dyn NotesSource,
    sink: &dyn TaskSink,
    rule: &ListRule,
    tracker: &mut SyncErrorTracker,
) -> Result<TransferStats> {
    let start = std::time::Instant::now();
    let mut stats = TransferStats::default();

    let Some(list) = source.fetch_list(&rule.name)? else {
        debug!("keep list '{}' not found, nothing to transfer", rule.name);
        return Ok(stats);
    };

    stats.items_found = list.open_items().count();
    if stats.items_found == 0 {
        stats.duration_ms = start.elapsed().as_millis() as u64;
        return Ok(stats);
    }

    info!(
        "transferring {} item(s) from keep list '{}'",
        stats.items_found, rule.name
    );

    // Destination routing is resolved once per list. When it fails, the
    // items are known, so the failure is recorded per item (a broken
    // project keeps failing on every pass and must degrade health).
    let routing = match resolve_routing(sink, rule) {
        Ok(routing) => routing,
        Err(e) => {
            for item in list.open_items() {
                tracker.record_failure(&rule.name, &item.text, &e);
                stats.errors += 1;
            }
            stats.duration_ms = start.elapsed().as_millis() as u64;
            return Ok(stats);
        }
    };

    for item in list.open_items() {
        let mut task = NewTask::new(&item.text);
        task.project_id = routing.project_id.clone();
        task.due_string = rule.due_str_en.clone();
        task.assignee_id = routing.assignee_id.clone();
        if rule.sync_labels {
            task.labels = list.labels.clone();
        }

        match sink.create_task(&task) {
            Ok(task_id) => {
                stats.tasks_created += 1;
                debug!("created task {} for '{}'", task_id.as_str(), item.text);
            }
            Err(e) => {
                tracker.record_failure(&rule.name, &item.text, &e);
                stats.errors += 1;
                continue;
            }
        }

        match source.delete_item(&item.id) {
            Ok(()) => {
                stats.items_deleted += 1;
                tracker.record_success(&rule.name, &item.text);
                info!("\t-> {}", item.text);
            }
            Err(e) => {
                // The task exists but the source entry remains; the next
                // pass will try again and may create a duplicate task.
                tracker.record_failure(&rule.name, &item.text, &e);
                stats.errors += 1;
            }
        }
    }

    stats.duration_ms = start.elapsed().as_millis() as u64;
    Ok(stats)
}

/// Run a full transfer pass over all configured lists
///
/// A list-level failure is logged and counted, never aborts the pass.
pub fn run_pass(
    source: &dyn NotesSource,
    sink: &dyn TaskSink,
    rules: &[ListRule],
    tracker: &mut SyncErrorTracker,
) -> TransferStats {
    let start = std::time::Instant::now();
    let mut stats = TransferStats::default();

    for rule in rules {
        match transfer_list(source, sink, rule, tracker) {
            Ok(list_stats) => stats.absorb(list_stats),
            Err(e) => {
                warn!("could not fetch keep list '{}': {:#}", rule.name, e);
                stats.errors += 1;
            }
        }
    }

    stats.duration_ms = start.elapsed().as_millis() as u64;
    stats
}

/// Resolve the destination project and assignee configured for a list
fn resolve_routing(sink: &dyn TaskSink, rule: &ListRule) -> Result<ListRouting> {
    let Some(project_name) = &rule.todoist_project else {
        // No project configured: tasks go to the inbox, unassigned
        return Ok(ListRouting {
            project_id: None,
            assignee_id: None,
        });
    };

    let project_id = sink
        .project_id(project_name)?
        .ok_or_else(|| anyhow!("todoist project '{}' not found", project_name))?;

    let assignee_id = match &rule.assignee_email {
        Some(email) => {
            let id = sink.collaborator_id(&project_id, email)?;
            if id.is_none() {
                // Tolerated: the task is still created, just unassigned
                warn!(
                    "no collaborator with email '{}' in project '{}', creating unassigned",
                    email, project_name
                );
            }
            id
        }
        None => None,
    };

    Ok(ListRouting {
        project_id: Some(project_id),
        assignee_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteItem, NoteItemId, NoteList, TaskId};
    use anyhow::anyhow;
    use std::cell::RefCell;

    struct StaticSource {
        list: Option<NoteList>,
        deleted: RefCell<Vec<NoteItemId>>,
    }

    impl NotesSource for StaticSource {
        fn fetch_list(&self, title: &str) -> Result<Option<NoteList>> {
            Ok(self.list.clone().filter(|l| l.title == title))
        }

        fn delete_item(&self, id: &NoteItemId) -> Result<()> {
            self.deleted.borrow_mut().push(id.clone());
            Ok(())
        }
    }

    struct RecordingSink {
        created: RefCell<Vec<NewTask>>,
        reject_content: Option<String>,
    }

    impl TaskSink for RecordingSink {
        fn project_id(&self, name: &str) -> Result<Option<ProjectId>> {
            match name {
                "Shopping" => Ok(Some(ProjectId::new("p1"))),
                _ => Ok(None),
            }
        }

        fn collaborator_id(&self, _project: &ProjectId, email: &str) -> Result<Option<String>> {
            match email {
                "partner@example.com" => Ok(Some("42".to_string())),
                _ => Ok(None),
            }
        }

        fn create_task(&self, task: &NewTask) -> Result<TaskId> {
            if self.reject_content.as_deref() == Some(task.content.as_str()) {
                return Err(anyhow!("mocked rejection"));
            }
            self.created.borrow_mut().push(task.clone());
            Ok(TaskId::new(format!("t{}", self.created.borrow().len())))
        }
    }

    fn groceries() -> NoteList {
        let mut list = NoteList::new("notes/n1", "Groceries");
        list.items
            .push(NoteItem::new("notes/n1/listItems/i1", "milk"));
        list.items
            .push(NoteItem::new("notes/n1/listItems/i2", "eggs"));
        list.labels.push("shopping".to_string());
        list
    }

    fn rule() -> ListRule {
        ListRule {
            name: "Groceries".to_string(),
            todoist_project: Some("Shopping".to_string()),
            due_str_en: Some("today".to_string()),
            sync_labels: true,
            assignee_email: Some("partner@example.com".to_string()),
        }
    }

    #[test]
    fn test_transfer_list_happy_path() {
        let source = StaticSource {
            list: Some(groceries()),
            deleted: RefCell::new(Vec::new()),
        };
        let sink = RecordingSink {
            created: RefCell::new(Vec::new()),
            reject_content: None,
        };
        let mut tracker = SyncErrorTracker::default();

        let stats = transfer_list(&source, &sink, &rule(), &mut tracker).unwrap();

        assert_eq!(stats.items_found, 2);
        assert_eq!(stats.tasks_created, 2);
        assert_eq!(stats.items_deleted, 2);
        assert_eq!(stats.errors, 0);
        assert!(tracker.healthy());

        let created = sink.created.borrow();
        assert_eq!(created[0].content, "milk");
        assert_eq!(created[0].project_id, Some(ProjectId::new("p1")));
        assert_eq!(created[0].due_string.as_deref(), Some("today"));
        assert_eq!(created[0].labels, vec!["shopping"]);
        assert_eq!(created[0].assignee_id.as_deref(), Some("42"));

        assert_eq!(source.deleted.borrow().len(), 2);
    }

    #[test]
    fn test_failing_item_does_not_stop_the_list() {
        let source = StaticSource {
            list: Some(groceries()),
            deleted: RefCell::new(Vec::new()),
        };
        let sink = RecordingSink {
            created: RefCell::new(Vec::new()),
            reject_content: Some("milk".to_string()),
        };
        let mut tracker = SyncErrorTracker::new(2);

        let stats = transfer_list(&source, &sink, &rule(), &mut tracker).unwrap();

        assert_eq!(stats.tasks_created, 1);
        assert_eq!(stats.items_deleted, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(tracker.failure_count("Groceries", "milk"), 1);
        assert_eq!(tracker.failure_count("Groceries", "eggs"), 0);
        assert!(tracker.healthy());
    }

    #[test]
    fn test_missing_project_records_every_item() {
        let source = StaticSource {
            list: Some(groceries()),
            deleted: RefCell::new(Vec::new()),
        };
        let sink = RecordingSink {
            created: RefCell::new(Vec::new()),
            reject_content: None,
        };
        let mut rule = rule();
        rule.todoist_project = Some("Nonexistent".to_string());
        rule.assignee_email = None;
        let mut tracker = SyncErrorTracker::default();

        let stats = transfer_list(&source, &sink, &rule, &mut tracker).unwrap();

        assert_eq!(stats.tasks_created, 0);
        assert_eq!(stats.errors, 2);
        assert_eq!(tracker.failure_count("Groceries", "milk"), 1);
        assert_eq!(tracker.failure_count("Groceries", "eggs"), 1);
    }

    #[test]
    fn test_missing_list_is_a_noop() {
        let source = StaticSource {
            list: None,
            deleted: RefCell::new(Vec::new()),
        };
        let sink = RecordingSink {
            created: RefCell::new(Vec::new()),
            reject_content: None,
        };
        let mut tracker = SyncErrorTracker::default();

        let stats = transfer_list(&source, &sink, &rule(), &mut tracker).unwrap();

        assert_eq!(stats.items_found, 0);
        assert_eq!(stats.errors, 0);
        assert!(sink.created.borrow().is_empty());
    }

    #[test]
    fn test_unknown_assignee_creates_unassigned() {
        let source = StaticSource {
            list: Some(groceries()),
            deleted: RefCell::new(Vec::new()),
        };
        let sink = RecordingSink {
            created: RefCell::new(Vec::new()),
            reject_content: None,
        };
        let mut rule = rule();
        rule.assignee_email = Some("stranger@example.com".to_string());
        let mut tracker = SyncErrorTracker::default();

        let stats = transfer_list(&source, &sink, &rule, &mut tracker).unwrap();

        assert_eq!(stats.tasks_created, 2);
        assert!(sink.created.borrow()[0].assignee_id.is_none());
    }
}
