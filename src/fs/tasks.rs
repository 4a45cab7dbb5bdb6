use std::cell::Cell;
use std::io;
use std::path::PathBuf;

use chrono::Local;

use crate::error::ArchiveError;
use crate::fs::backing::{Backing, FileBacking};
use crate::fs::history::HistoryStore;
use crate::fs::record::{log_skipped, parse_record, render_record};
use crate::models::{HistoryEntry, Task, TaskStatus};

/// The active task set, one record line per task. Records have no stable
/// identifier other than file position, so every mutation besides creation
/// rewrites the whole file.
pub struct TaskStore<B = FileBacking> {
    backing: B,
    skipped: Cell<usize>,
}

impl TaskStore<FileBacking> {
    /// Store over the flat file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_backing(FileBacking::new(path))
    }
}

impl<B: Backing> TaskStore<B> {
    pub fn with_backing(backing: B) -> Self {
        Self {
            backing,
            skipped: Cell::new(0),
        }
    }

    /// Load the active tasks, oldest record first. Runs the deadline-breach
    /// sweep before returning: every record still due past its deadline
    /// becomes failed as of today, and the transition is persisted. When
    /// `owner` is given the result is filtered to that owner's records; the
    /// sweep still covers the whole file so no one else's records are
    /// dropped by the persisted rewrite.
    pub fn load(&self, owner: Option<&str>) -> io::Result<Vec<Task>> {
        let mut tasks = self.parse_all()?;

        let now = Local::now().naive_local();
        let mut swept = false;
        for task in &mut tasks {
            if task.status == TaskStatus::Due && task.deadline < now {
                *task = task.mark_failed(now.date());
                swept = true;
            }
        }
        if swept {
            self.rewrite(&tasks)?;
        }

        if let Some(owner) = owner {
            tasks.retain(|t| t.owner.as_deref() == Some(owner));
        }
        Ok(tasks)
    }

    /// Add one task at the end of the file.
    pub fn append(&self, task: &Task) -> io::Result<()> {
        self.backing.append(&render_record(task))
    }

    /// Replace the whole file with the given ordered sequence.
    pub fn rewrite(&self, tasks: &[Task]) -> io::Result<()> {
        let mut contents = String::new();
        for task in tasks {
            contents.push_str(&render_record(task));
            contents.push('\n');
        }
        self.backing.write(&contents)
    }

    /// Move a terminal task into the history log and drop it from the
    /// active set. A task that is still due is refused and neither store is
    /// touched.
    pub fn archive_into<H: Backing>(
        &self,
        task: &Task,
        history: &HistoryStore<H>,
    ) -> Result<(), ArchiveError> {
        if !task.status.is_terminal() {
            return Err(ArchiveError::NotTerminal);
        }

        let mut tasks = self.parse_all()?;
        let index = tasks
            .iter()
            .position(|t| t == task)
            .ok_or(ArchiveError::NotFound)?;

        history.append(&HistoryEntry::new(task.clone()))?;
        tasks.remove(index);
        self.rewrite(&tasks)?;
        Ok(())
    }

    /// Lines dropped as malformed during the most recent load.
    pub fn skipped_lines(&self) -> usize {
        self.skipped.get()
    }

    fn parse_all(&self) -> io::Result<Vec<Task>> {
        let mut tasks = Vec::new();
        let mut skipped = 0;

        if let Some(contents) = self.backing.read()? {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_record(line) {
                    Ok(task) => tasks.push(task),
                    Err(reason) => {
                        log_skipped("tasks", &reason, line);
                        skipped += 1;
                    }
                }
            }
        }

        self.skipped.set(skipped);
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::backing::MemBacking;
    use crate::models::Priority;
    use chrono::{Days, NaiveDateTime};

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn sample(name: &str) -> Task {
        Task::new(
            name,
            "a description",
            dt("2099-03-10 09:00"),
            dt("2099-03-14 17:00"),
            Priority::Medium,
        )
        .unwrap()
    }

    #[test]
    fn test_append_then_load_roundtrip() {
        let store = TaskStore::with_backing(MemBacking::new());
        let task = sample("Write report");
        store.append(&task).unwrap();

        let loaded = store.load(None).unwrap();
        assert_eq!(loaded, vec![task]);
        assert_eq!(store.skipped_lines(), 0);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path().join("tasks.txt"));
        assert_eq!(store.load(None).unwrap(), Vec::new());
    }

    #[test]
    fn test_malformed_lines_skipped_and_counted() {
        let backing = MemBacking::new();
        backing.append("not a record at all").unwrap();
        let store = TaskStore::with_backing(backing);
        store.append(&sample("Write report")).unwrap();

        let loaded = store.load(None).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(store.skipped_lines(), 1);
    }

    #[test]
    fn test_owner_filter() {
        let store = TaskStore::with_backing(MemBacking::new());
        store.append(&sample("Shared").with_owner("alice")).unwrap();
        store.append(&sample("Other").with_owner("bob")).unwrap();
        store.append(&sample("Unowned")).unwrap();

        let alice = store.load(Some("alice")).unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].name, "Shared");

        // ownerless records belong to no one in a scoped load
        let nobody = store.load(Some("")).unwrap();
        assert!(nobody.is_empty());

        assert_eq!(store.load(None).unwrap().len(), 3);
    }

    #[test]
    fn test_rewrite_load_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        let store = TaskStore::open(&path);
        store.append(&sample("First")).unwrap();
        store.append(&sample("Second").with_owner("alice")).unwrap();

        let before = std::fs::read_to_string(&path).unwrap();
        let loaded = store.load(None).unwrap();
        store.rewrite(&loaded).unwrap();
        let after = std::fs::read_to_string(&path).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_sweep_fails_breached_tasks_and_persists() {
        let store = TaskStore::with_backing(MemBacking::new());
        let today = Local::now().date_naive();

        let breached = Task::new(
            "Overdue",
            "",
            dt("2020-01-01 09:00"),
            dt("2020-01-02 09:00"),
            Priority::Low,
        )
        .unwrap();
        let pending = sample("Still pending");
        store.append(&breached).unwrap();
        store.append(&pending).unwrap();

        let loaded = store.load(None).unwrap();
        assert_eq!(
            loaded[0].status,
            TaskStatus::Failed {
                failed_on: Some(today)
            }
        );
        assert_eq!(loaded[1].status, TaskStatus::Due);

        // the transition was persisted: a second load sees the same failed
        // record rather than sweeping again
        let reloaded = store.load(None).unwrap();
        assert_eq!(reloaded, loaded);
    }

    #[test]
    fn test_sweep_covers_other_owners_in_scoped_load() {
        let store = TaskStore::with_backing(MemBacking::new());
        let overdue = |name: &str, owner: &str| {
            Task::new(
                name,
                "",
                dt("2020-01-01 09:00"),
                dt("2020-01-02 09:00"),
                Priority::Low,
            )
            .unwrap()
            .with_owner(owner)
        };
        store.append(&overdue("A", "alice")).unwrap();
        store.append(&overdue("B", "bob")).unwrap();

        // loading alice's view sweeps (and keeps) bob's record as well
        let alice = store.load(Some("alice")).unwrap();
        assert!(alice[0].status.is_terminal());

        let bob = store.load(Some("bob")).unwrap();
        assert_eq!(bob.len(), 1);
        assert!(bob[0].status.is_terminal());
    }

    #[test]
    fn test_archive_refuses_due_task_without_mutation() {
        let store = TaskStore::with_backing(MemBacking::new());
        let history = HistoryStore::with_backing(MemBacking::new());
        let task = sample("Write report");
        store.append(&task).unwrap();

        let result = store.archive_into(&task, &history);
        assert!(matches!(result, Err(ArchiveError::NotTerminal)));

        // both stores byte-identical to their pre-call state
        assert_eq!(store.load(None).unwrap(), vec![task]);
        let report = history
            .query(
                None,
                (
                    chrono::NaiveDate::MIN,
                    chrono::NaiveDate::MAX,
                ),
                crate::models::StatusFilter::All,
            )
            .unwrap();
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_archive_moves_terminal_task() {
        let store = TaskStore::with_backing(MemBacking::new());
        let history = HistoryStore::with_backing(MemBacking::new());
        let task = sample("Write report");
        let keep = sample("Keep me");
        store.append(&task).unwrap();
        store.append(&keep).unwrap();

        let today = Local::now().date_naive();
        let done = task.mark_done(today);
        store.rewrite(&[done.clone(), keep.clone()]).unwrap();

        store.archive_into(&done, &history).unwrap();
        assert_eq!(store.load(None).unwrap(), vec![keep]);

        let report = history
            .query(
                None,
                (today - Days::new(1), today),
                crate::models::StatusFilter::Done,
            )
            .unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].task, done);
    }

    #[test]
    fn test_archive_unknown_task_is_not_found() {
        let store = TaskStore::with_backing(MemBacking::new());
        let history = HistoryStore::with_backing(MemBacking::new());
        let ghost = sample("Ghost").mark_done(Local::now().date_naive());

        let result = store.archive_into(&ghost, &history);
        assert!(matches!(result, Err(ArchiveError::NotFound)));
    }
}
