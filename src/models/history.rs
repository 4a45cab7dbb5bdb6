use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::task::{Task, TaskStatus};

/// A task snapshot taken at the moment it left the active store. Entries
/// are append-only; nothing mutates or deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub task: Task,
}

impl HistoryEntry {
    pub fn new(task: Task) -> Self {
        Self { task }
    }

    /// The date embedded in the terminal status, if the record carries one.
    pub fn completion_date(&self) -> Option<NaiveDate> {
        self.task.status.completion_date()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Done,
    Failed,
}

impl StatusFilter {
    pub fn admits(&self, status: &TaskStatus) -> bool {
        match self {
            StatusFilter::All => status.is_terminal(),
            StatusFilter::Done => matches!(status, TaskStatus::Done { .. }),
            StatusFilter::Failed => matches!(status, TaskStatus::Failed { .. }),
        }
    }
}

/// Query result: the matching entries in file order, plus the per-day
/// aggregates a chart renderer consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryReport {
    pub entries: Vec<HistoryEntry>,
    pub done: BTreeMap<NaiveDate, u32>,
    pub failed: BTreeMap<NaiveDate, u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_filter_admits() {
        let done = TaskStatus::Done {
            completed_on: day("2025-03-14"),
        };
        let failed = TaskStatus::Failed {
            failed_on: Some(day("2025-03-15")),
        };

        assert!(StatusFilter::All.admits(&done));
        assert!(StatusFilter::All.admits(&failed));
        assert!(!StatusFilter::All.admits(&TaskStatus::Due));

        assert!(StatusFilter::Done.admits(&done));
        assert!(!StatusFilter::Done.admits(&failed));

        assert!(StatusFilter::Failed.admits(&failed));
        assert!(!StatusFilter::Failed.admits(&done));
    }
}
