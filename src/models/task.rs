use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// Wire format for start times and deadlines.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Wire format for the dates embedded in terminal status annotations.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::None => "None",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim() {
            "None" => Some(Priority::None),
            "Low" => Some(Priority::Low),
            "Medium" => Some(Priority::Medium),
            "High" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Task state, kept separate from its display text. `render` produces the
/// legacy annotation shape the flat files carry; `parse` accepts it back,
/// including bare "failed ❌" records written without a failure date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Due,
    Done { completed_on: NaiveDate },
    Failed { failed_on: Option<NaiveDate> },
}

impl TaskStatus {
    /// A terminal task is eligible for archival.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Due)
    }

    /// The date a terminal status carries, if it carries one.
    pub fn completion_date(&self) -> Option<NaiveDate> {
        match self {
            TaskStatus::Due => None,
            TaskStatus::Done { completed_on } => Some(*completed_on),
            TaskStatus::Failed { failed_on } => *failed_on,
        }
    }

    /// Render to the legacy status text.
    pub fn render(&self) -> String {
        match self {
            TaskStatus::Due => "due".to_string(),
            TaskStatus::Done { completed_on } => {
                format!("done ✅ - Completed on {}", completed_on.format(DATE_FORMAT))
            }
            TaskStatus::Failed { failed_on: Some(day) } => {
                format!("failed ❌ - Failed on {}", day.format(DATE_FORMAT))
            }
            TaskStatus::Failed { failed_on: None } => "failed ❌".to_string(),
        }
    }

    /// Parse a legacy status text. Returns `None` for anything that is not
    /// recognizable as due, done-with-date, or failed.
    pub fn parse(s: &str) -> Option<TaskStatus> {
        let s = s.trim();
        if s == "due" {
            return Some(TaskStatus::Due);
        }
        let lower = s.to_lowercase();
        if lower.contains("failed") {
            return Some(TaskStatus::Failed {
                failed_on: trailing_date(s),
            });
        }
        if lower.contains("done") {
            return trailing_date(s).map(|completed_on| TaskStatus::Done { completed_on });
        }
        None
    }
}

/// The annotation embeds its date after the last "on ", as in
/// "done ✅ - Completed on 2025-03-14".
fn trailing_date(s: &str) -> Option<NaiveDate> {
    let (_, tail) = s.rsplit_once("on ")?;
    NaiveDate::parse_from_str(tail.trim(), DATE_FORMAT).ok()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub deadline: NaiveDateTime,
    pub priority: Priority,
    pub status: TaskStatus,
    /// Present only on records written in multi-user mode. Absence is
    /// distinguished from an empty string.
    pub owner: Option<String>,
}

impl Task {
    /// Validates and builds a new pending task. Rejections happen here,
    /// before any store is touched.
    pub fn new(
        name: &str,
        description: &str,
        start_time: NaiveDateTime,
        deadline: NaiveDateTime,
        priority: Priority,
    ) -> Result<Task, TaskError> {
        if name.trim().is_empty() {
            return Err(TaskError::EmptyName);
        }
        if deadline <= start_time {
            return Err(TaskError::DeadlineNotAfterStart);
        }
        Ok(Task {
            name: name.to_string(),
            description: description.to_string(),
            start_time,
            deadline,
            priority,
            status: TaskStatus::Due,
            owner: None,
        })
    }

    pub fn with_owner(mut self, owner: &str) -> Task {
        self.owner = Some(owner.to_string());
        self
    }

    /// Copy of this task marked done on the given date.
    pub fn mark_done(&self, completed_on: NaiveDate) -> Task {
        Task {
            status: TaskStatus::Done { completed_on },
            ..self.clone()
        }
    }

    /// Copy of this task marked failed on the given date.
    pub fn mark_failed(&self, failed_on: NaiveDate) -> Task {
        Task {
            status: TaskStatus::Failed {
                failed_on: Some(failed_on),
            },
            ..self.clone()
        }
    }
}
