//! Deadline-window views over a loaded task list, backing the Today /
//! Weekly / Monthly sections of a task board.

use chrono::{Days, NaiveDate};

use crate::models::{Task, TaskStatus};

/// Pending tasks whose deadline falls on `today`.
pub fn due_today(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    due_within(tasks, today, 1)
}

/// Pending tasks due in the next 7 days, `today` included.
pub fn due_this_week(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    due_within(tasks, today, 7)
}

/// Pending tasks due in the next 30 days, `today` included.
pub fn due_this_month(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    due_within(tasks, today, 30)
}

/// Pending tasks whose deadline date lands in the `days`-day window
/// starting at `from` (inclusive on both ends). Terminal tasks never
/// appear, whatever their deadline.
pub fn due_within(tasks: &[Task], from: NaiveDate, days: u32) -> Vec<&Task> {
    let days = days.max(1);
    let end = from + Days::new(u64::from(days) - 1);
    tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Due)
        .filter(|t| {
            let deadline = t.deadline.date();
            deadline >= from && deadline <= end
        })
        .collect()
}
