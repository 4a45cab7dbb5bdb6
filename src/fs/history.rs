use std::cell::Cell;
use std::io;
use std::path::PathBuf;

use chrono::{Days, NaiveDate};

use crate::fs::backing::{Backing, FileBacking};
use crate::fs::record::{log_skipped, parse_record, render_record};
use crate::models::{HistoryEntry, HistoryReport, StatusFilter, TaskStatus};

/// Append-only archive of terminal tasks. Nothing here ever rewrites the
/// file; queries re-parse it in full.
pub struct HistoryStore<B = FileBacking> {
    backing: B,
    skipped: Cell<usize>,
}

impl HistoryStore<FileBacking> {
    /// Store over the flat file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_backing(FileBacking::new(path))
    }
}

impl<B: Backing> HistoryStore<B> {
    pub fn with_backing(backing: B) -> Self {
        Self {
            backing,
            skipped: Cell::new(0),
        }
    }

    /// Add one archived snapshot at the end of the file.
    pub fn append(&self, entry: &HistoryEntry) -> io::Result<()> {
        self.backing.append(&render_record(&entry.task))
    }

    /// Entries whose completion date falls inside `range` (inclusive),
    /// owner-scoped when `owner` is given, narrowed by `filter`. The report
    /// carries the matching entries in file order plus per-day done/failed
    /// counts. Records without a recoverable completion date are skipped
    /// and counted, like malformed lines.
    pub fn query(
        &self,
        owner: Option<&str>,
        range: (NaiveDate, NaiveDate),
        filter: StatusFilter,
    ) -> io::Result<HistoryReport> {
        let (start, end) = range;
        let mut report = HistoryReport::default();
        let mut skipped = 0;

        if let Some(contents) = self.backing.read()? {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let task = match parse_record(line) {
                    Ok(task) => task,
                    Err(reason) => {
                        log_skipped("history", &reason, line);
                        skipped += 1;
                        continue;
                    }
                };
                let Some(date) = task.status.completion_date() else {
                    log_skipped("history", "no completion date in status", line);
                    skipped += 1;
                    continue;
                };

                if let Some(owner) = owner {
                    if task.owner.as_deref() != Some(owner) {
                        continue;
                    }
                }
                if date < start || date > end {
                    continue;
                }
                if !filter.admits(&task.status) {
                    continue;
                }

                match &task.status {
                    TaskStatus::Done { .. } => *report.done.entry(date).or_insert(0) += 1,
                    TaskStatus::Failed { .. } => *report.failed.entry(date).or_insert(0) += 1,
                    TaskStatus::Due => {}
                }
                report.entries.push(HistoryEntry::new(task));
            }
        }

        self.skipped.set(skipped);
        Ok(report)
    }

    /// Per-day done counts for the trailing window of `days` days ending at
    /// `ending`, zero-filled so every day of the window is present. This is
    /// the series behind the last-7/last-30-days completion chart.
    pub fn completion_series(
        &self,
        owner: Option<&str>,
        days: u32,
        ending: NaiveDate,
    ) -> io::Result<Vec<(NaiveDate, u32)>> {
        let days = days.max(1);
        let start = ending - Days::new(u64::from(days) - 1);
        let report = self.query(owner, (start, ending), StatusFilter::Done)?;

        let mut series = Vec::with_capacity(days as usize);
        let mut day = start;
        while day <= ending {
            series.push((day, report.done.get(&day).copied().unwrap_or(0)));
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        Ok(series)
    }

    /// Lines dropped during the most recent query, malformed or dateless.
    pub fn skipped_lines(&self) -> usize {
        self.skipped.get()
    }
}
