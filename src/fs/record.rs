use crate::models::task::{DATETIME_FORMAT, Priority, Task, TaskStatus};
use chrono::NaiveDateTime;

/// Field separator of the flat record files. Fields containing this exact
/// sequence do not survive a round trip.
pub const FIELD_SEPARATOR: &str = " | ";

/// Fields of an ownerless task record; a record written in multi-user mode
/// carries one more.
pub const FIELD_COUNT: usize = 6;

/// Parse one task/history record line.
/// Format:
/// ```text
/// name | description | start_time | deadline | priority | status [| owner]
/// ```
pub fn parse_record(line: &str) -> Result<Task, String> {
    let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if parts.len() != FIELD_COUNT && parts.len() != FIELD_COUNT + 1 {
        return Err(format!(
            "expected {} or {} fields, got {}",
            FIELD_COUNT,
            FIELD_COUNT + 1,
            parts.len()
        ));
    }

    let start_time = NaiveDateTime::parse_from_str(parts[2], DATETIME_FORMAT)
        .map_err(|e| format!("bad start time '{}': {}", parts[2], e))?;
    let deadline = NaiveDateTime::parse_from_str(parts[3], DATETIME_FORMAT)
        .map_err(|e| format!("bad deadline '{}': {}", parts[3], e))?;
    let priority =
        Priority::parse(parts[4]).ok_or_else(|| format!("unknown priority '{}'", parts[4]))?;
    let status =
        TaskStatus::parse(parts[5]).ok_or_else(|| format!("unrecognized status '{}'", parts[5]))?;

    Ok(Task {
        name: parts[0].to_string(),
        description: parts[1].to_string(),
        start_time,
        deadline,
        priority,
        status,
        owner: parts.get(FIELD_COUNT).map(|s| s.to_string()),
    })
}

/// Generate the record line for a task, without the trailing newline.
pub fn render_record(task: &Task) -> String {
    let mut fields = vec![
        task.name.clone(),
        task.description.clone(),
        task.start_time.format(DATETIME_FORMAT).to_string(),
        task.deadline.format(DATETIME_FORMAT).to_string(),
        task.priority.as_str().to_string(),
        task.status.render(),
    ];
    if let Some(owner) = &task.owner {
        fields.push(owner.clone());
    }
    fields.join(FIELD_SEPARATOR)
}

/// Record a skipped line in the debug log file. Loads drop malformed lines
/// rather than failing; the log keeps the drops visible.
pub(crate) fn log_skipped(store: &str, reason: &str, line: &str) {
    use std::fs::OpenOptions;
    use std::io::Write;

    let path = std::env::temp_dir().join("plaintask_debug.log");
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(
            file,
            "[{}] {}: skipped record: {}",
            chrono::Local::now().format("%H:%M:%S"),
            store,
            reason
        );
        let _ = writeln!(file, "  {}", line);
    }
}
