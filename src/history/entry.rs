//! Completion record structure

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// One completed countdown: the task name and when it was started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Task name, recorded verbatim (may be empty)
    pub task: String,
    /// Start instant in epoch milliseconds
    pub started_at: i64,
}

impl HistoryEntry {
    /// Create a new history entry
    pub fn new(task: impl Into<String>, started_at: i64) -> Self {
        Self {
            task: task.into(),
            started_at,
        }
    }

    /// Start instant as a UTC timestamp, if it is representable
    pub fn started_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.started_at)
    }

    /// Render the entry as a history list line: local start time, then the task
    pub fn display_line(&self) -> String {
        match self.started_at_utc() {
            Some(utc) => format!(
                "{} {}",
                utc.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
                self.task
            ),
            None => format!("{} {}", self.started_at, self.task),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_fields() {
        let entry = HistoryEntry::new("write report", 1_700_000_000_123);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"task":"write report","startedAt":1700000000123}"#);
    }

    #[test]
    fn started_at_utc_keeps_millis() {
        let entry = HistoryEntry::new("", 1_700_000_000_123);
        let utc = entry.started_at_utc().unwrap();
        assert_eq!(utc.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn display_line_ends_with_task() {
        let entry = HistoryEntry::new("write report", 1_700_000_000_000);
        let line = entry.display_line();
        assert!(line.ends_with(" write report"));
        // "YYYY-MM-DD HH:MM:SS " prefix
        assert_eq!(line.len(), 20 + "write report".len());
    }

    #[test]
    fn display_line_falls_back_to_raw_millis() {
        let entry = HistoryEntry::new("x", i64::MAX);
        assert_eq!(entry.display_line(), format!("{} x", i64::MAX));
    }
}
