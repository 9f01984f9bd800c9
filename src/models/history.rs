//! Display history and command recall logs.

use serde::{Deserialize, Serialize};

use crate::utils::BoundedLog;

/// Identifier of a display history record.
pub type RecordId = u64;

/// One submitted command line and everything it printed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: RecordId,
    pub command_line: String,
    pub outputs: Vec<String>,
}

/// Display history plus the independent recall log used for up/down navigation.
#[derive(Clone, Debug)]
pub struct HistoryLog {
    records: BoundedLog<HistoryRecord>,
    recall: BoundedLog<String>,
    next_id: RecordId,
    /// Position in `recall` while navigating (`None` = editing a fresh line).
    recall_index: Option<usize>,
}

impl HistoryLog {
    pub fn new(max_records: usize, max_recall: usize) -> Self {
        Self {
            records: BoundedLog::new(max_records),
            recall: BoundedLog::new(max_recall),
            next_id: 0,
            recall_index: None,
        }
    }

    /// Rebuild a log from persisted sequences.
    pub fn restore(
        records: Vec<HistoryRecord>,
        recall: Vec<String>,
        max_records: usize,
        max_recall: usize,
    ) -> Self {
        let mut log = Self::new(max_records, max_recall);
        log.next_id = records.iter().map(|r| r.id + 1).max().unwrap_or(0);
        log.records.extend(records);
        log.recall.extend(recall);
        log
    }

    /// Start a new record for `command_line` and return its id.
    pub fn begin(&mut self, command_line: &str) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(HistoryRecord {
            id,
            command_line: command_line.to_string(),
            outputs: Vec::new(),
        });
        id
    }

    /// Append output to the record with `id`. Returns false if it is gone.
    pub fn append_to(&mut self, id: RecordId, output: String) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.outputs.push(output);
                true
            }
            None => false,
        }
    }

    /// Append output to whichever record is newest, creating an anonymous
    /// record when the display log is empty.
    pub fn append_to_latest(&mut self, output: String) {
        if let Some(record) = self.records.last_mut() {
            record.outputs.push(output);
            return;
        }
        let id = self.begin("");
        self.append_to(id, output);
    }

    /// Add a raw command line to the recall log, skipping direct repeats.
    pub fn remember(&mut self, command_line: &str) {
        if !command_line.trim().is_empty()
            && self.recall.last().map(String::as_str) != Some(command_line)
        {
            self.recall.push(command_line.to_string());
        }
        self.recall_index = None;
    }

    /// Step through the recall log. Negative direction goes back in time.
    pub fn navigate(&mut self, direction: i32) -> Option<String> {
        let len = self.recall.len();
        if len == 0 {
            return None;
        }

        let new_index = match self.recall_index {
            None if direction < 0 => Some(len - 1),
            Some(i) if direction < 0 && i > 0 => Some(i - 1),
            Some(i) if direction > 0 && i < len - 1 => Some(i + 1),
            Some(_) if direction > 0 => None,
            current => current,
        };

        self.recall_index = new_index;
        new_index.and_then(|i| self.recall.get(i).cloned())
    }

    /// Drop the display records only; recall survives.
    pub fn clear_display(&mut self) {
        self.records.clear();
    }

    /// Drop everything.
    pub fn clear_all(&mut self) {
        self.records.clear();
        self.recall.clear();
        self.recall_index = None;
    }

    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records.to_vec()
    }

    pub fn recall(&self) -> Vec<String> {
        self.recall.to_vec()
    }

    pub fn last_record(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_append() {
        let mut log = HistoryLog::new(10, 10);
        let id = log.begin("ls");
        assert!(log.append_to(id, "a".to_string()));
        assert_eq!(log.last_record().unwrap().outputs, vec!["a"]);
    }

    #[test]
    fn test_append_to_evicted_record() {
        let mut log = HistoryLog::new(1, 10);
        let first = log.begin("one");
        log.begin("two");
        assert!(!log.append_to(first, "late".to_string()));
    }

    #[test]
    fn test_append_to_latest_targets_newest() {
        let mut log = HistoryLog::new(10, 10);
        log.begin("first");
        log.begin("second");
        log.append_to_latest("extra".to_string());
        let records = log.records();
        assert!(records[0].outputs.is_empty());
        assert_eq!(records[1].outputs, vec!["extra"]);
    }

    #[test]
    fn test_clear_display_keeps_recall() {
        let mut log = HistoryLog::new(10, 10);
        log.begin("ls");
        log.remember("ls");
        log.clear_display();
        assert!(log.records().is_empty());
        assert_eq!(log.recall(), vec!["ls"]);

        log.clear_all();
        assert!(log.recall().is_empty());
    }

    #[test]
    fn test_remember_skips_repeats_and_blank() {
        let mut log = HistoryLog::new(10, 10);
        log.remember("ls");
        log.remember("ls");
        log.remember("   ");
        log.remember("pwd");
        assert_eq!(log.recall(), vec!["ls", "pwd"]);
    }

    #[test]
    fn test_navigate() {
        let mut log = HistoryLog::new(10, 10);
        log.remember("ls");
        log.remember("pwd");
        assert_eq!(log.navigate(-1).as_deref(), Some("pwd"));
        assert_eq!(log.navigate(-1).as_deref(), Some("ls"));
        assert_eq!(log.navigate(-1).as_deref(), Some("ls"));
        assert_eq!(log.navigate(1).as_deref(), Some("pwd"));
        assert_eq!(log.navigate(1), None);
    }

    #[test]
    fn test_restore_continues_ids() {
        let records = vec![HistoryRecord {
            id: 7,
            command_line: "ls".to_string(),
            outputs: vec![],
        }];
        let mut log = HistoryLog::restore(records, vec!["ls".to_string()], 10, 10);
        assert_eq!(log.begin("pwd"), 8);
        assert_eq!(log.recall(), vec!["ls"]);
    }
}
