//! In-memory sink
//!
//! Keeps every record with its level. Clones share the same storage, so a
//! test can hand one clone to the logger and inspect the other.

use crate::core::{Level, Result, Sink};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<(Level, Vec<u8>)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record written so far, in order
    pub fn records(&self) -> Vec<(Level, Vec<u8>)> {
        self.records.lock().clone()
    }

    /// All records concatenated, as a file sink would have written them
    pub fn contents(&self) -> Vec<u8> {
        self.records
            .lock()
            .iter()
            .flat_map(|(_, bytes)| bytes.iter().copied())
            .collect()
    }

    /// Records as text without their line terminator
    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|(_, bytes)| {
                let text = String::from_utf8_lossy(bytes);
                text.strip_suffix('\n').unwrap_or(&text[..]).to_string()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, level: Level, _now: &DateTime<Local>, bytes: &[u8]) -> Result<usize> {
        self.records.lock().push((level, bytes.to_vec()));
        Ok(bytes.len())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
