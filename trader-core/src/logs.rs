use crate::error::Result;
use crate::models::{LogDraft, LogEntry, LogKind, LogStats};
use chrono::Local;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CSV_HEADER: &str = "Timestamp,Type,Wallet,Message,Amount";

/// Size-bounded log buffer. Oldest entries are evicted first.
#[derive(Debug)]
pub struct LogBuffer {
    capacity: usize,
    next_id: u64,
    entries: VecDeque<LogEntry>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            next_id: 1,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn append(&mut self, draft: LogDraft) -> &LogEntry {
        let entry = LogEntry {
            id: self.next_id,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            kind: draft.kind,
            wallet_id: draft.wallet_id,
            message: draft.message,
            amount: draft.amount,
        };
        self.next_id += 1;

        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Drops every entry. Ids keep counting from where they were.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> LogStats {
        self.entries.iter().fold(LogStats::default(), |mut stats, entry| {
            stats.total += 1;
            match entry.kind {
                LogKind::Success => stats.success += 1,
                LogKind::Error => stats.errors += 1,
                LogKind::Warning => stats.warnings += 1,
                LogKind::Info => stats.info += 1,
            }
            stats.volume += entry.amount.unwrap_or(0.0);
            stats
        })
    }

    /// Header plus one row per entry, or `None` when there is nothing to export.
    pub fn to_csv(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let mut csv = String::from(CSV_HEADER);
        for entry in &self.entries {
            csv.push('\n');
            csv.push_str(&csv_row(entry));
        }
        Some(csv)
    }

    pub fn export_to(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let Some(csv) = self.to_csv() else {
            return Ok(None);
        };
        let path = dir.join(format!("trading-logs-{}.csv", Local::now().format("%Y-%m-%d")));
        fs::write(&path, csv)?;
        info!(path = %path.display(), rows = self.entries.len(), "exported trading logs");
        Ok(Some(path))
    }
}

fn csv_row(entry: &LogEntry) -> String {
    let amount = entry.amount.map(|a| format!("{a:.2}")).unwrap_or_default();
    format!(
        "{},{},Wallet #{},\"{}\",{}",
        entry.timestamp,
        entry.kind,
        entry.wallet_id,
        entry.message.replace('"', "\"\""),
        amount
    )
}
