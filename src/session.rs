//! JSONL chat transcript store — append-only, one entry per message.
//!
//! Transcripts are diagnostics, not state: a write failure is logged by the
//! caller and never fails a chat turn.
//!
//! Format:
//! ```jsonl
//! {"id":"a1","sender":"alice","role":"user","content":"hello","ts":1700000000}
//! {"id":"a2","sender":"alice","role":"advisor","content":"hi","ts":1700000001}
//! ```

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADVISOR: &str = "advisor";

/// A single transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: String,
    pub sender: String,
    pub role: String,
    pub content: String,
    pub ts: i64,
}

/// Append-only JSONL transcript store, one file per agent.
pub struct TranscriptStore {
    path: PathBuf,
}

impl TranscriptStore {
    /// Open (or create) the transcript file for an agent under `dir`.
    pub fn open(dir: &Path, agent_id: &str) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(format!("{}.jsonl", agent_id)),
        })
    }

    /// Append one entry.
    pub fn append(&self, sender: &str, role: &str, content: &str) -> std::io::Result<()> {
        let entry = TranscriptEntry {
            id: Uuid::new_v4().to_string(),
            sender: sender.to_string(),
            role: role.to_string(),
            content: content.to_string(),
            ts: chrono::Utc::now().timestamp(),
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Load every entry from the transcript file.
    pub fn load_all(&self) -> std::io::Result<Vec<TranscriptEntry>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let reader = BufReader::new(file);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let entry: TranscriptEntry = serde_json::from_str(trimmed)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Entries for one sender, in append order.
    pub fn for_sender(&self, sender: &str) -> std::io::Result<Vec<TranscriptEntry>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|e| e.sender == sender)
            .collect())
    }
}
