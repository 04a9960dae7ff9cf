use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tempfile::NamedTempFile;

/// Once the log grows past this many bytes, stale entries go on the next append
const TRIM_THRESHOLD_BYTES: u64 = 1 << 20;

/// Entries younger than this survive `tt recovery prune`
pub const PRUNE_AGE_DAYS: i64 = 30;

const LOG_PREAMBLE: &str = "\
<!-- thingtrack recovery log
     Unsaved writes and deleted items are kept here, newest at the bottom.
     `tt recovery` lists them, `tt recovery prune` drops old ones.
     The file may be removed once nothing in it is needed. -->

---
";

const SEPARATOR: &str = "---";

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryCategory {
    /// items.json could not be parsed
    Parser,
    /// A save failed; the body is the content that was not written
    Write,
    /// A deleted item, as JSON
    Delete,
}

impl RecoveryCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RecoveryCategory::Parser => "parser",
            RecoveryCategory::Write => "write",
            RecoveryCategory::Delete => "delete",
        }
    }
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecoveryCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            RecoveryCategory::Parser,
            RecoveryCategory::Write,
            RecoveryCategory::Delete,
        ]
        .into_iter()
        .find(|c| c.as_str() == s)
        .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: IndexMap<String, String>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: IndexMap::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    fn heading(&self) -> String {
        format!(
            "## {} {}: {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.category,
            self.description
        )
    }

    /// Markdown block as stored in the log, terminated by a `---` line
    pub fn to_markdown(&self) -> String {
        let mut lines = vec![self.heading(), String::new()];
        lines.extend(self.fields.iter().map(|(k, v)| format!("{}: {}", k, v)));
        if !self.body.is_empty() {
            lines.push(String::new());
            lines.push("```text".to_string());
            lines.extend(self.body.lines().map(str::to_string));
            lines.push("```".to_string());
        }
        lines.push(String::new());
        lines.push(SEPARATOR.to_string());

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Parse one block produced by `to_markdown`. Returns None for anything
    /// that does not start with a well-formed heading.
    fn from_block(block: &str) -> Option<Self> {
        let mut lines = block.lines().skip_while(|l| l.trim().is_empty());
        let (timestamp, category, description) = parse_heading(lines.next()?)?;

        let mut entry = RecoveryEntry {
            timestamp,
            category,
            description,
            fields: IndexMap::new(),
            body: String::new(),
        };
        let mut body_lines: Option<Vec<&str>> = None;
        for line in lines {
            match body_lines.as_mut() {
                Some(_) if line == "```" => break,
                Some(body) => body.push(line),
                None if line.starts_with("```") => body_lines = Some(Vec::new()),
                None => {
                    if let Some((k, v)) = line.trim().split_once(": ") {
                        entry.fields.insert(k.to_string(), v.to_string());
                    }
                }
            }
        }
        entry.body = body_lines.map(|b| b.join("\n")).unwrap_or_default();
        Some(entry)
    }
}

fn parse_heading(line: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let rest = line.strip_prefix("## ")?;
    let (stamp, rest) = rest.split_once(' ')?;
    let (category, description) = rest.split_once(": ")?;
    Some((
        DateTime::parse_from_rfc3339(stamp).ok()?.to_utc(),
        category.parse().ok()?,
        description.to_string(),
    ))
}

/// Split log text into entries, oldest first. Separator lines inside a
/// fenced body do not end the entry.
fn parse_log(content: &str) -> Vec<RecoveryEntry> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut fenced = false;
    for line in content.lines() {
        if line.starts_with("```") {
            fenced = !fenced;
        }
        if line == SEPARATOR && !fenced {
            blocks.push(std::mem::take(&mut current));
            continue;
        }
        current.push_str(line);
        current.push('\n');
    }
    blocks.push(current);

    blocks
        .iter()
        .filter_map(|b| RecoveryEntry::from_block(b))
        .collect()
}

fn render_log(entries: &[RecoveryEntry]) -> String {
    let mut out = String::from(LOG_PREAMBLE);
    for entry in entries {
        out.push_str(&entry.to_markdown());
    }
    out
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

pub fn recovery_log_path(things_dir: &Path) -> PathBuf {
    things_dir.join(".recovery.log")
}

/// Replace `path` with `content` via a sibling temp file and rename
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append `entry` to the log. A failure here only prints a warning.
pub fn log_recovery(things_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = append_entry(&recovery_log_path(things_dir), &entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn append_entry(path: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if size > TRIM_THRESHOLD_BYTES {
        // Best effort; the append below still happens if this fails
        let _ = drop_stale_entries(path);
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if file.metadata()?.len() == 0 {
        file.write_all(LOG_PREAMBLE.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())
}

pub fn log_item_deletion(things_dir: &Path, label: &str, item_json: &str) {
    log_recovery(
        things_dir,
        RecoveryEntry::new(RecoveryCategory::Delete, format!("item {} deleted", label))
            .field("Item", label)
            .body(item_json),
    );
}

/// Entries newest first, at most `limit` of them
pub fn read_recovery_entries(things_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let Ok(content) = fs::read_to_string(recovery_log_path(things_dir)) else {
        return Vec::new();
    };
    parse_log(&content)
        .into_iter()
        .rev()
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

/// Rewrite the log keeping entries newer than the cutoff. Returns how many were dropped.
fn drop_stale_entries(path: &Path) -> io::Result<usize> {
    let entries = parse_log(&fs::read_to_string(path)?);
    let cutoff = Utc::now() - TimeDelta::days(PRUNE_AGE_DAYS);
    let before = entries.len();
    let kept: Vec<RecoveryEntry> = entries.into_iter().filter(|e| e.timestamp >= cutoff).collect();
    let dropped = before - kept.len();
    if dropped > 0 {
        atomic_write(path, render_log(&kept).as_bytes())?;
    }
    Ok(dropped)
}

/// Drop entries older than `PRUNE_AGE_DAYS`, or every entry with `all`.
/// Returns the number removed.
pub fn prune_recovery(things_dir: &Path, all: bool) -> io::Result<usize> {
    let path = recovery_log_path(things_dir);
    if !path.exists() {
        return Ok(0);
    }
    if all {
        let count = parse_log(&fs::read_to_string(&path)?).len();
        atomic_write(&path, LOG_PREAMBLE.as_bytes())?;
        return Ok(count);
    }
    drop_stale_entries(&path)
}
