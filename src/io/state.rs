use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Search query in effect when the TUI last closed
    #[serde(default)]
    pub query: String,
    /// Window start relative to today, in days
    #[serde(default)]
    pub window_offset_days: i64,
    /// Cursor row
    #[serde(default)]
    pub cursor: usize,
}

/// Read .state.json from the things directory
pub fn read_ui_state(things_dir: &Path) -> Option<UiState> {
    let path = things_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write .state.json to the things directory
pub fn write_ui_state(things_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = things_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
