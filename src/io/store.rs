use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::config::WorkspaceConfig;
use crate::model::item::Item;
use crate::model::workspace::Workspace;

/// Error type for workspace and item-file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not a thingtrack workspace: no things/ directory found (try `tt init`)")]
    NotAWorkspace,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ItemsParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize items: {0}")]
    ItemsSerializeError(#[from] serde_json::Error),
    #[error("could not parse config.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The flat item file: full read on load, full overwrite on save.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    things_dir: PathBuf,
}

impl Store {
    pub fn new(things_dir: &Path) -> Self {
        Store {
            path: things_dir.join("items.json"),
            things_dir: things_dir.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn things_dir(&self) -> &Path {
        &self.things_dir
    }

    /// Load all items. A missing file is an empty list.
    pub fn load(&self) -> Result<Vec<Item>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        parse_items(&text).map_err(|e| {
            recovery::log_recovery(
                &self.things_dir,
                RecoveryEntry::new(RecoveryCategory::Parser, "items.json unreadable")
                    .field("Error", e.to_string()),
            );
            StoreError::ItemsParseError {
                path: self.path.clone(),
                source: e,
            }
        })
    }

    /// Overwrite the item file with `items`.
    ///
    /// On failure the payload is kept in the recovery log.
    pub fn save(&self, items: &[Item]) -> Result<(), StoreError> {
        let content = serialize_items(items)?;
        if let Err(e) = recovery::atomic_write(&self.path, content.as_bytes()) {
            recovery::log_recovery(
                &self.things_dir,
                RecoveryEntry::new(RecoveryCategory::Write, "items write failed")
                    .field("Target", "items.json")
                    .field("Error", e.to_string())
                    .body(content),
            );
            return Err(StoreError::WriteError {
                path: self.path.clone(),
                source: e,
            });
        }
        Ok(())
    }
}

pub fn parse_items(text: &str) -> Result<Vec<Item>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Pretty JSON, 2-space indent, trailing newline
pub fn serialize_items(items: &[Item]) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(items)?;
    out.push('\n');
    Ok(out)
}

// ---------------------------------------------------------------------------
// Workspace discovery
// ---------------------------------------------------------------------------

/// Walk up from `start` looking for a `things/` directory with a config.toml.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, StoreError> {
    let mut current = start.to_path_buf();
    loop {
        let things_dir = current.join("things");
        if things_dir.is_dir() && things_dir.join("config.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(StoreError::NotAWorkspace);
        }
    }
}

/// Load the workspace rooted at `root` (the directory containing `things/`).
pub fn load_workspace(root: &Path) -> Result<Workspace, StoreError> {
    let things_dir = root.join("things");
    if !things_dir.is_dir() {
        return Err(StoreError::NotAWorkspace);
    }

    let config_path = things_dir.join("config.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| StoreError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: WorkspaceConfig = toml::from_str(&config_text)?;

    Ok(Workspace {
        root: root.to_path_buf(),
        things_dir,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{Priority, Recurrence};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_workspace(dir: &Path) {
        let things_dir = dir.join("things");
        fs::create_dir_all(&things_dir).unwrap();
        fs::write(
            things_dir.join("config.toml"),
            "[workspace]\nname = \"test\"\n",
        )
        .unwrap();
    }

    #[test]
    fn test_discover_workspace() {
        let tmp = TempDir::new().unwrap();
        create_test_workspace(tmp.path());
        let sub = tmp.path().join("a/b");
        fs::create_dir_all(&sub).unwrap();

        assert_eq!(discover_workspace(tmp.path()).unwrap(), tmp.path());
        assert_eq!(discover_workspace(&sub).unwrap(), tmp.path());
    }

    #[test]
    fn test_discover_workspace_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_workspace(tmp.path()),
            Err(StoreError::NotAWorkspace)
        ));
    }

    #[test]
    fn test_load_workspace() {
        let tmp = TempDir::new().unwrap();
        create_test_workspace(tmp.path());
        let ws = load_workspace(tmp.path()).unwrap();
        assert_eq!(ws.config.workspace.name, "test");
        assert_eq!(ws.items_path(), tmp.path().join("things/items.json"));
    }

    #[test]
    fn test_missing_items_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        let mut item = Item::new("Gym");
        item.tags = vec!["health".into()];
        item.start_date = "2024-01-01".into();
        item.due_date = "2024-01-01".into();
        item.priority = Priority::High;
        item.recurrence = Recurrence::Weekly;
        item.fields.insert("coach".into(), "Sam".into());
        item.id = Some("T-001".into());

        store.save(std::slice::from_ref(&item)).unwrap();
        assert_eq!(store.load().unwrap(), vec![item]);

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n  {\n    \"name\": \"Gym\""));
        assert!(text.ends_with("]\n"));
    }

    #[test]
    fn test_malformed_file_is_an_error_and_logged() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(
            store.load(),
            Err(StoreError::ItemsParseError { .. })
        ));
        let entries = recovery::read_recovery_entries(tmp.path(), None);
        assert_eq!(entries[0].category, RecoveryCategory::Parser);
        // The original file is left alone
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[test]
    fn test_failed_save_keeps_payload() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        // A directory where the file should be makes the rename fail
        fs::create_dir_all(store.path().join("blocker")).unwrap();
        let err = store.save(&[Item::new("Keep me")]).unwrap_err();
        assert!(matches!(err, StoreError::WriteError { .. }));
        let entries = recovery::read_recovery_entries(tmp.path(), None);
        assert_eq!(entries[0].category, RecoveryCategory::Write);
        assert!(entries[0].body.contains("Keep me"));
    }
}
