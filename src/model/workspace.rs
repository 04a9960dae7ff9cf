use std::path::PathBuf;

use super::config::WorkspaceConfig;

/// A loaded workspace: its location and configuration.
///
/// Items are not held here; they live in an [`crate::ops::repository::Repository`].
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory containing `things/`
    pub root: PathBuf,
    /// The `things/` directory itself
    pub things_dir: PathBuf,
    pub config: WorkspaceConfig,
}

impl Workspace {
    pub fn items_path(&self) -> PathBuf {
        self.things_dir.join("items.json")
    }
}
