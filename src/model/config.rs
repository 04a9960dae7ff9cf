use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::item::Priority;

/// Configuration from things/config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub workspace: WorkspaceInfo,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub ids: IdConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Length of the query window in days, counted from the selected date
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            window_days: default_window_days(),
        }
    }
}

fn default_window_days() -> u32 {
    365
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for IdConfig {
    fn default() -> Self {
        IdConfig {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "T".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub priority: Priority,
    /// Default end time is start time plus this many minutes
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            priority: Priority::Low,
            duration_minutes: default_duration_minutes(),
        }
    }
}

fn default_duration_minutes() -> u32 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Keyed by `low`, `medium`, `high`
    #[serde(default)]
    pub priority_colors: HashMap<String, String>,
    #[serde(default)]
    pub tag_colors: HashMap<String, String>,
}
