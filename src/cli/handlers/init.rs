use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::recovery::atomic_write;
use crate::io::store;

const CONFIG_TOML_TEMPLATE: &str = r##"[workspace]
name = "{name}"

[view]
# Days shown after the window start
window_days = 365

[ids]
# New items get IDs like T-001
prefix = "T"

[defaults]
priority = "Low"
# End time for new items = start time + this many minutes
duration_minutes = 60

# --- UI Customization ---
# Uncomment and edit to override defaults. Values are "#RRGGBB" or a
# color name such as "red" or "lightblue".

[ui]
#
# [ui.colors]
# background = "#10141F"
# text = "#C5CEE0"
# highlight = "#FF8A3D"
# dim = "#6C7A96"
# selection_bg = "#27314A"
# search_match_bg = "#F2C14E"
#
# [ui.priority_colors]
# high = "#F05D5E"
# medium = "#F2C14E"
# low = "#6C7A96"
#
# [ui.tag_colors]
# work = "#5B8DEF"
# garden = "green"
"##;

const EMPTY_ITEMS: &str = "[]\n";

/// Infer a workspace name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_config_toml(name: &str) -> String {
    CONFIG_TOML_TEMPLATE.replace("{name}", &name.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let things_dir = dir.join("things");
    let config_path = things_dir.join("config.toml");

    if config_path.exists() && !args.force {
        return Err("workspace already exists in ./things/ (use --force to reinitialize)".into());
    }

    // Nested workspaces are allowed, but say so
    if let Some(parent) = dir.parent()
        && let Ok(parent_root) = store::discover_workspace(parent)
    {
        eprintln!("note: parent workspace found at {}/", parent_root.join("things").display());
    }

    let name = args.name.unwrap_or_else(|| {
        dir.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Things".to_string())
    });

    fs::create_dir_all(&things_dir)?;
    atomic_write(&config_path, render_config_toml(&name).as_bytes())?;

    let items_path = things_dir.join("items.json");
    if !items_path.exists() {
        atomic_write(&items_path, EMPTY_ITEMS.as_bytes())?;
    }

    println!("Initialized workspace: {}", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::WorkspaceConfig;
    use tempfile::TempDir;

    #[test]
    fn test_infer_name() {
        assert_eq!(infer_name("my-chores"), "My Chores");
        assert_eq!(infer_name("home_stuff"), "Home Stuff");
        assert_eq!(infer_name("things"), "Things");
    }

    #[test]
    fn template_parses_with_defaults() {
        let config: WorkspaceConfig = toml::from_str(&render_config_toml("Home \"HQ\"")).unwrap();
        assert_eq!(config.workspace.name, "Home \"HQ\"");
        assert_eq!(config.view.window_days, 365);
        assert_eq!(config.ids.prefix, "T");
        assert_eq!(config.defaults.duration_minutes, 60);
    }

    #[test]
    fn init_creates_workspace() {
        let dir = TempDir::new().unwrap();
        cmd_init(
            InitArgs {
                name: Some("Home".into()),
                force: false,
            },
            dir.path(),
        )
        .unwrap();
        let workspace = store::load_workspace(dir.path()).unwrap();
        assert_eq!(workspace.config.workspace.name, "Home");
        assert_eq!(fs::read_to_string(workspace.items_path()).unwrap(), EMPTY_ITEMS);
    }

    #[test]
    fn reinit_needs_force_and_keeps_items() {
        let dir = TempDir::new().unwrap();
        let args = || InitArgs {
            name: Some("Home".into()),
            force: false,
        };
        cmd_init(args(), dir.path()).unwrap();
        let items_path = dir.path().join("things/items.json");
        fs::write(&items_path, "[{\"name\": \"kept\"}]").unwrap();

        assert!(cmd_init(args(), dir.path()).is_err());
        cmd_init(
            InitArgs {
                name: Some("Renamed".into()),
                force: true,
            },
            dir.path(),
        )
        .unwrap();
        assert!(fs::read_to_string(&items_path).unwrap().contains("kept"));
        let workspace = store::load_workspace(dir.path()).unwrap();
        assert_eq!(workspace.config.workspace.name, "Renamed");
    }
}
