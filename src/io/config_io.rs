use std::fs;
use std::path::Path;

use crate::io::store::StoreError;
use crate::model::config::WorkspaceConfig;

/// Error type for config edits
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not parse config.toml: {0}")]
    Syntax(#[from] toml_edit::TomlError),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("key must look like section.name: {0}")]
    BadKey(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read the config document for round-trip-safe editing.
pub fn read_config_doc(things_dir: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    let config_path = things_dir.join("config.toml");
    let text = fs::read_to_string(&config_path).map_err(|e| StoreError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    Ok(text.parse()?)
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config_doc(things_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let config_path = things_dir.join("config.toml");
    crate::io::recovery::atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| {
        StoreError::WriteError {
            path: config_path,
            source: e,
        }
    })?;
    Ok(())
}

fn split_key(key: &str) -> Result<(&str, &str), ConfigError> {
    match key.split_once('.') {
        Some((section, name)) if !section.is_empty() && !name.is_empty() && !name.contains('.') => {
            Ok((section, name))
        }
        _ => Err(ConfigError::BadKey(key.to_string())),
    }
}

/// Look up a dotted key like `view.window_days`
pub fn get_value(doc: &toml_edit::DocumentMut, key: &str) -> Result<Option<String>, ConfigError> {
    let (section, name) = split_key(key)?;
    Ok(doc
        .get(section)
        .and_then(|t| t.get(name))
        .and_then(|item| item.as_value())
        .map(|v| {
            if let Some(s) = v.as_str() {
                s.to_string()
            } else if let Some(n) = v.as_integer() {
                n.to_string()
            } else if let Some(b) = v.as_bool() {
                b.to_string()
            } else {
                v.to_string().trim().to_string()
            }
        }))
}

/// Set a dotted key. Integers and booleans are stored as such, anything
/// else as a string. The result must still deserialize as a config.
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, raw: &str) -> Result<(), ConfigError> {
    let (section, name) = split_key(key)?;

    let value = if let Ok(n) = raw.parse::<i64>() {
        toml_edit::value(n)
    } else if let Ok(b) = raw.parse::<bool>() {
        toml_edit::value(b)
    } else {
        toml_edit::value(raw)
    };

    if !doc.contains_key(section) {
        doc[section] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    let previous = doc[section].get(name).cloned();
    doc[section][name] = value;

    if let Err(e) = toml::from_str::<WorkspaceConfig>(&doc.to_string()) {
        match previous {
            Some(item) => doc[section][name] = item,
            None => {
                if let Some(table) = doc[section].as_table_like_mut() {
                    table.remove(name);
                }
            }
        }
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.message().to_string(),
        });
    }
    Ok(())
}
