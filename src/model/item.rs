use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Item priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("invalid priority '{}' (expected low, medium, high)", s)),
        }
    }
}

/// How often an item repeats.
///
/// `None` is a real variant (not `Option`) because it is persisted as the
/// string `"None"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Fortnightly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub const ALL: [Recurrence; 6] = [
        Recurrence::None,
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Fortnightly,
        Recurrence::Monthly,
        Recurrence::Yearly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::None => "None",
            Recurrence::Daily => "Daily",
            Recurrence::Weekly => "Weekly",
            Recurrence::Fortnightly => "Fortnightly",
            Recurrence::Monthly => "Monthly",
            Recurrence::Yearly => "Yearly",
        }
    }

    pub fn is_recurring(self) -> bool {
        self != Recurrence::None
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Recurrence::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "invalid recurrence '{}' (expected none, daily, weekly, fortnightly, monthly, yearly)",
                    s
                )
            })
    }
}

/// A persisted item: the single source of truth for one (possibly recurring) thing.
///
/// Dates and times are kept as the strings the user entered (`YYYY-MM-DD`,
/// `HH:MM`). Parsing happens at use sites so a malformed value never makes
/// the record unloadable. Field order matches the on-disk layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub tags: Vec<String>,
    pub due_date: String,
    pub start_time: String,
    pub end_time: String,
    pub completed: bool,
    pub priority: Priority,
    /// User-defined extra attributes
    pub fields: IndexMap<String, String>,
    /// Absent in files written before start dates existed
    #[serde(default)]
    pub start_date: String,
    /// Absent in files written before recurrence existed
    #[serde(default)]
    pub recurrence: Recurrence,
    /// Stable id like `T-004`; absent on legacy records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Item {
    /// Create an item with empty dates/times and no id
    pub fn new(name: impl Into<String>) -> Self {
        Item {
            name: name.into(),
            tags: Vec::new(),
            due_date: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            completed: false,
            priority: Priority::Low,
            fields: IndexMap::new(),
            start_date: String::new(),
            recurrence: Recurrence::None,
            id: None,
        }
    }

    /// Tags as shown in the agenda: `"a, b"`
    pub fn tags_joined(&self) -> String {
        self.tags.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("Medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn recurrence_parses_case_insensitively() {
        assert_eq!(
            "fortnightly".parse::<Recurrence>().unwrap(),
            Recurrence::Fortnightly
        );
        assert_eq!("NONE".parse::<Recurrence>().unwrap(), Recurrence::None);
        assert!("hourly".parse::<Recurrence>().is_err());
    }

    #[test]
    fn legacy_record_defaults_missing_fields() {
        let json = r#"{
            "name": "Old",
            "tags": [],
            "due_date": "2024-01-01",
            "start_time": "09:00",
            "end_time": "10:00",
            "completed": false,
            "priority": "Low",
            "fields": {}
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.start_date, "");
        assert_eq!(item.recurrence, Recurrence::None);
        assert_eq!(item.id, None);
    }

    #[test]
    fn serializes_in_legacy_field_order() {
        let mut item = Item::new("Gym");
        item.fields.insert("b".into(), "2".into());
        item.fields.insert("a".into(), "1".into());
        let json = serde_json::to_string(&item).unwrap();
        let name_pos = json.find("\"name\"").unwrap();
        let start_pos = json.find("\"start_date\"").unwrap();
        let rec_pos = json.find("\"recurrence\"").unwrap();
        assert!(name_pos < start_pos && start_pos < rec_pos);
        assert!(!json.contains("\"id\""));
        // Field map keeps insertion order
        assert!(json.find("\"b\"").unwrap() < json.find("\"a\"").unwrap());
    }

    #[test]
    fn tags_joined_uses_comma_space() {
        let mut item = Item::new("x");
        item.tags = vec!["gym".into(), "health".into()];
        assert_eq!(item.tags_joined(), "gym, health");
    }
}
