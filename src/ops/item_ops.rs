use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::model::config::DefaultsConfig;
use crate::model::item::{Item, Priority, Recurrence};
use crate::ops::recurrence::{format_date, parse_date};

pub const TIME_FORMAT: &str = "%H:%M";

/// Error type for user-supplied item values
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ItemError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid time '{0}' (expected HH:MM)")]
    InvalidTime(String),
    #[error("invalid field '{0}' (expected KEY=VALUE)")]
    InvalidField(String),
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Validate a `YYYY-MM-DD` date entered by the user
pub fn check_date(s: &str) -> Result<NaiveDate, ItemError> {
    parse_date(s).ok_or_else(|| ItemError::InvalidDate(s.to_string()))
}

/// Validate an `HH:MM` time entered by the user, normalizing to two digits
pub fn check_time(s: &str) -> Result<String, ItemError> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map(|t| t.format(TIME_FORMAT).to_string())
        .map_err(|_| ItemError::InvalidTime(s.to_string()))
}

/// Split `KEY=VALUE`
pub fn parse_field(s: &str) -> Result<(String, String), ItemError> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(ItemError::InvalidField(s.to_string())),
    }
}

/// Split a comma-separated tag list, dropping empties
pub fn parse_tags(s: &str) -> Vec<String> {
    s.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Values for a new item; anything left `None` gets a default.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub name: String,
    pub tags: Vec<String>,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub due_date: Option<String>,
    pub end_time: Option<String>,
    pub priority: Option<Priority>,
    pub recurrence: Recurrence,
    pub completed: bool,
    pub fields: Vec<(String, String)>,
}

impl NewItem {
    /// Build the item, validating user input.
    ///
    /// Dates default to today, start time to `now` (minute precision) and
    /// end time to start time plus the configured duration.
    pub fn build(self, now: NaiveDateTime, defaults: &DefaultsConfig) -> Result<Item, ItemError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ItemError::EmptyName);
        }

        let today = now.date();
        let start_date = match self.start_date {
            Some(s) => format_date(check_date(&s)?),
            None => format_date(today),
        };
        let due_date = match self.due_date {
            Some(s) => format_date(check_date(&s)?),
            None => format_date(today),
        };

        let start = match self.start_time {
            Some(s) => NaiveTime::parse_from_str(&s, TIME_FORMAT)
                .map_err(|_| ItemError::InvalidTime(s))?,
            None => now.time().with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(now.time()),
        };
        let end_time = match self.end_time {
            Some(s) => check_time(&s)?,
            None => {
                let (end, _) = start
                    .overflowing_add_signed(TimeDelta::minutes(defaults.duration_minutes as i64));
                end.format(TIME_FORMAT).to_string()
            }
        };

        let mut item = Item::new(name);
        item.tags = self.tags;
        item.start_date = start_date;
        item.due_date = due_date;
        item.start_time = start.format(TIME_FORMAT).to_string();
        item.end_time = end_time;
        item.priority = self.priority.unwrap_or(defaults.priority);
        item.recurrence = self.recurrence;
        item.completed = self.completed;
        item.fields.extend(self.fields);
        Ok(item)
    }
}

/// Changes to apply to an existing item; `None` leaves a value alone.
#[derive(Debug, Clone, Default)]
pub struct ItemEdit {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub due_date: Option<String>,
    pub end_time: Option<String>,
    pub priority: Option<Priority>,
    pub recurrence: Option<Recurrence>,
    pub set_fields: Vec<(String, String)>,
    pub unset_fields: Vec<String>,
}

impl ItemEdit {
    /// Check user input up front so a bad value never reaches the store
    pub fn validate(&self) -> Result<(), ItemError> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(ItemError::EmptyName);
        }
        for date in [&self.start_date, &self.due_date].into_iter().flatten() {
            check_date(date)?;
        }
        for time in [&self.start_time, &self.end_time].into_iter().flatten() {
            check_time(time)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.tags.is_none()
            && self.start_date.is_none()
            && self.start_time.is_none()
            && self.due_date.is_none()
            && self.end_time.is_none()
            && self.priority.is_none()
            && self.recurrence.is_none()
            && self.set_fields.is_empty()
            && self.unset_fields.is_empty()
    }

    /// Apply to `item`. Call `validate` first.
    pub fn apply(self, item: &mut Item) {
        if let Some(name) = self.name {
            item.name = name.trim().to_string();
        }
        if let Some(tags) = self.tags {
            item.tags = tags;
        }
        if let Some(d) = self.start_date.as_deref().and_then(parse_date) {
            item.start_date = format_date(d);
        }
        if let Some(d) = self.due_date.as_deref().and_then(parse_date) {
            item.due_date = format_date(d);
        }
        if let Some(t) = self.start_time.as_deref().and_then(|t| check_time(t).ok()) {
            item.start_time = t;
        }
        if let Some(t) = self.end_time.as_deref().and_then(|t| check_time(t).ok()) {
            item.end_time = t;
        }
        if let Some(p) = self.priority {
            item.priority = p;
        }
        if let Some(r) = self.recurrence {
            item.recurrence = r;
        }
        for key in &self.unset_fields {
            item.fields.shift_remove(key);
        }
        item.fields.extend(self.set_fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(23, 30, 45)
            .unwrap()
    }

    #[test]
    fn build_fills_defaults() {
        let item = NewItem {
            name: "  Gym ".into(),
            ..Default::default()
        }
        .build(now(), &DefaultsConfig::default())
        .unwrap();
        assert_eq!(item.name, "Gym");
        assert_eq!(item.start_date, "2024-03-09");
        assert_eq!(item.due_date, "2024-03-09");
        assert_eq!(item.start_time, "23:30");
        // Wraps past midnight
        assert_eq!(item.end_time, "00:30");
        assert_eq!(item.priority, Priority::Low);
        assert_eq!(item.recurrence, Recurrence::None);
        assert_eq!(item.id, None);
    }

    #[test]
    fn build_uses_given_values() {
        let defaults = DefaultsConfig {
            priority: Priority::Medium,
            duration_minutes: 15,
        };
        let item = NewItem {
            name: "Standup".into(),
            tags: vec!["work".into()],
            start_date: Some("2024-04-01".into()),
            due_date: Some("2024-04-02".into()),
            start_time: Some("9:05".into()),
            recurrence: Recurrence::Daily,
            completed: true,
            fields: vec![("room".into(), "B2".into())],
            ..Default::default()
        }
        .build(now(), &defaults)
        .unwrap();
        assert_eq!(item.start_time, "09:05");
        assert_eq!(item.end_time, "09:20");
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.fields["room"], "B2");
        assert!(item.completed);
    }

    #[test]
    fn build_rejects_bad_input() {
        let defaults = DefaultsConfig::default();
        let bad_date = NewItem {
            name: "x".into(),
            due_date: Some("2024-02-30".into()),
            ..Default::default()
        };
        assert_eq!(
            bad_date.build(now(), &defaults).unwrap_err(),
            ItemError::InvalidDate("2024-02-30".into())
        );
        let bad_time = NewItem {
            name: "x".into(),
            end_time: Some("25:00".into()),
            ..Default::default()
        };
        assert_eq!(
            bad_time.build(now(), &defaults).unwrap_err(),
            ItemError::InvalidTime("25:00".into())
        );
        let empty = NewItem::default();
        assert_eq!(empty.build(now(), &defaults).unwrap_err(), ItemError::EmptyName);
    }

    #[test]
    fn parse_helpers() {
        assert_eq!(parse_field("room=B2").unwrap(), ("room".into(), "B2".into()));
        assert_eq!(parse_field("note=a=b").unwrap(), ("note".into(), "a=b".into()));
        assert!(parse_field("=x").is_err());
        assert!(parse_field("nothing").is_err());
        assert_eq!(parse_tags(" a, ,b ,"), vec!["a", "b"]);
    }

    #[test]
    fn edit_applies_only_given_values() {
        let mut item = NewItem {
            name: "Gym".into(),
            fields: vec![("a".into(), "1".into()), ("b".into(), "2".into())],
            ..Default::default()
        }
        .build(now(), &DefaultsConfig::default())
        .unwrap();
        let before = item.clone();

        let edit = ItemEdit {
            due_date: Some("2024-05-01".into()),
            recurrence: Some(Recurrence::Monthly),
            set_fields: vec![("c".into(), "3".into())],
            unset_fields: vec!["a".into()],
            ..Default::default()
        };
        assert!(edit.validate().is_ok());
        edit.apply(&mut item);

        assert_eq!(item.due_date, "2024-05-01");
        assert_eq!(item.recurrence, Recurrence::Monthly);
        assert_eq!(item.name, before.name);
        assert_eq!(item.start_time, before.start_time);
        let keys: Vec<&str> = item.fields.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn edit_validation() {
        let edit = ItemEdit {
            start_time: Some("noon".into()),
            ..Default::default()
        };
        assert_eq!(edit.validate().unwrap_err(), ItemError::InvalidTime("noon".into()));
        assert!(ItemEdit::default().is_empty());
        let edit = ItemEdit {
            name: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(edit.validate().unwrap_err(), ItemError::EmptyName);
    }
}
