//! Calculation history.
//!
//! Entries are kept newest-first in a bounded queue; once the limit is
//! reached the oldest entry is evicted. The serialized form is a JSON
//! array of `{expression, result, timestamp, date}` objects.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core::format::ERROR_SENTINEL;

/// Time-of-day stamp format, e.g. `09:05 PM`
const TIME_FORMAT: &str = "%I:%M %p";

/// Calendar date format, e.g. `Mon Oct 19 2026`
const DATE_FORMAT: &str = "%a %b %d %Y";

/// A single completed calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The expression trace that was evaluated
    pub expression: String,
    /// The formatted result
    pub result: String,
    /// Local time of day the calculation finished
    pub timestamp: String,
    /// Local calendar date the calculation finished
    pub date: String,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current local time
    #[must_use]
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self::with_time(expression, result, &Local::now())
    }

    /// Creates an entry stamped with the given time
    #[must_use]
    pub fn with_time<Tz: TimeZone>(
        expression: impl Into<String>,
        result: impl Into<String>,
        at: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp: at.format(TIME_FORMAT).to_string(),
            date: at.format(DATE_FORMAT).to_string(),
        }
    }

    /// Creates an entry from a naive local time (for restoring and tests)
    #[must_use]
    pub fn at_naive(
        expression: impl Into<String>,
        result: impl Into<String>,
        at: NaiveDateTime,
    ) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
            timestamp: at.format(TIME_FORMAT).to_string(),
            date: at.format(DATE_FORMAT).to_string(),
        }
    }

    /// Returns `expression = result`
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} = {}", self.expression, self.result)
    }

    /// Label for the history list: the time for entries made `today`,
    /// otherwise month and day (`Oct 19`).
    #[must_use]
    pub fn label(&self, today: &str) -> String {
        if self.date == today {
            self.timestamp.clone()
        } else {
            self.date
                .split(' ')
                .skip(1)
                .take(2)
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    /// Returns true if the result can be reused as an operand
    #[must_use]
    pub fn is_reusable(&self) -> bool {
        self.result != ERROR_SENTINEL
    }
}

/// Formats a date the same way entries store it, for [`History::today_count`]
#[must_use]
pub fn date_key<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(DATE_FORMAT).to_string()
}

/// Calculator history manager
///
/// Implements a bounded queue to prevent unbounded growth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    /// Entries, newest first
    entries: VecDeque<HistoryEntry>,
    /// Maximum number of entries to keep
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Default maximum history size
    pub const DEFAULT_LIMIT: usize = 100;

    /// Badge counts above this are shown as `99+`
    const BADGE_MAX: usize = 99;

    /// Creates a new history with the default limit
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }

    /// Creates a history with a custom limit
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(Self::DEFAULT_LIMIT)),
            limit,
        }
    }

    /// Adds an entry as the newest, evicting the oldest beyond the limit
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.limit);
    }

    /// Records a calculation stamped with the current time
    pub fn record(&mut self, expression: &str, result: &str) {
        self.push(HistoryEntry::new(expression, result));
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Clears all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates newest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Returns the entry at `index` (0 = newest)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Returns the most recent entry
    #[must_use]
    pub fn newest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Returns the oldest entry still kept
    #[must_use]
    pub fn oldest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Number of entries made on `today` (a [`date_key`] string)
    #[must_use]
    pub fn today_count(&self, today: &str) -> usize {
        self.entries.iter().filter(|e| e.date == today).count()
    }

    /// Counter badge text, `None` when there is nothing to show
    #[must_use]
    pub fn badge_text(&self) -> Option<String> {
        match self.entries.len() {
            0 => None,
            n if n > Self::BADGE_MAX => Some(format!("{}+", Self::BADGE_MAX)),
            n => Some(n.to_string()),
        }
    }

    /// Serializes the history to JSON (newest first)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// Deserializes history from JSON with the default limit
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Self::from_json_with_limit(json, Self::DEFAULT_LIMIT)
    }

    /// Deserializes history from JSON, keeping at most `limit` of the
    /// newest entries
    pub fn from_json_with_limit(json: &str, limit: usize) -> Result<Self, serde_json::Error> {
        let mut entries: VecDeque<HistoryEntry> = serde_json::from_str(json)?;
        entries.truncate(limit);
        Ok(Self { entries, limit })
    }

    /// Exports history as `expression = result` lines, newest first
    #[must_use]
    pub fn export_formatted(&self) -> String {
        self.entries
            .iter()
            .map(HistoryEntry::display)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn entry(expr: &str, result: &str) -> HistoryEntry {
        HistoryEntry::at_naive(expr, result, at(19, 21, 5))
    }

    // ===== HistoryEntry tests =====

    #[test]
    fn test_entry_stamps() {
        let e = entry("2 + 2", "4");
        assert_eq!(e.expression, "2 + 2");
        assert_eq!(e.result, "4");
        assert_eq!(e.timestamp, "09:05 PM");
        assert_eq!(e.date, "Mon Oct 19 2026");
    }

    #[test]
    fn test_entry_new_uses_local_clock() {
        let e = HistoryEntry::new("1 + 1", "2");
        assert_eq!(e.date, date_key(&Local::now()));
        assert!(!e.timestamp.is_empty());
    }

    #[test]
    fn test_entry_display() {
        assert_eq!(entry("5 + 3", "8").display(), "5 + 3 = 8");
    }

    #[test]
    fn test_entry_label_today_shows_time() {
        let e = entry("1 + 1", "2");
        assert_eq!(e.label("Mon Oct 19 2026"), "09:05 PM");
    }

    #[test]
    fn test_entry_label_other_day_shows_month_day() {
        let e = HistoryEntry::at_naive("1 + 1", "2", at(5, 8, 0));
        assert_eq!(e.label("Mon Oct 19 2026"), "Oct 05");
    }

    #[test]
    fn test_entry_reusable() {
        assert!(entry("1 + 1", "2").is_reusable());
        assert!(!entry("8 ÷ 0", "Error").is_reusable());
    }

    #[test]
    fn test_entry_serialize_field_names() {
        let json = serde_json::to_string(&entry("2 ^ 3", "8")).unwrap();
        assert_eq!(
            json,
            r#"{"expression":"2 ^ 3","result":"8","timestamp":"09:05 PM","date":"Mon Oct 19 2026"}"#
        );
    }

    // ===== History tests =====

    #[test]
    fn test_history_new() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.limit(), History::DEFAULT_LIMIT);
    }

    #[test]
    fn test_history_is_newest_first() {
        let mut history = History::new();
        history.push(entry("a", "1"));
        history.push(entry("b", "2"));
        history.push(entry("c", "3"));

        let results: Vec<&str> = history.iter().map(|e| e.result.as_str()).collect();
        assert_eq!(results, vec!["3", "2", "1"]);
        assert_eq!(history.newest().unwrap().result, "3");
        assert_eq!(history.oldest().unwrap().result, "1");
        assert_eq!(history.get(1).unwrap().result, "2");
        assert!(history.get(3).is_none());
    }

    #[test]
    fn test_history_limit_evicts_oldest() {
        let mut history = History::with_limit(3);
        for i in 1..=4 {
            history.push(entry("x", &i.to_string()));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.oldest().unwrap().result, "2");
        assert_eq!(history.newest().unwrap().result, "4");
    }

    #[test]
    fn test_history_default_cap_is_100() {
        let mut history = History::new();
        for i in 0..101 {
            history.record("n", &i.to_string());
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.oldest().unwrap().result, "1");
    }

    #[test]
    fn test_history_clear() {
        let mut history = History::new();
        history.record("1", "1");
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_today_count() {
        let mut history = History::new();
        history.push(entry("a", "1"));
        history.push(HistoryEntry::at_naive("b", "2", at(18, 10, 0)));
        history.push(entry("c", "3"));
        assert_eq!(history.today_count("Mon Oct 19 2026"), 2);
        assert_eq!(history.today_count("Sun Oct 18 2026"), 1);
    }

    #[test]
    fn test_badge_text() {
        let mut history = History::new();
        assert_eq!(history.badge_text(), None);
        history.record("a", "1");
        assert_eq!(history.badge_text().as_deref(), Some("1"));
        for _ in 0..99 {
            history.record("a", "1");
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.badge_text().as_deref(), Some("99+"));
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let mut original = History::new();
        original.push(entry("x", "10"));
        original.push(entry("y", "20"));

        let json = original.to_json().unwrap();
        let restored = History::from_json(&json).unwrap();
        assert_eq!(original, restored);
        assert_eq!(restored.newest().unwrap().expression, "y");
    }

    #[test]
    fn test_from_json_applies_limit() {
        let mut original = History::new();
        for i in 0..5 {
            original.push(entry("n", &i.to_string()));
        }
        let json = original.to_json().unwrap();
        let restored = History::from_json_with_limit(&json, 2).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.newest().unwrap().result, "4");
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(History::from_json("invalid json").is_err());
    }

    #[test]
    fn test_export_formatted() {
        let mut history = History::new();
        history.push(entry("1 + 1", "2"));
        history.push(entry("2 × 3", "6"));
        assert_eq!(history.export_formatted(), "2 × 3 = 6\n1 + 1 = 2");
        assert_eq!(History::new().export_formatted(), "");
    }
}
