//! crates/daily_memo_core/src/feed.rs
//!
//! Client-side grouping of a flat, timestamp-ordered note list into the
//! month/day hierarchy the home feed renders. The grouping keys are derived
//! from each note's timestamp and recomputed from scratch on every push.

use chrono::{DateTime, Datelike, Utc};

use crate::domain::Note;

/// Notes from one calendar day within a month group, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    /// Zero-padded day of month, e.g. `"05"`.
    pub day: String,
    pub notes: Vec<Note>,
}

/// Notes from one calendar month, split per day.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup {
    /// Header label, e.g. `"January 2024"`.
    pub label: String,
    pub days: Vec<DayGroup>,
}

/// The fully grouped home feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedFeed {
    pub months: Vec<MonthGroup>,
}

impl GroupedFeed {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Total number of notes across all groups.
    pub fn note_count(&self) -> usize {
        self.months
            .iter()
            .flat_map(|m| &m.days)
            .map(|d| d.notes.len())
            .sum()
    }
}

/// The `"Month Year"` header derived from a timestamp.
pub fn month_label(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%B %Y").to_string()
}

/// The zero-padded day-of-month label derived from a timestamp.
pub fn day_label(timestamp: &DateTime<Utc>) -> String {
    format!("{:02}", timestamp.day())
}

/// Groups an already-ordered note list by month, then by day of month.
///
/// The input order is preserved within and across groups, so feeding the
/// store's timestamp-descending snapshot yields the newest month first and
/// the newest note first within each day.
pub fn group_by_date(notes: Vec<Note>) -> GroupedFeed {
    let mut months: Vec<MonthGroup> = Vec::new();
    for note in notes {
        let label = month_label(&note.timestamp);
        let day = day_label(&note.timestamp);
        match months.last_mut() {
            Some(month) if month.label == label => push_into_day(month, day, note),
            _ => months.push(MonthGroup {
                label,
                days: vec![DayGroup {
                    day,
                    notes: vec![note],
                }],
            }),
        }
    }
    GroupedFeed { months }
}

fn push_into_day(month: &mut MonthGroup, day: String, note: Note) {
    match month.days.last_mut() {
        Some(group) if group.day == day => group.notes.push(note),
        _ => month.days.push(DayGroup {
            day,
            notes: vec![note],
        }),
    }
}
