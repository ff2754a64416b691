use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::errors::AssistantError;

/// Appointment details recovered from a structured model reply. All four
/// fields are required; extraction fails closed if any label is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentFields {
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: i64,
}

impl AppointmentFields {
    /// Parse a block expected to contain four labeled lines:
    /// `Title:`, `Date:`, `Time:`, `Duration:`. The first line containing a
    /// label supplies its value (everything after the label, trimmed).
    pub fn parse(text: &str) -> Result<Self, AssistantError> {
        let title = labeled_value(text, "Title:")?.to_string();
        let date_raw = labeled_value(text, "Date:")?;
        let time_raw = labeled_value(text, "Time:")?;
        let duration_raw = labeled_value(text, "Duration:")?;

        if title.is_empty() {
            return Err(AssistantError::Extraction("empty title".to_string()));
        }

        let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d").map_err(|_| {
            AssistantError::Extraction(format!("unreadable date {date_raw:?}"))
        })?;

        let time = NaiveTime::parse_from_str(time_raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time_raw, "%H:%M:%S"))
            .map_err(|_| AssistantError::Extraction(format!("unreadable time {time_raw:?}")))?;

        // Tolerate a unit suffix ("15 minutes") but require a leading integer.
        let duration_minutes = duration_raw
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<i64>().ok())
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| {
                AssistantError::Extraction(format!("unreadable duration {duration_raw:?}"))
            })?;

        Ok(Self {
            title,
            date,
            time,
            duration_minutes,
        })
    }
}

fn labeled_value<'a>(text: &'a str, label: &str) -> Result<&'a str, AssistantError> {
    text.lines()
        .find(|line| line.contains(label))
        .and_then(|line| line.splitn(2, label).nth(1))
        .map(str::trim)
        .ok_or_else(|| AssistantError::Extraction(format!("missing {label} line")))
}

/// Event as submitted to the calendar provider. Constructed, sent, and
/// discarded; the provider is the source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub summary: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Provider-assigned reference for an inserted event.
#[derive(Debug, Clone)]
pub struct EventRef {
    pub id: String,
    pub link: String,
}
