//! Timer history log.
//!
//! Newest-first list of finished countdowns, capped at `max_records`, with
//! optional per-record notes. The countdown session is the only producer
//! (through [`RecordSink`]); the UI reads, annotates and deletes.

mod record;

use std::collections::HashSet;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub use record::TimerRecord;

use crate::error::HistoryError;

pub const DEFAULT_MAX_RECORDS: usize = 50;
pub const MAX_NOTE_CHARS: usize = 500;

/// Receiver of finished countdowns.
pub trait RecordSink {
    fn add_record(&mut self, duration_minutes: f64, completed: bool, at: DateTime<Utc>);
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn add_record(&mut self, duration_minutes: f64, completed: bool, at: DateTime<Utc>) {
        (**self).add_record(duration_minutes, completed, at);
    }
}

/// Records started on the same local day, under a display heading.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    /// `Today`, `Yesterday` or `Aug 29, 2025`.
    pub label: String,
    pub date: NaiveDate,
    pub records: Vec<&'a TimerRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerHistory {
    #[serde(default)]
    records: Vec<TimerRecord>,
    #[serde(
        default = "default_max_records",
        deserialize_with = "deserialize_max_records"
    )]
    max_records: usize,
    /// Start of the very first countdown ever logged. Survives deleting
    /// individual records; cleared with the whole history.
    #[serde(default)]
    initial_start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    next_sequence: u64,
}

fn default_max_records() -> usize {
    DEFAULT_MAX_RECORDS
}

fn deserialize_max_records<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(usize::deserialize(deserializer)?.max(1))
}

impl TimerHistory {
    pub fn new(max_records: usize) -> Self {
        Self {
            records: Vec::new(),
            max_records: max_records.max(1),
            initial_start_date: None,
            next_sequence: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Newest first.
    pub fn records(&self) -> &[TimerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    pub fn get(&self, id: &str) -> Option<&TimerRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_completed).count()
    }

    pub fn first_started_at(&self) -> Option<DateTime<Utc>> {
        self.initial_start_date
    }

    /// Group records by local calendar day, newest day first.
    pub fn group_by_day<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> Vec<DayGroup<'_>> {
        let yesterday = today.checked_sub_days(Days::new(1));
        let mut groups: Vec<DayGroup<'_>> = Vec::new();
        for record in &self.records {
            let date = record.start_time.with_timezone(tz).date_naive();
            match groups.iter_mut().find(|g| g.date == date) {
                Some(group) => group.records.push(record),
                None => {
                    let label = if date == today {
                        "Today".to_string()
                    } else if Some(date) == yesterday {
                        "Yesterday".to_string()
                    } else {
                        date.format("%b %-d, %Y").to_string()
                    };
                    groups.push(DayGroup {
                        label,
                        date,
                        records: vec![record],
                    });
                }
            }
        }
        groups
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Prepend a record, evicting the oldest beyond `max_records`.
    pub fn add_record_at(
        &mut self,
        duration_minutes: f64,
        completed: bool,
        at: DateTime<Utc>,
    ) -> &TimerRecord {
        let id = self.mint_id(at);
        if self.initial_start_date.is_none() {
            self.initial_start_date = Some(at);
        }
        self.records.insert(
            0,
            TimerRecord {
                id,
                start_time: at,
                duration_minutes: duration_minutes.max(0.0),
                is_completed: completed,
                note: None,
            },
        );
        self.records.truncate(self.max_records.max(1));
        tracing::debug!(duration_minutes, completed, len = self.records.len(), "timer record added");
        &self.records[0]
    }

    pub fn delete(&mut self, id: &str) -> Result<TimerRecord, HistoryError> {
        let idx = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| HistoryError::RecordNotFound(id.to_string()))?;
        Ok(self.records.remove(idx))
    }

    /// Remove every record and forget the initial start date.
    pub fn clear(&mut self) {
        self.records.clear();
        self.initial_start_date = None;
    }

    /// Attach a note. Whitespace is trimmed; an empty note removes it.
    pub fn set_note(&mut self, id: &str, text: &str) -> Result<(), HistoryError> {
        let trimmed = text.trim();
        let len = trimmed.chars().count();
        if len > MAX_NOTE_CHARS {
            return Err(HistoryError::NoteTooLong {
                len,
                max: MAX_NOTE_CHARS,
            });
        }
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| HistoryError::RecordNotFound(id.to_string()))?;
        record.note = (!trimmed.is_empty()).then(|| trimmed.to_string());
        Ok(())
    }

    pub fn set_max_records(&mut self, max_records: usize) {
        self.max_records = max_records.max(1);
        self.records.truncate(self.max_records);
    }

    /// Give fresh IDs to records with empty or duplicate IDs, as found in
    /// data written by older versions. Returns how many were changed.
    pub fn repair_ids(&mut self) -> usize {
        let mut seen: HashSet<String> = HashSet::new();
        let mut repaired = 0;
        for idx in 0..self.records.len() {
            let id = self.records[idx].id.clone();
            if id.is_empty() || seen.contains(&id) {
                let at = self.records[idx].start_time;
                let fresh = self.mint_id(at);
                self.records[idx].id = fresh.clone();
                seen.insert(fresh);
                repaired += 1;
            } else {
                seen.insert(id);
            }
        }
        if self.initial_start_date.is_none() {
            self.initial_start_date = self.records.iter().map(|r| r.start_time).min();
        }
        if repaired > 0 {
            tracing::warn!(repaired, "regenerated duplicate timer record ids");
        }
        repaired
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn mint_id(&mut self, at: DateTime<Utc>) -> String {
        loop {
            let id = record::record_id(at, self.next_sequence);
            self.next_sequence += 1;
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

impl Default for TimerHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECORDS)
    }
}

impl RecordSink for TimerHistory {
    fn add_record(&mut self, duration_minutes: f64, completed: bool, at: DateTime<Utc>) {
        self.add_record_at(duration_minutes, completed, at);
    }
}
