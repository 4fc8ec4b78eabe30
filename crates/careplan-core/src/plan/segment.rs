//! Day segmentation of a validated plan.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static DAY_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\nDay \d+").expect("valid regex"));

/// The contiguous text belonging to one labeled day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    label: String,
    body: String,
}

impl DayRecord {
    pub fn new(label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            body: body.into(),
        }
    }

    /// A record with no content, used for days the plan never produced.
    pub fn empty(label: impl Into<String>) -> Self {
        Self::new(label, String::new())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Full chunk text, including the label line.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Day records keyed by label.
///
/// Iteration follows the order in which labels were first seen. Inserting a
/// label that already exists replaces its record but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayCollection {
    records: Vec<DayRecord>,
    index: HashMap<String, usize>,
}

impl DayCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any earlier record with the same label.
    ///
    /// Returns the replaced record, if any.
    pub fn insert(&mut self, record: DayRecord) -> Option<DayRecord> {
        match self.index.get(record.label()) {
            Some(&pos) => Some(std::mem::replace(&mut self.records[pos], record)),
            None => {
                self.index
                    .insert(record.label().to_string(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&DayRecord> {
        self.index.get(label).map(|&pos| &self.records[pos])
    }

    /// Look up a day, resolving an absent label to an empty record.
    pub fn get_or_empty(&self, label: &str) -> Cow<'_, DayRecord> {
        match self.get(label) {
            Some(record) => Cow::Borrowed(record),
            None => Cow::Owned(DayRecord::empty(label)),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(DayRecord::label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Split text into day records at every line that starts with `Day <n>`.
///
/// The label line stays with the chunk that follows it. Blank chunks (such
/// as an empty preamble) are dropped. A repeated label overwrites the
/// earlier record.
pub fn split_days(text: &str) -> DayCollection {
    let text = text.trim();
    let mut days = DayCollection::new();

    let mut starts = vec![0usize];
    // Skip the '\n' so the label begins the next chunk.
    starts.extend(DAY_BOUNDARY_RE.find_iter(text).map(|m| m.start() + 1));

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).map(|&next| next - 1).unwrap_or(text.len());
        let chunk = text[start..end].trim();
        if chunk.is_empty() {
            continue;
        }

        let label = chunk.lines().next().unwrap_or_default().trim();
        let record = DayRecord::new(label, chunk);
        if let Some(previous) = days.insert(record) {
            tracing::debug!(
                label = previous.label(),
                replaced_len = previous.body().len(),
                "duplicate day label, keeping the later chunk"
            );
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_day_lines() {
        let text = "Day 1\nwalk\n\nDay 2\nswim";
        let days = split_days(text);
        assert_eq!(days.len(), 2);
        assert_eq!(days.get("Day 1").unwrap().body(), "Day 1\nwalk");
        assert_eq!(days.get("Day 2").unwrap().body(), "Day 2\nswim");
    }

    #[test]
    fn preamble_becomes_its_own_chunk() {
        let text = "7-Day Care Plan\n\nDay 1\nwalk";
        let days = split_days(text);
        let labels: Vec<&str> = days.labels().collect();
        assert_eq!(labels, vec!["7-Day Care Plan", "Day 1"]);
    }

    #[test]
    fn leading_blank_chunk_discarded() {
        let text = "\n\nDay 1\nwalk";
        let days = split_days(text);
        let labels: Vec<&str> = days.labels().collect();
        assert_eq!(labels, vec!["Day 1"]);
    }

    #[test]
    fn label_is_first_line_trimmed() {
        let text = "x\nDay 3   \n🏃 walk";
        let days = split_days(text);
        let day = days.get("Day 3").unwrap();
        assert_eq!(day.label(), "Day 3");
        assert_eq!(day.body(), "Day 3   \n🏃 walk");
    }

    #[test]
    fn duplicate_label_last_wins_and_keeps_first_position() {
        let text = "Day 1\nfirst\nDay 2\nmiddle\nDay 1\nsecond";
        let days = split_days(text);
        assert_eq!(days.len(), 2);
        assert_eq!(days.get("Day 1").unwrap().body(), "Day 1\nsecond");
        let labels: Vec<&str> = days.labels().collect();
        assert_eq!(labels, vec!["Day 1", "Day 2"]);
    }

    #[test]
    fn day_mentioned_mid_line_is_not_a_boundary() {
        let text = "Day 1\nrest until Day 2 starts";
        let days = split_days(text);
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn absent_day_resolves_to_empty_record() {
        let days = split_days("Day 1\nwalk");
        let day = days.get_or_empty("Day 6");
        assert_eq!(day.label(), "Day 6");
        assert!(day.is_empty());
        assert!(matches!(day, Cow::Owned(_)));
    }

    #[test]
    fn empty_text_yields_empty_collection() {
        assert!(split_days("   ").is_empty());
    }
}
