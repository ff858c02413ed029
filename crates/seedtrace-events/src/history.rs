//! History table rows: classification plus the raw type and batch

use crate::classify::{classify, Category, EventClassification};
use crate::event::DomainEvent;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One row of a lifecycle history table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Raw `type` string of the event
    #[serde(rename = "type")]
    pub tag: String,
    /// Batch identifier, if the event carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    /// Derived classification
    #[serde(flatten)]
    pub classification: EventClassification,
}

impl HistoryEntry {
    /// Classify an event into a history row
    #[must_use]
    pub fn from_event(event: &DomainEvent) -> Self {
        Self {
            tag: event.tag().to_string(),
            batch_id: event.batch_id().map(str::to_string),
            classification: classify(event),
        }
    }

    /// Category shortcut
    #[inline]
    #[must_use]
    pub fn category(&self) -> Category {
        self.classification.category
    }

    /// Time key shortcut
    #[inline]
    #[must_use]
    pub fn time_key(&self) -> Option<i64> {
        self.classification.time_key
    }
}

/// Newest first; undated rows sink to the bottom
fn newest_first(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort rows by descending time key, undated rows last
///
/// Stable: rows with equal keys keep their input order.
pub fn sort_by_time_desc(entries: &mut [HistoryEntry]) {
    entries.sort_by(|a, b| newest_first(a.time_key(), b.time_key()));
}

/// Classify a batch of events and sort them for display
#[must_use]
pub fn history(events: &[DomainEvent]) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = events.iter().map(HistoryEntry::from_event).collect();
    sort_by_time_desc(&mut entries);
    tracing::debug!("Built history of {} entries", entries.len());
    entries
}

/// Rows split by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPartition {
    pub licensing: Vec<HistoryEntry>,
    pub operator: Vec<HistoryEntry>,
}

impl CategoryPartition {
    /// Total rows across both buckets
    #[must_use]
    pub fn len(&self) -> usize {
        self.licensing.len() + self.operator.len()
    }

    /// Whether both buckets are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.licensing.is_empty() && self.operator.is_empty()
    }
}

/// Split rows into licensing and operator buckets, preserving order
#[must_use]
pub fn partition_by_category(entries: Vec<HistoryEntry>) -> CategoryPartition {
    let (licensing, operator) = entries
        .into_iter()
        .partition(|entry| entry.category() == Category::Licensing);
    CategoryPartition {
        licensing,
        operator,
    }
}

/// Filters offered by the history tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Keep only this category
    pub category: Option<Category>,
    /// Keep rows whose batch id contains this text (case-insensitive)
    pub batch: Option<String>,
    /// Keep rows where type, label, origin or responsible contain this text
    pub search: Option<String>,
}

impl HistoryFilter {
    /// Create filter that keeps everything
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a category
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Restrict to a batch id fragment
    #[must_use]
    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = Some(batch.into());
        self
    }

    /// Restrict to rows matching free text
    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Whether a row passes every active filter
    #[must_use]
    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        if self.category.is_some_and(|c| c != entry.category()) {
            return false;
        }

        if let Some(batch) = non_blank(self.batch.as_deref()) {
            let needle = batch.to_lowercase();
            let hit = entry
                .batch_id
                .as_deref()
                .is_some_and(|id| id.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(text) = non_blank(self.search.as_deref()) {
            let needle = text.to_lowercase();
            let c = &entry.classification;
            let haystacks = [
                entry.tag.as_str(),
                c.normalized_label.as_str(),
                c.origin.as_str(),
                c.responsible.as_str(),
                c.actor.as_str(),
            ];
            if !haystacks.iter().any(|h| h.to_lowercase().contains(&needle)) {
                return false;
            }
        }

        true
    }

    /// Rows passing the filter, in input order
    #[must_use]
    pub fn apply<'a>(&self, entries: &'a [HistoryEntry]) -> Vec<&'a HistoryEntry> {
        entries.iter().filter(|entry| self.matches(entry)).collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> HistoryEntry {
        HistoryEntry::from_event(&DomainEvent::from_value(value))
    }

    #[test]
    fn sorts_newest_first_with_undated_last() {
        let mut rows = vec![
            entry(json!({"type": "harvest", "batchId": "undated"})),
            entry(json!({"type": "harvest", "batchId": "old", "harvestedAt": "2024-01-01"})),
            entry(json!({"type": "harvest", "batchId": "new", "harvestedAt": "2025-01-01"})),
        ];
        sort_by_time_desc(&mut rows);
        let order: Vec<_> = rows.iter().map(|r| r.batch_id.as_deref().unwrap()).collect();
        assert_eq!(order, vec!["new", "old", "undated"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut rows = vec![
            entry(json!({"type": "harvest", "batchId": "a"})),
            entry(json!({"type": "harvest", "batchId": "b"})),
        ];
        sort_by_time_desc(&mut rows);
        assert_eq!(rows[0].batch_id.as_deref(), Some("a"));
    }

    #[test]
    fn filter_by_category_and_batch() {
        let rows = vec![
            entry(json!({"type": "license-issued", "licenceId": "L-1"})),
            entry(json!({"type": "harvest", "batchId": "B-100"})),
            entry(json!({"type": "packaged", "batchId": "B-200"})),
        ];

        let licensing = HistoryFilter::new().with_category(Category::Licensing);
        assert_eq!(licensing.apply(&rows).len(), 1);

        let batch = HistoryFilter::new().with_batch("b-1");
        let hits = batch.apply(&rows);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tag, "harvest");

        let blank = HistoryFilter::new().with_batch("   ");
        assert_eq!(blank.apply(&rows).len(), 3);
    }

    #[test]
    fn filter_by_free_text() {
        let rows = vec![
            entry(json!({"type": "transfer", "to": "Downtown Retail"})),
            entry(json!({"type": "drying", "location": "Dry Room"})),
        ];
        let hits = HistoryFilter::new().with_search("retail").apply(&rows);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tag, "transfer");
    }

    #[test]
    fn partition_keeps_every_row() {
        let rows = history(&[
            DomainEvent::from_value(json!({"type": "application-submitted"})),
            DomainEvent::from_value(json!({"type": "harvest"})),
            DomainEvent::from_value(json!({"type": "mystery"})),
        ]);
        let split = partition_by_category(rows);
        assert_eq!(split.licensing.len(), 1);
        assert_eq!(split.operator.len(), 2);
        assert_eq!(split.len(), 3);
    }

    #[test]
    fn serializes_flat_row() {
        let row = entry(json!({"type": "harvest", "batchId": "B-1"}));
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["type"], "harvest");
        assert_eq!(value["batchId"], "B-1");
        assert_eq!(value["category"], "operator");
        assert_eq!(value["origin"], "Farm facility");
    }
}
