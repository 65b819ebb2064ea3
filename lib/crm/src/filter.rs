//! Lead filter engine.
//!
//! A lead is visible iff it passes every facet: free-text search, priority,
//! source, assignee, creation-date bucket and value range. An empty facet
//! set means "no filter" for that facet. The filter is pure and recomputed
//! on every call; "now" is passed in so date buckets are deterministic.

use crate::lead::{Lead, Priority};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Creation-date bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    /// Same UTC calendar day as now.
    Today,
    /// Created within the last 7 days.
    Week,
    /// Created within the last 30 days.
    Month,
}

impl DateRange {
    /// Returns true if `created_at` falls in this bucket relative to `now`.
    #[must_use]
    pub fn contains(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Today => created_at.date_naive() == now.date_naive(),
            Self::Week => created_at >= now - Duration::days(7),
            Self::Month => created_at >= now - Duration::days(30),
        }
    }
}

/// Inclusive value bounds; a missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValueRange {
    #[must_use]
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// The search text and facet selections of the leads view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub priorities: BTreeSet<Priority>,
    #[serde(default)]
    pub sources: BTreeSet<String>,
    #[serde(default)]
    pub assignees: BTreeSet<String>,
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub value_range: ValueRange,
}

impl LeadFilter {
    /// Filter that shows everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = Priority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_sources<S: Into<String>>(mut self, sources: impl IntoIterator<Item = S>) -> Self {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_assignees<S: Into<String>>(
        mut self,
        assignees: impl IntoIterator<Item = S>,
    ) -> Self {
        self.assignees = assignees.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    #[must_use]
    pub fn with_value_range(mut self, value_range: ValueRange) -> Self {
        self.value_range = value_range;
        self
    }

    /// Returns true if no facet restricts the result.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.priorities.is_empty()
            && self.sources.is_empty()
            && self.assignees.is_empty()
            && self.date_range == DateRange::All
            && self.value_range == ValueRange::default()
    }

    /// Returns true if `lead` passes every facet.
    #[must_use]
    pub fn matches(&self, lead: &Lead, now: DateTime<Utc>) -> bool {
        self.matches_search(lead)
            && (self.priorities.is_empty() || self.priorities.contains(&lead.priority))
            && in_set(&self.sources, lead.source.as_deref())
            && in_set(&self.assignees, lead.assigned_to.as_deref())
            && self.date_range.contains(lead.created_at, now)
            && self.value_range.contains(lead.value)
    }

    /// Returns the visible leads, preserving input order.
    #[must_use]
    pub fn apply<'a>(&self, leads: &'a [Lead], now: DateTime<Utc>) -> Vec<&'a Lead> {
        leads.iter().filter(|lead| self.matches(lead, now)).collect()
    }

    fn matches_search(&self, lead: &Lead) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        lead.searchable_text()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

fn in_set(selected: &BTreeSet<String>, value: Option<&str>) -> bool {
    if selected.is_empty() {
        return true;
    }
    value.is_some_and(|v| selected.contains(v))
}
