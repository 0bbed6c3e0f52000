//! Category and target filters.
//!
//! Both filters are case-insensitive substring checks and are combined
//! with AND. A missing, blank, or "all" value disables a filter.

use crate::types::{Record, SearchFilters};

/// Category values that mean "no category filter".
const CATEGORY_ALL: &[&str] = &["all", "전체"];

/// Target values that mean "no target filter".
const TARGET_ALL: &[&str] = &["all targets", "all", "전체", "전체 대상"];

/// The active needle of a filter, lowercased, or `None` when disabled.
fn active(value: Option<&str>, sentinels: &[&str]) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    let lowered = value.to_lowercase();
    if sentinels.contains(&lowered.as_str()) {
        return None;
    }
    Some(lowered)
}

/// Lowercased needles for a [`SearchFilters`] value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    category: Option<String>,
    target: Option<String>,
}

impl ActiveFilters {
    pub fn new(filters: &SearchFilters) -> Self {
        Self {
            category: active(filters.category.as_deref(), CATEGORY_ALL),
            target: active(filters.target.as_deref(), TARGET_ALL),
        }
    }

    /// Whether `record` passes every active filter.
    pub fn matches(&self, record: &Record) -> bool {
        let contains = |field: &str, needle: &Option<String>| {
            needle
                .as_deref()
                .map_or(true, |n| field.to_lowercase().contains(n))
        };
        contains(&record.industry, &self.category) && contains(&record.target, &self.target)
    }
}
