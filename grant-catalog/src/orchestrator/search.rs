//! Filter, score, rank, truncate.

use crate::types::{Record, SearchFilters, SearchOutcome};

use super::filter::ActiveFilters;
use super::scoring::{score, tokenize};

/// Search `catalog` for `query`.
///
/// # Pipeline
///
/// 1. Drop records that fail the category or target filter
/// 2. With a blank query, return the first `limit` survivors in catalog
///    order; `matched_count` is the number of survivors
/// 3. Otherwise score each survivor and drop the zero scores
/// 4. Stable sort by score descending, so ties keep catalog order
/// 5. Record `matched_count` before truncating to `limit`
pub fn search_catalog(
    catalog: &[Record],
    query: &str,
    filters: &SearchFilters,
    limit: usize,
) -> SearchOutcome {
    let filters = ActiveFilters::new(filters);
    let filtered = catalog.iter().filter(|r| filters.matches(r));

    let tokens = tokenize(query);
    if tokens.is_empty() {
        let survivors: Vec<&Record> = filtered.collect();
        return SearchOutcome {
            matched_count: survivors.len(),
            results: survivors.into_iter().take(limit).cloned().collect(),
        };
    }

    let mut scored: Vec<(usize, &Record)> = filtered
        .map(|record| (score(record, &tokens), record))
        .filter(|(s, _)| *s > 0)
        .collect();

    // `sort_by` is stable.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let matched_count = scored.len();
    scored.truncate(limit);
    tracing::trace!(tokens = tokens.len(), matched_count, "catalog search");

    SearchOutcome {
        matched_count,
        results: scored.into_iter().map(|(_, r)| r.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> Record {
        Record {
            title: title.into(),
            ..Default::default()
        }
    }

    fn titles(outcome: &SearchOutcome) -> Vec<&str> {
        outcome.results.iter().map(|r| r.title.as_str()).collect()
    }

    fn catalog() -> Vec<Record> {
        vec![
            record("청년창업지원"),
            record("R&D 바우처"),
            record("청년 주거"),
            record("수출 지원"),
        ]
    }

    #[test]
    fn blank_query_returns_catalog_prefix() {
        let outcome = search_catalog(&catalog(), "   ", &SearchFilters::default(), 2);
        assert_eq!(outcome.matched_count, 4);
        assert_eq!(titles(&outcome), vec!["청년창업지원", "R&D 바우처"]);
    }

    #[test]
    fn higher_score_ranks_first() {
        let outcome = search_catalog(&catalog(), "청년 지원", &SearchFilters::default(), 10);
        assert_eq!(outcome.matched_count, 3);
        assert_eq!(titles(&outcome), vec!["청년창업지원", "청년 주거", "수출 지원"]);
    }

    #[test]
    fn ties_keep_catalog_order() {
        let outcome = search_catalog(&catalog(), "청년", &SearchFilters::default(), 10);
        assert_eq!(titles(&outcome), vec!["청년창업지원", "청년 주거"]);
    }

    #[test]
    fn matched_count_is_taken_before_truncation() {
        let outcome = search_catalog(&catalog(), "청년 지원", &SearchFilters::default(), 1);
        assert_eq!(outcome.matched_count, 3);
        assert_eq!(titles(&outcome), vec!["청년창업지원"]);
    }

    #[test]
    fn zero_limit_still_counts_matches() {
        let outcome = search_catalog(&catalog(), "지원", &SearchFilters::default(), 0);
        assert_eq!(outcome.matched_count, 2);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn no_match_is_empty() {
        let outcome = search_catalog(&catalog(), "항공우주", &SearchFilters::default(), 10);
        assert_eq!(outcome, SearchOutcome::default());
    }

    #[test]
    fn empty_catalog_is_empty() {
        let outcome = search_catalog(&[], "", &SearchFilters::default(), 10);
        assert_eq!(outcome.matched_count, 0);
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn filters_apply_before_scoring() {
        let mut records = catalog();
        records[2].target = "청년".into();
        let filters = SearchFilters {
            category: None,
            target: Some("청년".into()),
        };
        let outcome = search_catalog(&records, "청년", &filters, 10);
        assert_eq!(outcome.matched_count, 1);
        assert_eq!(titles(&outcome), vec!["청년 주거"]);

        let outcome = search_catalog(&records, "", &filters, 10);
        assert_eq!(outcome.matched_count, 1);
    }
}
