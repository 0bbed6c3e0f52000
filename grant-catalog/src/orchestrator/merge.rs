//! Concurrent source fan-out and precedence merge.
//!
//! Every adapter is fetched at once. Results are concatenated in the
//! order the adapters are given, which the catalog manager keeps sorted
//! by [`crate::types::SourceKind::precedence`]. A slow or failing source
//! only costs its own rows.

use std::sync::Arc;
use std::time::Duration;

use crate::error::CatalogError;
use crate::normalize::normalize;
use crate::source::{SourceAdapter, SourceOutcome, SourceReport};
use crate::types::Record;

/// Fetch one adapter under `deadline` and normalise its rows.
///
/// Records without a title are dropped here. The report counts only the
/// records that survive.
pub async fn load_source(
    adapter: &dyn SourceAdapter,
    deadline: Duration,
) -> (SourceReport, Vec<Record>) {
    let source = adapter.kind();
    let fetched = match tokio::time::timeout(deadline, adapter.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(CatalogError::Timeout(format!(
            "{source} did not answer within {}s",
            deadline.as_secs()
        ))),
    };

    match fetched {
        Ok(rows) => {
            let fetched = rows.len();
            let records: Vec<Record> = rows
                .iter()
                .map(normalize)
                .filter(Record::has_title)
                .collect();
            tracing::debug!(%source, fetched, kept = records.len(), "source loaded");
            let report = SourceReport {
                source,
                outcome: SourceOutcome::Loaded {
                    records: records.len(),
                },
            };
            (report, records)
        }
        Err(err) => {
            let outcome = SourceOutcome::from_error(&err);
            match &outcome {
                SourceOutcome::Disabled { reason } => {
                    tracing::debug!(%source, %reason, "source disabled");
                }
                _ => tracing::warn!(source = %source, error = %err, "source fetch failed"),
            }
            (SourceReport { source, outcome }, Vec::new())
        }
    }
}

/// Fetch all `adapters` concurrently and concatenate their records.
///
/// The returned reports line up with `adapters`.
pub async fn merge_sources(
    adapters: &[Arc<dyn SourceAdapter>],
    deadline: Duration,
) -> (Vec<Record>, Vec<SourceReport>) {
    let futures: Vec<_> = adapters
        .iter()
        .map(|adapter| load_source(adapter.as_ref(), deadline))
        .collect();

    let outcomes = futures::future::join_all(futures).await;

    let mut catalog = Vec::new();
    let mut reports = Vec::with_capacity(outcomes.len());
    for (report, records) in outcomes {
        catalog.extend(records);
        reports.push(report);
    }
    (catalog, reports)
}
