//! Fan-out of one fee fetch per combination and fan-in of the survivors.
//!
//! Each combination gets its own spawned task. Tasks report over a single
//! channel sized to the page, and the aggregator drains exactly one message
//! per task. A failed fetch is logged once and dropped; siblings keep
//! running. Anything still outstanding when the deadline passes is aborted
//! and counted as failed. Tasks live in a [`JoinSet`], so dropping the
//! aggregation future aborts every fetch still in flight.
//!
//! The caller-visible result is ordered by the original combination order,
//! not by completion order.

use std::sync::Arc;
use std::time::Duration;

use ongkir_core::{Combination, DataEntry, Location};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::error::FetchError;
use crate::parse::FeePage;
use crate::source::FeeFetcher;

/// Surviving entries of one fan-out plus the number of fetches attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOutcome {
    pub entries: Vec<DataEntry>,
    pub attempted: usize,
}

impl AggregateOutcome {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted.saturating_sub(self.entries.len())
    }
}

struct TaskReport {
    index: usize,
    combination: Combination,
    result: Result<FeePage, FetchError>,
}

/// Fetches every combination concurrently and keeps the successes.
///
/// Never fails as a whole: per-combination errors, panics and deadline
/// expiry all reduce to a dropped entry.
pub async fn aggregate<F>(
    fetcher: Arc<F>,
    combinations: Vec<Combination>,
    weight: u32,
    deadline: Duration,
) -> AggregateOutcome
where
    F: FeeFetcher + 'static,
{
    let attempted = combinations.len();
    if attempted == 0 {
        return AggregateOutcome {
            entries: Vec::new(),
            attempted,
        };
    }

    let routes: Vec<(String, String)> = combinations
        .iter()
        .map(|c| (c.origin.code.clone(), c.destination.code.clone()))
        .collect();

    let (tx, mut rx) = mpsc::channel::<TaskReport>(attempted);
    let mut tasks = JoinSet::new();

    for (index, combination) in combinations.into_iter().enumerate() {
        let tx = tx.clone();
        let fetcher = Arc::clone(&fetcher);
        tasks.spawn(async move {
            let result = fetcher
                .fetch_fee(
                    &combination.origin.code,
                    &combination.destination.code,
                    weight,
                )
                .await;
            let report = TaskReport {
                index,
                combination,
                result,
            };
            if tx.send(report).await.is_err() {
                tracing::debug!(index, "aggregator stopped listening before report");
            }
        });
    }
    drop(tx);

    let deadline_at = Instant::now() + deadline;
    let mut reported = vec![false; attempted];
    let mut survivors: Vec<(usize, DataEntry)> = Vec::with_capacity(attempted);
    let mut received = 0usize;
    let mut deadline_hit = false;

    while received < attempted {
        match tokio::time::timeout_at(deadline_at, rx.recv()).await {
            Ok(Some(report)) => {
                received += 1;
                if let Some(flag) = reported.get_mut(report.index) {
                    *flag = true;
                }
                match report.result {
                    Ok(page) => survivors.push((
                        report.index,
                        into_entry(report.combination, page, weight),
                    )),
                    Err(error) => tracing::warn!(
                        origin = %report.combination.origin.code,
                        destination = %report.combination.destination.code,
                        weight,
                        error = %error,
                        "dropping combination after failed fee fetch"
                    ),
                }
            }
            // Every sender is gone: the remaining tasks ended without reporting.
            Ok(None) => break,
            Err(_) => {
                deadline_hit = true;
                break;
            }
        }
    }

    tasks.abort_all();

    for (index, (origin, destination)) in routes.iter().enumerate() {
        if reported.get(index).copied().unwrap_or(true) {
            continue;
        }
        if deadline_hit {
            tracing::warn!(
                origin = %origin,
                destination = %destination,
                weight,
                deadline_secs = deadline.as_secs(),
                "dropping combination after aggregation deadline"
            );
        } else {
            tracing::warn!(
                origin = %origin,
                destination = %destination,
                weight,
                "dropping combination whose fetch task ended without a result"
            );
        }
    }

    survivors.sort_by_key(|(index, _)| *index);
    let entries: Vec<DataEntry> = survivors.into_iter().map(|(_, entry)| entry).collect();

    tracing::info!(
        attempted,
        succeeded = entries.len(),
        failed = attempted - entries.len(),
        "fee fan-out complete"
    );

    AggregateOutcome { entries, attempted }
}

/// Resolved codes from the combination, labels from the page.
fn into_entry(combination: Combination, page: FeePage, weight: u32) -> DataEntry {
    DataEntry {
        origin: Location {
            code: combination.origin.code,
            label: page.origin_label,
        },
        destination: Location {
            code: combination.destination.code,
            label: page.destination_label,
        },
        weight,
        tariff: page.tariff,
    }
}
