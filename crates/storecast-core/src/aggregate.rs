//! Multi-store aggregation: counts, total, and top-2 ranking.

use storecast_types::outcome::{AggregateSummary, RankedStore, StoreOutcome, StoreReport, TopPair};

use crate::reply::Replies;

/// Build the aggregate view over one request's reports.
///
/// `ServiceDown` stores are counted in no bucket and contribute nothing to
/// the total. Ranking is a stable descending sort on the total, so ties keep
/// extraction order.
pub fn aggregate(reports: &[StoreReport]) -> AggregateSummary {
    let mut summary = AggregateSummary::default();
    let mut ranked = Vec::new();

    for report in reports {
        match report.outcome {
            StoreOutcome::Predicted { total } => {
                summary.valid += 1;
                summary.total += total;
                ranked.push(RankedStore {
                    store: report.store,
                    total,
                });
            }
            StoreOutcome::Closed => summary.closed += 1,
            StoreOutcome::NotFound => summary.not_found += 1,
            StoreOutcome::ServiceDown => {}
        }
    }

    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    if let [first, second, ..] = ranked.as_slice() {
        summary.top = Some(TopPair {
            first: *first,
            second: *second,
            difference: first.total - second.total,
        });
    }

    summary
}

/// Aggregate and render the summary block.
pub fn summarize(reports: &[StoreReport], replies: &Replies) -> String {
    replies.summary(&aggregate(reports))
}

/// Whether a request's reply carries a summary: more than one store asked
/// for and at least one predicted.
pub fn wants_summary(reports: &[StoreReport]) -> bool {
    reports.len() > 1
        && reports
            .iter()
            .any(|r| matches!(r.outcome, StoreOutcome::Predicted { .. }))
}
