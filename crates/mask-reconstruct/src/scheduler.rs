//! Fixed worker pool driven by an atomic work cursor.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use mask_types::Volume;
use tracing::info;

use crate::pipeline::process_label;
use crate::report::{LabelEvent, ReconstructReport};
use crate::store::MeshCollection;
use crate::{CancelToken, ReconstructParams};

/// Fallback worker count when hardware concurrency cannot be determined.
const DEFAULT_WORKERS: usize = 4;

/// Shared state for one build.
///
/// The result store and the event sink sit behind separate mutexes so that
/// recording diagnostics never blocks result accumulation.
struct BuildContext {
    store: Mutex<MeshCollection>,
    events: Mutex<Vec<LabelEvent>>,
}

/// Fan the labels out over a fixed pool of OS threads and block until every
/// worker has terminated.
///
/// Work distribution is a single shared atomic cursor: each worker claims
/// the next unprocessed label index with `fetch_add`, so every label is
/// processed by exactly one worker and a worker finishing a cheap label
/// immediately claims the next one instead of idling.
pub(crate) fn run_pool(
    volume: &Volume,
    labels: &[i32],
    params: &ReconstructParams,
    cancel: &CancelToken,
) -> (MeshCollection, ReconstructReport) {
    let start = Instant::now();
    let workers = worker_count(params.threads, labels.len());
    info!(workers, labels = labels.len(), "starting reconstruction pool");

    let context = BuildContext {
        store: Mutex::new(MeshCollection::new()),
        events: Mutex::new(Vec::with_capacity(labels.len())),
    };
    let cursor = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| worker_loop(volume, labels, params, cancel, &cursor, &context));
        }
        // Leaving the scope is the join barrier: it blocks until every
        // worker has terminated, which orders all their writes before the
        // reads below.
    });

    let store = context
        .store
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    let events = context
        .events
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);

    let report = ReconstructReport::from_events(events, start.elapsed(), workers);
    info!(
        completed = report.completed(),
        empty = report.empty_labels.len(),
        elapsed = ?report.total_elapsed,
        "reconstruction pool finished"
    );

    (store, report)
}

/// One worker: claim, process, append, repeat until the cursor runs out or
/// the build is cancelled.
fn worker_loop(
    volume: &Volume,
    labels: &[i32],
    params: &ReconstructParams,
    cancel: &CancelToken,
    cursor: &AtomicUsize,
    context: &BuildContext,
) {
    // Diagnostics accumulate worker-locally and land in the sink once, so
    // the events lock is never taken while a label is in flight.
    let mut local_events = Vec::new();

    loop {
        if cancel.is_cancelled() {
            break;
        }
        let index = cursor.fetch_add(1, Ordering::Relaxed);
        let Some(&label) = labels.get(index) else {
            break;
        };

        let (event, object) = process_label(volume, label, params);
        local_events.push(event);

        if let Some(object) = object {
            context
                .store
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(object);
        }
    }

    if !local_events.is_empty() {
        context
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(local_events);
    }
}

/// Worker count: `min(max(hint_or_hardware_concurrency_or_4, 1), labels)`.
fn worker_count(hint: usize, label_count: usize) -> usize {
    let base = if hint == 0 {
        thread::available_parallelism().map_or(DEFAULT_WORKERS, NonZeroUsize::get)
    } else {
        hint
    };
    base.max(1).min(label_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_hint_is_clamped_to_label_count() {
        assert_eq!(worker_count(8, 3), 3);
        assert_eq!(worker_count(2, 5), 2);
        assert_eq!(worker_count(1, 1), 1);
    }

    #[test]
    fn automatic_hint_stays_in_range() {
        let n = worker_count(0, 6);
        assert!((1..=6).contains(&n));
    }

    #[test]
    fn single_label_uses_one_worker() {
        assert_eq!(worker_count(0, 1), 1);
        assert_eq!(worker_count(64, 1), 1);
    }
}
