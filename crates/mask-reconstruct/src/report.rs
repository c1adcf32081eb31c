//! Aggregate build diagnostics.

use std::time::Duration;

/// Per-label record pushed into the event sink by the worker that processed
/// the label.
#[derive(Debug, Clone)]
pub enum LabelEvent {
    /// The label produced a surface.
    Completed(LabelTiming),
    /// The label's isosurface was empty; no object was stored.
    Empty {
        /// The label that yielded no geometry.
        label: i32,
        /// Wall time spent before discovering the surface was empty.
        elapsed: Duration,
    },
}

/// Timing and size of one completed label.
#[derive(Debug, Clone)]
pub struct LabelTiming {
    /// The label.
    pub label: i32,
    /// Wall time for the label's full pipeline run.
    pub elapsed: Duration,
    /// Final vertex count.
    pub vertices: usize,
    /// Final face count.
    pub faces: usize,
}

/// Aggregate diagnostics for one build, assembled after the join barrier.
///
/// Purely observational: nothing in here affects control flow.
#[derive(Debug, Clone, Default)]
pub struct ReconstructReport {
    /// Per-label timings for labels that produced geometry, ascending by
    /// label.
    pub timings: Vec<LabelTiming>,

    /// Labels whose isosurface was empty, ascending.
    pub empty_labels: Vec<i32>,

    /// Wall time of the whole build, including scheduling.
    pub total_elapsed: Duration,

    /// Number of worker threads used.
    pub workers: usize,
}

impl ReconstructReport {
    /// Assemble a report from the event sink contents.
    #[must_use]
    pub(crate) fn from_events(
        events: Vec<LabelEvent>,
        total_elapsed: Duration,
        workers: usize,
    ) -> Self {
        let mut timings = Vec::new();
        let mut empty_labels = Vec::new();
        for event in events {
            match event {
                LabelEvent::Completed(timing) => timings.push(timing),
                LabelEvent::Empty { label, .. } => empty_labels.push(label),
            }
        }
        timings.sort_unstable_by_key(|t| t.label);
        empty_labels.sort_unstable();

        Self {
            timings,
            empty_labels,
            total_elapsed,
            workers,
        }
    }

    /// Number of labels that produced geometry.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.timings.len()
    }
}

impl std::fmt::Display for ReconstructReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} surfaces ({} empty) in {:.2?} on {} worker(s)",
            self.completed(),
            self.empty_labels.len(),
            self.total_elapsed,
            self.workers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_split_and_sorted() {
        let events = vec![
            LabelEvent::Completed(LabelTiming {
                label: 5,
                elapsed: Duration::from_millis(10),
                vertices: 8,
                faces: 12,
            }),
            LabelEvent::Empty {
                label: 9,
                elapsed: Duration::from_millis(1),
            },
            LabelEvent::Completed(LabelTiming {
                label: 1,
                elapsed: Duration::from_millis(20),
                vertices: 4,
                faces: 4,
            }),
        ];

        let report = ReconstructReport::from_events(events, Duration::from_millis(31), 2);
        assert_eq!(report.completed(), 2);
        assert_eq!(report.timings[0].label, 1);
        assert_eq!(report.timings[1].label, 5);
        assert_eq!(report.empty_labels, vec![9]);
        assert_eq!(report.workers, 2);
    }

    #[test]
    fn display_summarizes() {
        let report = ReconstructReport::from_events(Vec::new(), Duration::from_secs(1), 4);
        let text = format!("{report}");
        assert!(text.contains("0 surfaces"));
        assert!(text.contains("4 worker(s)"));
    }
}
