//! Structured trace events emitted while following features.
//!
//! The search and the follower never log directly; they hand a [`TraceEvent`]
//! to whatever [`TraceSink`] the caller injected. [`LogSink`] forwards to the
//! `log` facade, [`RecordingSink`] keeps the events for inspection.

use crate::follow::FailureReason;
use crate::search::CompassDirection;
use log::{debug, info, warn};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TraceEvent {
    FeatureStarted {
        ref_id: i32,
        reference_points: usize,
        start: [i32; 2],
    },
    SearchStarted {
        target: [i32; 2],
        direction: CompassDirection,
    },
    PointFound {
        target: [i32; 2],
        found: [i32; 2],
        radius: u32,
        distance: f64,
    },
    PointNotFound {
        target: [i32; 2],
        tolerance: u32,
    },
    FeatureMatched {
        ref_id: i32,
        matched: usize,
        reference: usize,
    },
    FeatureRejected {
        ref_id: i32,
        reason: FailureReason,
        reference: Vec<[i32; 2]>,
    },
    RecordSkipped {
        line: Option<usize>,
        message: String,
    },
}

pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    fn record(&mut self, event: TraceEvent) {
        (**self).record(event);
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&mut self, _event: TraceEvent) {}
}

/// Keeps every event in arrival order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Vec<TraceEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Forward the recorded events to `sink`, preserving order.
    pub fn replay_into<S: TraceSink + ?Sized>(self, sink: &mut S) {
        for event in self.events {
            sink.record(event);
        }
    }
}

impl TraceSink for RecordingSink {
    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Forwards events to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn record(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::FeatureStarted {
                ref_id,
                reference_points,
                start,
            } => debug!(
                "feature {ref_id}: start at ({},{}) with {reference_points} points",
                start[0], start[1]
            ),
            TraceEvent::SearchStarted { target, direction } => debug!(
                "looking for point at ({},{}) direction {}",
                target[0],
                target[1],
                direction.label()
            ),
            TraceEvent::PointFound {
                found,
                radius,
                distance,
                ..
            } => debug!(
                "--- found at ({},{}) radius={radius} distance={distance:.3}",
                found[0], found[1]
            ),
            TraceEvent::PointNotFound { target, tolerance } => debug!(
                "--- nothing within {tolerance}px of ({},{})",
                target[0], target[1]
            ),
            TraceEvent::FeatureMatched {
                ref_id,
                matched,
                reference,
            } => info!("feature {ref_id}: matched {matched} of {reference} points"),
            TraceEvent::FeatureRejected {
                ref_id,
                reason,
                reference,
            } => info!(
                "feature {ref_id}: {} (reference points {:?})",
                reason.describe(),
                reference
            ),
            TraceEvent::RecordSkipped { line, message } => match line {
                Some(line) => warn!("skipping reference record on line {line}: {message}"),
                None => warn!("skipping reference record: {message}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_replays_in_order() {
        let mut first = RecordingSink::new();
        first.record(TraceEvent::PointNotFound {
            target: [1, 2],
            tolerance: 3,
        });
        first.record(TraceEvent::RecordSkipped {
            line: Some(4),
            message: "bad".into(),
        });
        let expected = first.events().to_vec();

        let mut second = RecordingSink::new();
        first.replay_into(&mut second);
        assert_eq!(second.events(), expected.as_slice());
    }

    #[test]
    fn events_serialize_with_tag() {
        let json = serde_json::to_string(&TraceEvent::FeatureMatched {
            ref_id: 7,
            matched: 3,
            reference: 4,
        })
        .unwrap();
        assert!(json.contains("\"event\":\"featureMatched\""), "{json}");
        assert!(json.contains("\"refId\":7"), "{json}");

        let json = serde_json::to_string(&TraceEvent::FeatureStarted {
            ref_id: 2,
            reference_points: 5,
            start: [1, 2],
        })
        .unwrap();
        assert!(json.contains("\"referencePoints\":5"), "{json}");
        assert!(!json.contains("reference_points"), "{json}");
    }
}
