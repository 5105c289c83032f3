//! Event types and sinks for observing placement calls.
//!
//! This module defines [`PlacementEvent`] and a set of sinks to emit, collect, or
//! forward events while [`crate::placement::engine::PlacementEngine`] samples candidates.
use crossbeam_channel::Sender;
use glam::Vec3;

use crate::placement::validity::Rejection;
use crate::placement::{Pose, SpawnId};

/// Describes events emitted by placement operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementEvent {
    /// A sampled candidate failed a validity predicate.
    CandidateRejected {
        /// 1-based raw iteration that produced the candidate.
        iteration: u32,
        /// Object position the candidate would have used.
        position: Vec3,
        reason: Rejection,
    },

    /// A valid candidate was ranked during a farthest-point search.
    CandidateAccepted {
        iteration: u32,
        position: Vec3,
        /// Distance from the search reference point.
        distance: f32,
        /// Valid candidates still to rank after this one.
        remaining: u32,
    },

    /// A new entity was instantiated and added to the spawned set.
    Spawned {
        id: SpawnId,
        name: String,
        pose: Pose,
        iterations: u32,
    },

    /// An existing entity was moved.
    Relocated {
        id: SpawnId,
        pose: Pose,
        iterations: u32,
    },

    /// A placement call failed.
    Failed {
        /// Object the call was placing.
        name: String,
        message: String,
    },

    /// An entity was removed from the spawned set.
    Despawned { id: SpawnId, name: String },
}

/// Discriminant of [`PlacementEvent`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementEventKind {
    CandidateRejected,
    CandidateAccepted,
    Spawned,
    Relocated,
    Failed,
    Despawned,
}

impl PlacementEvent {
    pub fn kind(&self) -> PlacementEventKind {
        match self {
            Self::CandidateRejected { .. } => PlacementEventKind::CandidateRejected,
            Self::CandidateAccepted { .. } => PlacementEventKind::CandidateAccepted,
            Self::Spawned { .. } => PlacementEventKind::Spawned,
            Self::Relocated { .. } => PlacementEventKind::Relocated,
            Self::Failed { .. } => PlacementEventKind::Failed,
            Self::Despawned { .. } => PlacementEventKind::Despawned,
        }
    }
}

/// A generic event sink that accepts [`PlacementEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PlacementEvent);

    /// Lets sinks skip building events they would drop anyway.
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PlacementEvent) {}

    #[inline]
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PlacementEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<PlacementEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PlacementEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: PlacementEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: PlacementEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            if sink.wants(event.kind()) {
                sink.send(event.clone());
            }
        }
        if last.wants(event.kind()) {
            last.send(event);
        }
    }

    fn wants(&self, kind: PlacementEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

/// Forwards events into a channel, e.g. to a UI or logging thread.
///
/// A disconnected receiver is ignored.
pub struct ChannelSink {
    pub tx: Sender<PlacementEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<PlacementEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed() -> PlacementEvent {
        PlacementEvent::Failed {
            name: "laser".into(),
            message: "m".into(),
        }
    }

    #[test]
    fn vec_sink_collects_and_counts() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(failed());
        sink.send(PlacementEvent::Despawned {
            id: SpawnId(1),
            name: "laser".into(),
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.count(PlacementEventKind::Failed), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn unit_sink_wants_nothing() {
        assert!(!().wants(PlacementEventKind::Spawned));
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(failed());
        let sinks = multi.into_inner();
        assert_eq!(sinks.len(), 2);
        assert!(sinks.iter().all(|s| s.as_slice() == [failed()]));
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(failed());
        assert_eq!(count, 1);
    }

    #[test]
    fn channel_sink_forwards_until_disconnected() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut sink = ChannelSink::new(tx);
        sink.send(failed());
        assert_eq!(rx.try_recv().ok(), Some(failed()));
        drop(rx);
        sink.send(failed());
    }
}
