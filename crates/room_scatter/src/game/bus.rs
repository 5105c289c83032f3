//! Game event bus.
//!
//! Each subscriber owns an unbounded `crossbeam_channel` queue. Publishing pushes the
//! event into every matching queue in subscription order; subscribers drain their queue
//! when it suits them, so delivery order always equals publish order.
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, trace};

/// Discrete gameplay notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    /// The player grabbed the objective.
    DiamondGrab,
    /// The player touched a laser beam.
    HitLaser,
    SpawnMinigame,
    MinigameCompleted,
}

impl GameEvent {
    fn bit(self) -> u8 {
        match self {
            Self::DiamondGrab => 1 << 0,
            Self::HitLaser => 1 << 1,
            Self::SpawnMinigame => 1 << 2,
            Self::MinigameCompleted => 1 << 3,
        }
    }
}

/// Set of event types a subscriber receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameEventFilter(u8);

impl GameEventFilter {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b1111);

    pub fn only(event: GameEvent) -> Self {
        Self(event.bit())
    }

    pub fn with(self, event: GameEvent) -> Self {
        Self(self.0 | event.bit())
    }

    pub fn accepts(self, event: GameEvent) -> bool {
        self.0 & event.bit() != 0
    }
}

impl Default for GameEventFilter {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<GameEvent> for GameEventFilter {
    fn from(event: GameEvent) -> Self {
        Self::only(event)
    }
}

/// Receiving end handed out by [`GameEventBus::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: Receiver<GameEvent>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next queued event, if any.
    pub fn try_recv(&self) -> Option<GameEvent> {
        self.rx.try_recv().ok()
    }

    /// Takes every queued event in publish order.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.rx.try_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

struct Subscriber {
    id: u64,
    filter: GameEventFilter,
    tx: Sender<GameEvent>,
}

/// Fan-out of [`GameEvent`]s to filtered subscribers.
#[derive(Default)]
pub struct GameEventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, filter: impl Into<GameEventFilter>) -> Subscription {
        let (tx, rx) = crossbeam_channel::unbounded();
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            filter: filter.into(),
            tx,
        });
        debug!("Subscriber {} joined the game event bus.", id);
        Subscription { id, rx }
    }

    /// Removes a subscriber. Events already queued stay readable on its [`Subscription`].
    pub fn unsubscribe(&mut self, id: u64) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        before != self.subscribers.len()
    }

    /// Delivers `event` to every subscriber whose filter accepts it and returns how many
    /// received it. Subscribers whose [`Subscription`] was dropped are pruned.
    pub fn publish(&mut self, event: GameEvent) -> usize {
        let mut delivered = 0;
        self.subscribers.retain(|s| {
            if !s.filter.accepts(event) {
                return true;
            }
            match s.tx.send(event) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    debug!("Dropping disconnected subscriber {}.", s.id);
                    false
                }
            }
        });
        trace!("Published {:?} to {} subscribers.", event, delivered);
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_preserves_publish_order() {
        let mut bus = GameEventBus::new();
        let sub = bus.subscribe(GameEventFilter::ALL);
        bus.publish(GameEvent::HitLaser);
        bus.publish(GameEvent::DiamondGrab);
        bus.publish(GameEvent::HitLaser);
        assert_eq!(
            sub.drain(),
            vec![GameEvent::HitLaser, GameEvent::DiamondGrab, GameEvent::HitLaser]
        );
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn filters_select_event_types() {
        let mut bus = GameEventBus::new();
        let grabs = bus.subscribe(GameEvent::DiamondGrab);
        let both = bus.subscribe(
            GameEventFilter::only(GameEvent::DiamondGrab).with(GameEvent::HitLaser),
        );
        assert_eq!(bus.publish(GameEvent::HitLaser), 1);
        assert_eq!(bus.publish(GameEvent::DiamondGrab), 2);
        assert_eq!(bus.publish(GameEvent::MinigameCompleted), 0);
        assert_eq!(grabs.drain(), vec![GameEvent::DiamondGrab]);
        assert_eq!(both.pending(), 2);
        assert!(!GameEventFilter::NONE.accepts(GameEvent::SpawnMinigame));
    }

    #[test]
    fn unsubscribe_and_dropped_receivers() {
        let mut bus = GameEventBus::new();
        let a = bus.subscribe(GameEventFilter::ALL);
        let b = bus.subscribe(GameEventFilter::ALL);
        assert!(bus.unsubscribe(a.id()));
        assert!(!bus.unsubscribe(a.id()));
        drop(b);
        assert_eq!(bus.publish(GameEvent::DiamondGrab), 0);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(a.try_recv(), None);
    }
}
