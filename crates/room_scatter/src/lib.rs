#![forbid(unsafe_code)]
//! room_scatter: Constrained placement of objects on the surfaces of a scanned room.
//!
//! Modules:
//! - geometry: bounds, rays, polygons and oriented-box overlap tests
//! - room: the room geometry provider interface, labels and a reference scanned room
//! - placement: first-valid and farthest-point placement, validity predicates, events
//! - game: laser and objective spawners, score board, event bus, frame scheduler, session
//!
//! The placement engine only consumes [`room::RoomGeometry`]; the game module turns
//! placement results into lasers and objectives.
pub mod error;
pub mod game;
pub mod geometry;
pub mod placement;
pub mod room;

/// Convenient re-exports for common types. Import with `use room_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::game::bus::{GameEvent, GameEventBus, GameEventFilter, Subscription};
    pub use crate::game::laser::{Beam, Laser, LaserKind, LaserSettings, LaserSpawner};
    pub use crate::game::objective::{ObjectiveSettings, ObjectiveSpawner};
    pub use crate::game::schedule::FrameScheduler;
    pub use crate::game::score::ScoreBoard;
    pub use crate::game::session::{GameSession, SessionConfig, SessionTask, TickReport};
    pub use crate::geometry::bounds::{Aabb, OrientedBox};
    pub use crate::geometry::ray::{Ray, RayHit};
    pub use crate::placement::engine::{
        Placement, PlacementEngine, PlacementScene, PlacementTarget, SpawnedObject,
    };
    pub use crate::placement::events::{
        ChannelSink, EventSink, FnSink, MultiSink, PlacementEvent, PlacementEventKind, VecSink,
    };
    pub use crate::placement::footprint::{Footprint, FootprintOffsets};
    pub use crate::placement::request::{
        DistanceMetric, FarthestSearch, ObjectTemplate, PlacementRequest, SpawnLocation,
    };
    pub use crate::placement::validity::Rejection;
    pub use crate::placement::{Pose, SpawnId};
    pub use crate::room::collider::{Collider, ColliderSet, LayerMask, OverlapQuery};
    pub use crate::room::labels::{LabelFilter, SceneLabels, SurfaceType};
    pub use crate::room::scanned::{SceneAnchor, ScannedRoom};
    pub use crate::room::{RoomGeometry, SurfaceSample, DEFAULT_WALL_WARNING_DISTANCE};
}
