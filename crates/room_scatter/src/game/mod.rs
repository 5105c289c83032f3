//! Game-side collaborators built on the placement engine.
//!
//! - [`bus`]: typed game events delivered to subscribers over channels
//! - [`schedule`]: deferred work run by the surrounding frame loop
//! - [`laser`]: ceiling and horizontal laser obstacles
//! - [`objective`]: the farthest-from-player objective
//! - [`score`]: score keeping
//! - [`session`]: coordinator wiring the pieces above to a room and a player
pub mod bus;
pub mod laser;
pub mod objective;
pub mod schedule;
pub mod score;
pub mod session;
