//! Durable match state and its locking discipline.
//!
//! Rooms and their players are the only shared mutable state in the engine.
//! Each room is a [`Table`] with one gate for the room row and one gate per
//! player row. An action acquires the gates it needs through a [`Lease`]
//! (player row only) or a [`TurnLease`] (room row, then player row), works on
//! private copies, and commits every changed field in one write.
//!
//! ## Core Types
//!
//! - [`Store`] — Registry of tables with create/join/start/lock operations
//! - [`Room`] — One game instance and its turn pointer
//! - [`Player`] — Per-seat ledger, tokens and owned assets
//! - [`Holding`] — An owned asset and how many returns it has paid
//! - [`Snapshot`] — Consistent view of a room and all its players
//! - [`Lease`], [`TurnLease`], [`RoomLease`] — Held rows awaiting commit
mod field;
mod holding;
mod lease;
mod player;
mod room;
mod snapshot;
mod store;
mod table;

pub use field::*;
pub use holding::*;
pub use lease::*;
pub use player::*;
pub use room::*;
pub use snapshot::*;
pub use store::*;
pub use table::*;
