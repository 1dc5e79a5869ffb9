//! Read-only content consumed by the engine.
//!
//! Identity, card and dream definitions live outside the engine. It only
//! needs lookups against them, plus one idempotent write: recording that a
//! user unlocked a dream.
//!
//! - [`Catalog`] — Async lookup trait the engine depends on
//! - [`Library`] — In-memory catalog loaded from JSON or built-in defaults
//! - [`EventCard`], [`SavingsCard`], [`SpendingCard`] — Card definitions
//! - [`Dream`] — Victory purchase with optional prerequisite
//! - [`Asset`] — Purchasable asset and its per-return profit
mod asset;
mod cards;
mod defaults;
mod dream;
mod library;
mod user;

pub use asset::*;
pub use cards::*;
pub use dream::*;
pub use library::*;
pub use user::*;
