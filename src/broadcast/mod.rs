//! Event vocabulary and per-match fan-out.
//!
//! Every state change the engine commits is described by one or more
//! [`Record`]s. The [`Hub`] pushes them, already JSON-encoded, to every
//! live subscriber of the match in publish order, and hands them to a
//! [`Journal`] for whoever wants a durable trail.
//!
//! - [`Event`] — Typed payload of one record
//! - [`Kind`] — Closed set of wire `type` tags
//! - [`Record`] — `{type, matchId, data, timestamp}` envelope
//! - [`Hub`] — Per-match subscriber registry and publisher
//! - [`Stage`] — Publishing rights on one match, held across a commit
//! - [`Journal`] — Sink for published records
mod event;
mod hub;
mod journal;
#[cfg(feature = "database")]
mod postgres;

pub use event::*;
pub use hub::*;
pub use journal::*;
#[cfg(feature = "database")]
pub use postgres::*;
