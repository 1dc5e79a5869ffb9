//! Board geometry.
//!
//! Pure functions over board indices. The board itself is opaque: positions
//! run from zero upward, a fixed set of them are special ("yellow strip")
//! tiles, and every ten tiles form a phase.
//!
//! - [`Board`] — Special tile membership
//! - [`phase_of`] — Phase (decade) containing a tile
//! - [`return_window`] — Odd tiles of the phase after a purchase
//! - [`furthest_token`] — Most advanced token position
mod phase;
mod tiles;

pub use phase::*;
pub use tiles::*;
