//! Turn engine.
//!
//! Rule computation lives in plain functions over a leased working copy of
//! a player. [`Engine`] is the shell around them: it takes rows, checks room
//! status and turn ownership, commits, then publishes.
//!
//! - [`Engine`] — Every match action, applied atomically
//! - [`Rules`] — Board and turn-gating knobs
//! - [`Dice`] — Injectable randomness for throws and card draws
//! - [`step`], [`collect`], [`affords`] — Movement, asset returns, dream gate
mod dice;
mod engine;
mod moves;
mod outcome;
mod rules;

pub use dice::*;
pub use engine::*;
pub use moves::*;
pub use outcome::*;
pub use rules::*;
