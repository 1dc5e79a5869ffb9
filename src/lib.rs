//! Authoritative match engine for a multiplayer board-and-economy game.
//!
//! Players join a match, roll dice, move four tokens around a serpentine
//! board, buy assets that pay out in later phases, play event, savings and
//! spending cards, and race to afford a dream. This crate owns the mutable
//! per-match state, enforces turn order and game rules, and fans resulting
//! events out to every live subscriber of the match.
//!
//! ## Modules
//!
//! - [`board`] — Pure board geometry: special tiles, phases, return windows
//! - [`store`] — Rooms, players, row leases and snapshots
//! - [`catalog`] — Read-only card, dream, asset and user lookups
//! - [`engine`] — Turn engine applying actions atomically
//! - [`broadcast`] — Event vocabulary and per-match fan-out
//! - [`hosting`] — HTTP surface and streaming sessions (feature `server`)
pub mod board;
pub mod broadcast;
pub mod catalog;
pub mod engine;
pub mod store;
#[cfg(feature = "server")]
pub mod hosting;

mod error;
pub use error::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Signed point ledger for on-hand points, savings, liabilities and costs.
pub type Points = i64;
/// Board index of a token. Zero is the start; negative moves clamp to zero.
pub type Tile = i64;
/// Seat index around the board, which is also the turn order.
pub type Seat = usize;
/// Milliseconds since the Unix epoch.
pub type Millis = u64;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}
impl<T> std::str::FromStr for ID<T> {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self::from)
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// GAME PARAMETERS
// ============================================================================
/// Tokens each player moves around the board.
pub const TOKENS: usize = 4;
/// On-hand points every seat starts with.
pub const STARTING_POINTS: Points = 1200;
/// Liability added when a reachable special tile is passed over.
pub const SKIPPED_YELLOW_PENALTY: Points = 20;
/// Payouts an asset yields before it is exhausted.
pub const MAX_RETURNS: u8 = 5;
/// Largest distance a token may move in either direction in one move.
pub const MAX_STEPS: Tile = 1000;
/// Tiles per phase of the board.
pub const PHASE_LENGTH: Tile = 10;
/// Faces on each of the two dice.
pub const DIE_FACES: u8 = 6;

// ============================================================================
// WIN CONDITION
// ============================================================================
/// Assets a player must own before buying a dream.
pub const DREAM_MIN_ASSETS: usize = 2;
/// Savings a player must hold before buying a dream.
pub const DREAM_MIN_SAVINGS: Points = 500;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now() -> Millis {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as Millis)
        .unwrap_or_default()
}

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() -> anyhow::Result<()> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", now() / 1000))?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file])?;
    Ok(())
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
/// Live sessions are dropped; no match state outlives the process anyway.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("violent interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}
