use crate::broadcast::Hub;
use crate::catalog::Contents;
use crate::catalog::Library;
use crate::engine::Engine;
use crate::engine::Rules;
use crate::store::Store;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Server configuration, from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
    pub bind: String,
    /// HTTP worker threads.
    #[arg(long, env = "WORKERS", default_value_t = 4)]
    pub workers: usize,
    /// Longest wait for a room or player row before giving up.
    #[arg(long, env = "LOCK_TIMEOUT_MS", default_value_t = 5000)]
    pub lock_timeout_ms: u64,
    /// JSON file with assets, cards, dreams and users. Built-in content otherwise.
    #[arg(long, env = "CATALOG")]
    pub catalog: Option<PathBuf>,
    /// Require the turn to draw an event card.
    #[arg(long, env = "DRAW_REQUIRES_TURN", default_value_t = false)]
    pub draw_requires_turn: bool,
    /// Require the turn to roll.
    #[arg(long, env = "ROLL_REQUIRES_TURN", default_value_t = false)]
    pub roll_requires_turn: bool,
    /// Seed for dice and card draws.
    #[arg(long, env = "SEED")]
    pub seed: Option<u64>,
    /// Accept any user id on join instead of only catalog users.
    #[arg(long, env = "OPEN_USERS", default_value_t = true, action = clap::ArgAction::Set)]
    pub open_users: bool,
}

impl Config {
    pub fn rules(&self) -> Rules {
        Rules::default()
            .gate_draws(self.draw_requires_turn)
            .gate_rolls(self.roll_requires_turn)
    }
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
    pub fn library(&self) -> anyhow::Result<Library> {
        let mut contents = match self.catalog {
            Some(ref path) => Contents::from_file(path)?,
            None => Contents::builtin(),
        };
        if self.open_users {
            contents.users = None;
        } else if contents.users.is_none() {
            contents.users = Some(Vec::new());
        }
        log::info!(
            "[config] catalog with {} dreams and {} event cards",
            contents.dreams.len(),
            contents.events.len()
        );
        Ok(Library::new(contents))
    }
    /// Assembles the engine, connecting the journal when built with `database`.
    pub async fn engine(&self) -> anyhow::Result<Engine> {
        #[cfg(feature = "database")]
        let hub = Hub::new(Arc::new(crate::broadcast::db().await?));
        #[cfg(not(feature = "database"))]
        let hub = Hub::default();
        let engine = Engine::new(
            Store::new(self.timeout()),
            Arc::new(hub),
            Arc::new(self.library()?),
            self.rules(),
        );
        Ok(match self.seed {
            Some(seed) => engine.seeded(seed),
            None => engine,
        })
    }
}
