//! Match Server Binary
//!
//! Serves the match HTTP API and per-match event streams.

use clap::Parser;
use dreamlane::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log()?;
    kys();
    let config = hosting::Config::parse();
    hosting::Server::run(config).await
}
