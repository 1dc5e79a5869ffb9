//! HTTP surface and match streams.
//!
//! Every route maps one request onto one [`Engine`](crate::engine::Engine)
//! operation. Match streams are websocket sessions bridged onto the
//! broadcast hub; they only ever push.
//!
//! - [`Server`] — actix-web server wiring
//! - [`Config`] — Command-line and environment configuration
//! - [`Session`] — One stream's `connecting → subscribed → closed` lifecycle
//! - [`handlers`] — Route handlers
mod config;
mod dto;
pub mod handlers;
mod server;
mod session;

pub use config::*;
pub use dto::*;
pub use server::*;
pub use session::*;
