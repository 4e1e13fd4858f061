//! Network replication and persistence for the paddle-chess match engine.
//!
//! The authoritative side ([`server::GameServer`]) runs the real simulation
//! and streams full-state snapshots; the thin side ([`client::GameClient`])
//! never mutates the simulation except by applying a received snapshot
//! wholesale. Both ends exchange length-prefixed frames ([`wire`]).

pub mod client;
pub mod save;
pub mod server;
pub mod wire;

pub use client::GameClient;
pub use server::GameServer;
pub use wire::Message;

/// Bound of the channels between a receive thread and the simulation tick.
///
/// Senders `try_send` and drop on overflow; the reader drains everything
/// available each tick and keeps only the newest item. Dropping stale
/// snapshots/inputs is deliberate — every message is a full-state frame, so
/// last-write-wins loses nothing.
pub const CHANNEL_DEPTH: usize = 32;
