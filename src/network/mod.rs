//! Network layer - remote auth and row-store calls
//!
//! The Network actor receives commands from the App actor, runs each one
//! against a `Backend`, and sends back exactly one response per command.

pub mod actor;
pub mod backend;
pub mod client;
#[cfg(test)]
pub mod memory;

pub use actor::NetworkActor;
pub use backend::{Backend, RemoteError};
pub use client::SupabaseClient;
