//! # Shiptrack TUI
//!
//! A terminal shipment tracker backed by a hosted auth service and row store.
//!
//! ## Features
//! - Sign up, log in, log out
//! - Shipment list with detail panel
//! - Add shipment form
//! - Edit shipment modal
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine over an explicit view enum)
//! - Network Layer (Tokio runtime, `Backend` trait)

pub mod models;
pub mod config;
pub mod constants;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{Credentials, Shipment, ShipmentDraft, ShipmentId};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor, View};
pub use network::{Backend, NetworkActor, RemoteError, SupabaseClient};
