//! Remote collaborator contract - auth service plus shipment row store

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Credentials, Shipment, ShipmentDraft};

/// The only failure shape the controller sees: the provider's message,
/// verbatim. Network, validation and auth failures are not distinguished.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        RemoteError {
            message: message.into(),
        }
    }
}

/// Hosted auth + row-store operations. Each call is one best-effort round
/// trip; implementations hold the session internally.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), RemoteError>;

    /// Establishes the session used by the row-store calls
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), RemoteError>;

    async fn sign_out(&self) -> Result<(), RemoteError>;

    async fn select_shipments(&self) -> Result<Vec<Shipment>, RemoteError>;

    async fn insert_shipment(&self, draft: &ShipmentDraft) -> Result<(), RemoteError>;

    /// Overwrites the four fields of the row whose id matches `shipment.id`
    async fn update_shipment(&self, shipment: &Shipment) -> Result<(), RemoteError>;
}
