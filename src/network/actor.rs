//! Network actor - runs backend calls in the Tokio async runtime

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::network::Operation;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::backend::{Backend, RemoteError};

/// Network actor that executes each command as an independent task
pub struct NetworkActor {
    backend: Arc<dyn Backend>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(
        backend: Arc<dyn Backend>,
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
    ) -> Self {
        NetworkActor {
            backend,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => {
                            // In-flight calls are abandoned; nobody is listening anymore
                            self.active_requests.abort_all();
                            break;
                        }
                        Some(cmd) => {
                            let backend = Arc::clone(&self.backend);
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                if let Some(response) = dispatch(backend.as_ref(), cmd).await {
                                    let _ = response_tx.send(response);
                                }
                            });
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

/// Execute one command against the backend and build its response.
/// Returns `None` only for `Shutdown`.
pub async fn dispatch(backend: &dyn Backend, cmd: NetworkCommand) -> Option<NetworkResponse> {
    let (ticket, operation) = cmd.describe()?;
    tracing::info!(id = ticket.id, generation = ticket.generation, op = operation.as_str(), "Executing");

    let result: Result<NetworkResponse, RemoteError> = match cmd {
        NetworkCommand::SignUp { credentials, .. } => backend
            .sign_up(&credentials)
            .await
            .map(|_| NetworkResponse::SignedUp { ticket }),
        NetworkCommand::SignIn { credentials, .. } => backend
            .sign_in(&credentials)
            .await
            .map(|_| NetworkResponse::SignedIn { ticket }),
        NetworkCommand::SignOut { .. } => backend
            .sign_out()
            .await
            .map(|_| NetworkResponse::SignedOut { ticket }),
        NetworkCommand::FetchShipments { .. } => backend
            .select_shipments()
            .await
            .map(|shipments| NetworkResponse::ShipmentsFetched { ticket, shipments }),
        NetworkCommand::AddShipment { draft, .. } => backend
            .insert_shipment(&draft)
            .await
            .map(|_| NetworkResponse::ShipmentAdded { ticket }),
        NetworkCommand::UpdateShipment { shipment, .. } => backend
            .update_shipment(&shipment)
            .await
            .map(|_| NetworkResponse::ShipmentUpdated { ticket, shipment }),
        NetworkCommand::Shutdown => return None,
    };

    Some(match result {
        Ok(response) => {
            tracing::info!(id = ticket.id, op = operation.as_str(), "Completed");
            response
        }
        Err(error) => {
            tracing::warn!(id = ticket.id, op = operation.as_str(), error = %error, "Failed");
            NetworkResponse::Failed {
                ticket,
                operation,
                error,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::network::Ticket;
    use crate::models::{Credentials, ShipmentDraft};
    use crate::network::memory::MemoryBackend;

    fn ticket(id: u64) -> Ticket {
        Ticket { id, generation: 1 }
    }

    #[tokio::test]
    async fn test_dispatch_maps_failure_to_flat_error() {
        let backend = MemoryBackend::new();
        let response = dispatch(
            &backend,
            NetworkCommand::SignIn {
                ticket: ticket(3),
                credentials: Credentials::new("nobody@x.com", "pw"),
            },
        )
        .await
        .unwrap();

        match response {
            NetworkResponse::Failed { ticket: t, operation, error } => {
                assert_eq!(t, ticket(3));
                assert_eq!(operation, Operation::SignIn);
                assert_eq!(error.message, "Invalid login credentials");
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_shutdown_yields_nothing() {
        let backend = MemoryBackend::new();
        assert!(dispatch(&backend, NetworkCommand::Shutdown).await.is_none());
    }

    #[tokio::test]
    async fn test_actor_round_trip() {
        let backend = Arc::new(MemoryBackend::new());
        backend.register("a@x.com", "secret123");
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(NetworkActor::new(backend.clone(), resp_tx).run(cmd_rx));

        cmd_tx
            .send(NetworkCommand::SignIn {
                ticket: ticket(1),
                credentials: Credentials::new("a@x.com", "secret123"),
            })
            .unwrap();
        assert!(matches!(resp_rx.recv().await, Some(NetworkResponse::SignedIn { .. })));

        cmd_tx
            .send(NetworkCommand::AddShipment {
                ticket: ticket(2),
                draft: ShipmentDraft::new("T1", "Bob", "I1", "C1"),
            })
            .unwrap();
        assert!(matches!(resp_rx.recv().await, Some(NetworkResponse::ShipmentAdded { .. })));

        cmd_tx.send(NetworkCommand::FetchShipments { ticket: ticket(3) }).unwrap();
        match resp_rx.recv().await {
            Some(NetworkResponse::ShipmentsFetched { shipments, .. }) => {
                assert_eq!(shipments.len(), 1);
                assert_eq!(shipments[0].fields.tracking_number, "T1");
            }
            other => panic!("unexpected response: {:?}", other),
        }

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }
}
