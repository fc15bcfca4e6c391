//! Network messages - communication between App and Network layers

use crate::models::{Credentials, Shipment, ShipmentDraft};
use crate::network::backend::RemoteError;

/// Identifies one remote call and the view generation it was issued in.
/// A response whose generation no longer matches the controller's is stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub generation: u64,
}

/// Which remote operation a command or failure refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    SignUp,
    SignIn,
    SignOut,
    FetchShipments,
    AddShipment,
    UpdateShipment,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SignUp => "sign up",
            Operation::SignIn => "sign in",
            Operation::SignOut => "sign out",
            Operation::FetchShipments => "fetch shipments",
            Operation::AddShipment => "add shipment",
            Operation::UpdateShipment => "update shipment",
        }
    }
}

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    SignUp {
        ticket: Ticket,
        credentials: Credentials,
    },
    SignIn {
        ticket: Ticket,
        credentials: Credentials,
    },
    SignOut {
        ticket: Ticket,
    },
    FetchShipments {
        ticket: Ticket,
    },
    AddShipment {
        ticket: Ticket,
        draft: ShipmentDraft,
    },
    UpdateShipment {
        ticket: Ticket,
        shipment: Shipment,
    },

    /// Shutdown the network actor
    Shutdown,
}

impl NetworkCommand {
    /// Ticket and operation, `None` for `Shutdown`
    pub fn describe(&self) -> Option<(Ticket, Operation)> {
        match self {
            NetworkCommand::SignUp { ticket, .. } => Some((*ticket, Operation::SignUp)),
            NetworkCommand::SignIn { ticket, .. } => Some((*ticket, Operation::SignIn)),
            NetworkCommand::SignOut { ticket } => Some((*ticket, Operation::SignOut)),
            NetworkCommand::FetchShipments { ticket } => {
                Some((*ticket, Operation::FetchShipments))
            }
            NetworkCommand::AddShipment { ticket, .. } => Some((*ticket, Operation::AddShipment)),
            NetworkCommand::UpdateShipment { ticket, .. } => {
                Some((*ticket, Operation::UpdateShipment))
            }
            NetworkCommand::Shutdown => None,
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    SignedUp {
        ticket: Ticket,
    },
    SignedIn {
        ticket: Ticket,
    },
    SignedOut {
        ticket: Ticket,
    },
    ShipmentsFetched {
        ticket: Ticket,
        shipments: Vec<Shipment>,
    },
    ShipmentAdded {
        ticket: Ticket,
    },
    ShipmentUpdated {
        ticket: Ticket,
        shipment: Shipment,
    },
    /// Any remote failure, with the provider's message
    Failed {
        ticket: Ticket,
        operation: Operation,
        error: RemoteError,
    },
}

impl NetworkResponse {
    /// Get the ticket from the response
    pub fn ticket(&self) -> Ticket {
        match self {
            NetworkResponse::SignedUp { ticket } => *ticket,
            NetworkResponse::SignedIn { ticket } => *ticket,
            NetworkResponse::SignedOut { ticket } => *ticket,
            NetworkResponse::ShipmentsFetched { ticket, .. } => *ticket,
            NetworkResponse::ShipmentAdded { ticket } => *ticket,
            NetworkResponse::ShipmentUpdated { ticket, .. } => *ticket,
            NetworkResponse::Failed { ticket, .. } => *ticket,
        }
    }
}
