//! App state - pure data structure with no I/O logic

use chrono::{DateTime, Utc};

use crate::app::form::{CredentialsForm, EditModal, ShipmentForm};
use crate::messages::network::Ticket;
use crate::messages::RenderState;
use crate::models::{Shipment, ShipmentId};

/// Shipments screen: table cursor, detail selection and the edit modal
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShipmentsView {
    /// Highlighted table row
    pub highlighted: usize,
    /// Record shown in the detail panel, looked up by id in the current list
    pub selected: Option<ShipmentId>,
    pub modal: Option<EditModal>,
}

/// The active screen. Each variant owns only the data it needs.
#[derive(Clone, Debug, PartialEq)]
pub enum View {
    Home,
    Login(CredentialsForm),
    Signup(CredentialsForm),
    Shipments(ShipmentsView),
    AddShipment(ShipmentForm),
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Login(_) => "login",
            View::Signup(_) => "signup",
            View::Shipments(_) => "shipments",
            View::AddShipment(_) => "addShipment",
        }
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub view: View,

    /// Last fetched list; replaced wholesale on every successful fetch
    pub shipments: Vec<Shipment>,
    pub last_fetched: Option<DateTime<Utc>>,

    /// Component-wide error, shown near the active form
    pub error: String,

    /// Bumped on every view transition; responses from older generations
    /// are dropped
    pub generation: u64,
    pub next_request_id: u64,
    pub in_flight: usize,

    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            view: View::Home,
            shipments: Vec::new(),
            last_fetched: None,
            error: String::new(),
            generation: 0,
            next_request_id: 1,
            in_flight: 0,
            show_help: false,
        }
    }

    /// Issue a ticket for a new remote call in the current generation
    pub fn next_ticket(&mut self) -> Ticket {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight += 1;
        Ticket {
            id,
            generation: self.generation,
        }
    }

    /// Shipment currently shown in the detail panel
    pub fn selected_shipment(&self) -> Option<&Shipment> {
        match &self.view {
            View::Shipments(sv) => sv
                .selected
                .as_ref()
                .and_then(|id| self.shipments.iter().find(|s| &s.id == id)),
            _ => None,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            view: self.view.clone(),
            shipments: self.shipments.clone(),
            selected: self.selected_shipment().cloned(),
            last_fetched: self.last_fetched,
            error: self.error.clone(),
            is_loading: self.in_flight > 0,
            show_help: self.show_help,
        }
    }
}
