//! Render state - data structure sent from App layer to UI for rendering

use chrono::{DateTime, Utc};

use crate::app::state::View;
use crate::messages::ui_events::Screen;
use crate::models::Shipment;

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub view: View,
    pub shipments: Vec<Shipment>,
    /// Detail-panel record, already resolved against `shipments`
    pub selected: Option<Shipment>,
    pub last_fetched: Option<DateTime<Utc>>,
    pub error: String,
    pub is_loading: bool,
    pub show_help: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            view: View::Home,
            shipments: Vec::new(),
            selected: None,
            last_fetched: None,
            error: String::new(),
            is_loading: false,
            show_help: false,
        }
    }
}

impl RenderState {
    /// Key map to use for the current view
    pub fn screen(&self) -> Screen {
        match &self.view {
            View::Home => Screen::Home,
            View::Login(_) => Screen::Login,
            View::Signup(_) => Screen::Signup,
            View::Shipments(sv) if sv.modal.is_some() => Screen::EditModal,
            View::Shipments(_) => Screen::Shipments,
            View::AddShipment(_) => Screen::AddShipment,
        }
    }
}
