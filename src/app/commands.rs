//! Command handlers - view transitions and remote-call bookkeeping

use crate::app::form::{CredentialField, CredentialsForm, EditModal, ShipmentForm, TextForm};
use crate::app::state::{AppState, ShipmentsView, View};
use crate::messages::network::Operation;
use crate::messages::{NetworkCommand, NetworkResponse};

impl AppState {
    // ========================
    // Transitions
    // ========================

    /// Switch views and start a new generation
    fn transition(&mut self, view: View) {
        tracing::info!(from = self.view.name(), to = view.name(), "View change");
        self.view = view;
        self.generation += 1;
    }

    /// Every entry into the shipments view carries a list fetch
    fn enter_shipments(&mut self) -> Option<NetworkCommand> {
        self.transition(View::Shipments(ShipmentsView::default()));
        Some(self.fetch_command())
    }

    fn fetch_command(&mut self) -> NetworkCommand {
        NetworkCommand::FetchShipments {
            ticket: self.next_ticket(),
        }
    }

    pub fn go_login(&mut self) {
        if matches!(self.view, View::Home) {
            self.transition(View::Login(CredentialsForm::default()));
        }
    }

    pub fn go_signup(&mut self) {
        if matches!(self.view, View::Home) {
            self.transition(View::Signup(CredentialsForm::default()));
        }
    }

    pub fn go_home(&mut self) {
        if matches!(self.view, View::Login(_) | View::Signup(_)) {
            self.transition(View::Home);
        }
    }

    pub fn open_add_shipment(&mut self) {
        if matches!(self.view, View::Shipments(_)) {
            self.transition(View::AddShipment(ShipmentForm::default()));
        }
    }

    pub fn back_to_shipments(&mut self) -> Option<NetworkCommand> {
        if matches!(self.view, View::AddShipment(_)) {
            self.enter_shipments()
        } else {
            None
        }
    }

    pub fn refresh(&mut self) -> Option<NetworkCommand> {
        match self.view {
            View::Shipments(_) => Some(self.fetch_command()),
            _ => None,
        }
    }

    /// Lands on home from the shipments view, whatever the error state or
    /// open modal; the remote sign-out result is only logged. The cached
    /// shipment list is kept.
    pub fn logout(&mut self) -> Option<NetworkCommand> {
        if !matches!(self.view, View::Shipments(_)) {
            return None;
        }
        self.transition(View::Home);
        Some(NetworkCommand::SignOut {
            ticket: self.next_ticket(),
        })
    }

    /// Views reachable only with a session
    fn is_signed_in_view(&self) -> bool {
        matches!(self.view, View::Shipments(_) | View::AddShipment(_))
    }

    // ========================
    // Shipments table
    // ========================

    pub fn select_next(&mut self) {
        let len = self.shipments.len();
        if let View::Shipments(sv) = &mut self.view {
            if sv.modal.is_none() && len > 0 {
                sv.highlighted = (sv.highlighted + 1) % len;
            }
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.shipments.len();
        if let View::Shipments(sv) = &mut self.view {
            if sv.modal.is_none() && len > 0 {
                sv.highlighted = sv.highlighted.checked_sub(1).unwrap_or(len - 1);
            }
        }
    }

    /// Row click: show the highlighted shipment in the detail panel
    pub fn show_details(&mut self) {
        if let View::Shipments(sv) = &mut self.view {
            if sv.modal.is_none() {
                if let Some(shipment) = self.shipments.get(sv.highlighted) {
                    sv.selected = Some(shipment.id.clone());
                }
            }
        }
    }

    /// Edit icon on the highlighted row
    pub fn edit_highlighted(&mut self) {
        if let View::Shipments(sv) = &mut self.view {
            if let Some(shipment) = self.shipments.get(sv.highlighted) {
                sv.modal = Some(EditModal::open(shipment));
            }
        }
    }

    /// Edit button on the detail panel
    pub fn edit_selected(&mut self) {
        let Some(shipment) = self.selected_shipment().cloned() else {
            return;
        };
        if let View::Shipments(sv) = &mut self.view {
            sv.modal = Some(EditModal::open(&shipment));
        }
    }

    pub fn close_modal(&mut self) {
        if let View::Shipments(sv) = &mut self.view {
            sv.modal = None;
        }
    }

    // ========================
    // Form editing
    // ========================

    fn active_form(&mut self) -> Option<&mut dyn TextForm> {
        match &mut self.view {
            View::Login(form) | View::Signup(form) => Some(form as &mut dyn TextForm),
            View::AddShipment(form) => Some(form as &mut dyn TextForm),
            View::Shipments(ShipmentsView {
                modal: Some(modal), ..
            }) => Some(&mut modal.form as &mut dyn TextForm),
            _ => None,
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(form) = self.active_form() {
            form.enter_char(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(form) = self.active_form() {
            form.delete_char();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(form) = self.active_form() {
            form.move_cursor_left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(form) = self.active_form() {
            form.move_cursor_right();
        }
    }

    pub fn next_field(&mut self) {
        if let Some(form) = self.active_form() {
            form.next_field();
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(form) = self.active_form() {
            form.prev_field();
        }
    }

    /// Submit whichever form is active. Nothing is validated locally and
    /// repeated submits are not suppressed.
    pub fn submit(&mut self) -> Option<NetworkCommand> {
        match &self.view {
            View::Login(form) => {
                let credentials = form.credentials();
                Some(NetworkCommand::SignIn {
                    ticket: self.next_ticket(),
                    credentials,
                })
            }
            View::Signup(form) => {
                let credentials = form.credentials();
                Some(NetworkCommand::SignUp {
                    ticket: self.next_ticket(),
                    credentials,
                })
            }
            View::AddShipment(form) => {
                let draft = form.draft.clone();
                Some(NetworkCommand::AddShipment {
                    ticket: self.next_ticket(),
                    draft,
                })
            }
            View::Shipments(ShipmentsView {
                modal: Some(modal), ..
            }) => {
                let shipment = modal.edited();
                Some(NetworkCommand::UpdateShipment {
                    ticket: self.next_ticket(),
                    shipment,
                })
            }
            _ => None,
        }
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response handling
    // ========================

    /// Apply a remote result. May return a follow-up command.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        self.in_flight = self.in_flight.saturating_sub(1);

        let ticket = response.ticket();
        if ticket.generation != self.generation {
            tracing::debug!(
                id = ticket.id,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale response"
            );
            // The backend already holds the session of an abandoned sign-in
            if matches!(response, NetworkResponse::SignedIn { .. }) && !self.is_signed_in_view() {
                tracing::info!("Dropping session from abandoned sign-in");
                return Some(NetworkCommand::SignOut {
                    ticket: self.next_ticket(),
                });
            }
            return None;
        }

        match response {
            NetworkResponse::SignedUp { .. } => {
                if let View::Signup(form) = &self.view {
                    let email_len = form.email.len();
                    let login = CredentialsForm {
                        focus: CredentialField::Email,
                        cursor: email_len,
                        ..form.clone()
                    };
                    self.error.clear();
                    self.transition(View::Login(login));
                }
                None
            }
            NetworkResponse::SignedIn { .. } => {
                if matches!(self.view, View::Login(_)) {
                    self.error.clear();
                    return self.enter_shipments();
                }
                None
            }
            NetworkResponse::SignedOut { .. } => None,
            NetworkResponse::ShipmentsFetched { shipments, .. } => {
                tracing::info!(count = shipments.len(), "Shipments fetched");
                self.shipments = shipments;
                self.last_fetched = Some(chrono::Utc::now());
                let len = self.shipments.len();
                if let View::Shipments(sv) = &mut self.view {
                    sv.highlighted = sv.highlighted.min(len.saturating_sub(1));
                }
                None
            }
            NetworkResponse::ShipmentAdded { .. } => {
                if matches!(self.view, View::AddShipment(_)) {
                    // Leaving the view drops the buffer; the next entry starts empty
                    return self.enter_shipments();
                }
                None
            }
            NetworkResponse::ShipmentUpdated { shipment, .. } => {
                if let View::Shipments(sv) = &mut self.view {
                    if sv.modal.as_ref().map(|m| &m.original.id) == Some(&shipment.id) {
                        sv.modal = None;
                    }
                }
                Some(self.fetch_command())
            }
            NetworkResponse::Failed {
                operation, error, ..
            } => {
                if operation == Operation::SignOut {
                    tracing::warn!(error = %error, "Sign-out failed; session dropped locally");
                } else {
                    self.error = error.message;
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::network::Ticket;
    use crate::models::{Shipment, ShipmentDraft, ShipmentId};
    use crate::network::backend::RemoteError;

    fn ticket_of(cmd: &NetworkCommand) -> Ticket {
        cmd.describe().unwrap().0
    }

    fn failed(cmd: &NetworkCommand, message: &str) -> NetworkResponse {
        let (ticket, operation) = cmd.describe().unwrap();
        NetworkResponse::Failed {
            ticket,
            operation,
            error: RemoteError::new(message),
        }
    }

    fn type_str(state: &mut AppState, text: &str) {
        for c in text.chars() {
            state.enter_char(c);
        }
    }

    fn row(id: i64, tracking: &str) -> Shipment {
        Shipment::new(
            ShipmentId::Int(id),
            ShipmentDraft::new(tracking, format!("Customer {}", id), format!("I{}", id), format!("C{}", id)),
        )
    }

    /// Logged in with `rows` already fetched
    fn shipments_state(rows: Vec<Shipment>) -> AppState {
        let mut state = AppState::new();
        state.go_login();
        let cmd = state.submit().unwrap();
        let fetch = state
            .handle_response(NetworkResponse::SignedIn { ticket: ticket_of(&cmd) })
            .unwrap();
        state.handle_response(NetworkResponse::ShipmentsFetched {
            ticket: ticket_of(&fetch),
            shipments: rows,
        });
        state
    }

    #[test]
    fn test_starts_at_home() {
        let state = AppState::new();
        assert_eq!(state.view, View::Home);
        assert!(state.error.is_empty());
    }

    #[test]
    fn test_sign_in_success_enters_shipments_with_one_fetch() {
        let mut state = AppState::new();
        state.go_login();
        type_str(&mut state, "a@x.com");
        state.next_field();
        type_str(&mut state, "secret123");

        let cmd = state.submit().unwrap();
        match &cmd {
            NetworkCommand::SignIn { credentials, .. } => {
                assert_eq!(credentials.email, "a@x.com");
                assert_eq!(credentials.password, "secret123");
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let follow_up = state.handle_response(NetworkResponse::SignedIn { ticket: ticket_of(&cmd) });
        assert!(matches!(state.view, View::Shipments(_)));
        assert!(matches!(follow_up, Some(NetworkCommand::FetchShipments { .. })));
        assert!(state.error.is_empty());
    }

    #[test]
    fn test_sign_in_failure_stays_on_login() {
        let mut state = AppState::new();
        state.go_login();
        type_str(&mut state, "a@x.com");
        let cmd = state.submit().unwrap();

        let follow_up = state.handle_response(failed(&cmd, "Invalid login credentials"));
        assert!(follow_up.is_none());
        assert!(matches!(&state.view, View::Login(form) if form.email == "a@x.com"));
        assert_eq!(state.error, "Invalid login credentials");
    }

    #[test]
    fn test_sign_up_success_moves_to_login_and_clears_error() {
        let mut state = AppState::new();
        state.go_signup();
        type_str(&mut state, "a@x.com");
        let first = state.submit().unwrap();
        state.handle_response(failed(&first, "Password should be at least 6 characters"));
        assert_eq!(state.error, "Password should be at least 6 characters");
        assert!(matches!(state.view, View::Signup(_)));

        let second = state.submit().unwrap();
        state.handle_response(NetworkResponse::SignedUp { ticket: ticket_of(&second) });
        assert!(state.error.is_empty());
        match &state.view {
            View::Login(form) => assert_eq!(form.email, "a@x.com"),
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_error_is_ambient_across_views() {
        let mut state = AppState::new();
        state.go_login();
        let cmd = state.submit().unwrap();
        state.handle_response(failed(&cmd, "Invalid login credentials"));

        state.go_home();
        state.go_signup();
        assert_eq!(state.error, "Invalid login credentials");
    }

    #[test]
    fn test_fetch_failure_keeps_previous_list() {
        let mut state = shipments_state(vec![row(1, "T1"), row(2, "T2")]);
        let cmd = state.refresh().unwrap();
        state.handle_response(failed(&cmd, "JWT expired"));

        assert_eq!(state.shipments.len(), 2);
        assert_eq!(state.error, "JWT expired");
    }

    #[test]
    fn test_fetch_success_does_not_clear_error() {
        let mut state = shipments_state(vec![row(1, "T1")]);
        let cmd = state.refresh().unwrap();
        state.handle_response(failed(&cmd, "boom"));
        let cmd = state.refresh().unwrap();
        state.handle_response(NetworkResponse::ShipmentsFetched {
            ticket: ticket_of(&cmd),
            shipments: vec![],
        });
        assert_eq!(state.error, "boom");
        assert!(state.shipments.is_empty());
    }

    #[test]
    fn test_add_success_returns_to_shipments_with_fresh_buffer() {
        let mut state = shipments_state(vec![]);
        state.open_add_shipment();
        type_str(&mut state, "T1");
        let cmd = state.submit().unwrap();
        match &cmd {
            NetworkCommand::AddShipment { draft, .. } => assert_eq!(draft.tracking_number, "T1"),
            other => panic!("unexpected command: {:?}", other),
        }

        let follow_up = state.handle_response(NetworkResponse::ShipmentAdded { ticket: ticket_of(&cmd) });
        assert!(matches!(state.view, View::Shipments(_)));
        assert!(matches!(follow_up, Some(NetworkCommand::FetchShipments { .. })));

        state.open_add_shipment();
        match &state.view {
            View::AddShipment(form) => assert!(form.draft.is_empty()),
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_add_failure_keeps_buffer() {
        let mut state = shipments_state(vec![]);
        state.open_add_shipment();
        type_str(&mut state, "T1");
        let cmd = state.submit().unwrap();
        state.handle_response(failed(&cmd, "duplicate key value violates unique constraint"));

        match &state.view {
            View::AddShipment(form) => assert_eq!(form.draft.tracking_number, "T1"),
            other => panic!("unexpected view: {:?}", other),
        }
        assert_eq!(state.error, "duplicate key value violates unique constraint");
    }

    #[test]
    fn test_row_click_then_edit_from_detail_panel() {
        let mut state = shipments_state(vec![row(1, "T1"), row(2, "T2")]);
        state.select_next();
        state.show_details();
        assert_eq!(state.selected_shipment().map(|s| s.id.clone()), Some(ShipmentId::Int(2)));

        state.edit_selected();
        match &state.view {
            View::Shipments(ShipmentsView { modal: Some(modal), .. }) => {
                assert_eq!(modal.form.draft.tracking_number, "T2");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_edit_success_closes_modal_and_refetches() {
        let mut state = shipments_state(vec![row(1, "T1"), row(2, "T2")]);
        state.edit_highlighted();
        type_str(&mut state, "-X");
        let cmd = state.submit().unwrap();
        match &cmd {
            NetworkCommand::UpdateShipment { shipment, .. } => {
                assert_eq!(shipment.id, ShipmentId::Int(1));
                assert_eq!(shipment.fields.tracking_number, "T1-X");
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let shipment = match &cmd {
            NetworkCommand::UpdateShipment { shipment, .. } => shipment.clone(),
            _ => unreachable!(),
        };
        let follow_up = state.handle_response(NetworkResponse::ShipmentUpdated {
            ticket: ticket_of(&cmd),
            shipment,
        });
        assert!(matches!(follow_up, Some(NetworkCommand::FetchShipments { .. })));
        assert!(matches!(&state.view, View::Shipments(sv) if sv.modal.is_none()));
    }

    #[test]
    fn test_edit_failure_keeps_modal_open() {
        let mut state = shipments_state(vec![row(1, "T1")]);
        state.edit_highlighted();
        type_str(&mut state, "Z");
        let cmd = state.submit().unwrap();
        state.handle_response(failed(&cmd, "permission denied"));

        match &state.view {
            View::Shipments(ShipmentsView { modal: Some(modal), .. }) => {
                assert_eq!(modal.form.draft.tracking_number, "T1Z");
            }
            other => panic!("unexpected view: {:?}", other),
        }
        assert_eq!(state.error, "permission denied");
    }

    #[test]
    fn test_logout_is_unconditional_and_keeps_list() {
        let mut state = shipments_state(vec![row(1, "T1")]);
        let cmd = state.refresh().unwrap();
        state.handle_response(failed(&cmd, "boom"));

        let sign_out = state.logout().unwrap();
        assert!(matches!(sign_out, NetworkCommand::SignOut { .. }));
        assert_eq!(state.view, View::Home);
        assert_eq!(state.shipments.len(), 1);

        state.handle_response(failed(&sign_out, "network down"));
        assert_eq!(state.view, View::Home);
        assert_eq!(state.error, "boom");
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = AppState::new();
        state.go_login();
        let cmd = state.submit().unwrap();
        state.go_home();
        assert_eq!(state.in_flight, 1);

        let follow_up = state.handle_response(failed(&cmd, "Invalid login credentials"));
        assert!(follow_up.is_none());
        assert_eq!(state.view, View::Home);
        assert!(state.error.is_empty());
        assert_eq!(state.in_flight, 0);
    }

    #[test]
    fn test_abandoned_sign_in_drops_session() {
        let mut state = AppState::new();
        state.go_login();
        let cmd = state.submit().unwrap();
        state.go_home();

        let follow_up = state.handle_response(NetworkResponse::SignedIn { ticket: ticket_of(&cmd) });
        assert!(matches!(follow_up, Some(NetworkCommand::SignOut { .. })));
        assert_eq!(state.view, View::Home);
        assert_eq!(state.in_flight, 1);

        let sign_out = follow_up.unwrap();
        state.handle_response(NetworkResponse::SignedOut { ticket: ticket_of(&sign_out) });
        assert_eq!(state.view, View::Home);
        assert_eq!(state.in_flight, 0);
    }

    #[test]
    fn test_late_sign_in_keeps_newer_session() {
        let mut state = AppState::new();
        state.go_login();
        let first = state.submit().unwrap();
        state.go_home();
        state.go_login();
        let second = state.submit().unwrap();
        state.handle_response(NetworkResponse::SignedIn { ticket: ticket_of(&second) });
        assert!(matches!(state.view, View::Shipments(_)));

        let follow_up = state.handle_response(NetworkResponse::SignedIn { ticket: ticket_of(&first) });
        assert!(follow_up.is_none());
    }

    #[test]
    fn test_logout_needs_a_signed_in_view() {
        let mut state = AppState::new();
        assert!(state.logout().is_none());
        assert_eq!(state.view, View::Home);

        state.go_login();
        assert!(state.logout().is_none());
        assert!(matches!(state.view, View::Login(_)));

        let mut state = shipments_state(vec![row(1, "T1")]);
        state.edit_highlighted();
        assert!(state.logout().is_some());
        assert_eq!(state.view, View::Home);
    }

    #[test]
    fn test_detail_panel_follows_refetch() {
        let mut state = shipments_state(vec![row(1, "T1"), row(2, "T2")]);
        state.select_next();
        state.show_details();

        let cmd = state.refresh().unwrap();
        state.handle_response(NetworkResponse::ShipmentsFetched {
            ticket: ticket_of(&cmd),
            shipments: vec![row(1, "T1"), row(2, "AX")],
        });
        let selected = state.selected_shipment().map(|s| s.fields.tracking_number.clone());
        assert_eq!(selected.as_deref(), Some("AX"));
    }

    #[test]
    fn test_update_for_other_record_leaves_modal_open() {
        let mut state = shipments_state(vec![row(1, "T1"), row(2, "T2")]);
        state.edit_highlighted();
        type_str(&mut state, "-X");
        let cmd = state.submit().unwrap();
        state.close_modal();
        state.select_next();
        state.edit_highlighted();

        let follow_up = state.handle_response(NetworkResponse::ShipmentUpdated {
            ticket: ticket_of(&cmd),
            shipment: Shipment::new(ShipmentId::Int(1), ShipmentDraft::new("T1-X", "Customer 1", "I1", "C1")),
        });
        assert!(matches!(follow_up, Some(NetworkCommand::FetchShipments { .. })));
        match &state.view {
            View::Shipments(ShipmentsView { modal: Some(modal), .. }) => {
                assert_eq!(modal.original.id, ShipmentId::Int(2));
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_stale_fetch_after_leaving_view_is_ignored() {
        let mut state = shipments_state(vec![row(1, "T1")]);
        let cmd = state.refresh().unwrap();
        state.open_add_shipment();
        state.handle_response(NetworkResponse::ShipmentsFetched {
            ticket: ticket_of(&cmd),
            shipments: vec![],
        });
        assert_eq!(state.shipments.len(), 1);
    }

    #[test]
    fn test_fetch_clamps_highlight() {
        let mut state = shipments_state(vec![row(1, "T1"), row(2, "T2"), row(3, "T3")]);
        state.select_prev();
        let cmd = state.refresh().unwrap();
        state.handle_response(NetworkResponse::ShipmentsFetched {
            ticket: ticket_of(&cmd),
            shipments: vec![row(1, "T1")],
        });
        assert!(matches!(&state.view, View::Shipments(sv) if sv.highlighted == 0));
    }

    #[test]
    fn test_resubmit_is_not_suppressed() {
        let mut state = AppState::new();
        state.go_login();
        let first = state.submit().unwrap();
        let second = state.submit().unwrap();
        assert_ne!(ticket_of(&first).id, ticket_of(&second).id);
        assert_eq!(state.in_flight, 2);
    }
}
