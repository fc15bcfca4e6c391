//! Form buffers - focused field plus a byte cursor kept on char boundaries

use crate::models::{Credentials, Shipment, ShipmentDraft, ShipmentField};

/// Shared editing behaviour for the credential and shipment forms
pub trait TextForm {
    fn focused(&self) -> &str;
    fn focused_mut(&mut self) -> &mut String;
    fn cursor(&self) -> usize;
    fn set_cursor(&mut self, pos: usize);
    fn focus_next(&mut self);
    fn focus_prev(&mut self);

    fn next_field(&mut self) {
        self.focus_next();
        let end = self.focused().len();
        self.set_cursor(end);
    }

    fn prev_field(&mut self) {
        self.focus_prev();
        let end = self.focused().len();
        self.set_cursor(end);
    }

    fn move_cursor_left(&mut self) {
        let pos = self.cursor();
        if pos > 0 {
            let new_pos = self.focused()[..pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.set_cursor(new_pos);
        }
    }

    fn move_cursor_right(&mut self) {
        let pos = self.cursor();
        let input = self.focused();
        if pos < input.len() {
            let new_pos = input[pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| pos + i)
                .unwrap_or(input.len());
            self.set_cursor(new_pos);
        }
    }

    fn enter_char(&mut self, c: char) {
        let pos = self.cursor();
        let input = self.focused_mut();
        if pos <= input.len() {
            input.insert(pos, c);
            self.set_cursor(pos + c.len_utf8());
        }
    }

    fn delete_char(&mut self) {
        let pos = self.cursor();
        if pos > 0 {
            let input = self.focused_mut();
            let prev = input[..pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev);
            self.set_cursor(prev);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CredentialField {
    #[default]
    Email,
    Password,
}

/// Email/password buffer behind the login and signup views
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
    pub focus: CredentialField,
    pub cursor: usize,
}

impl CredentialsForm {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }
}

impl TextForm for CredentialsForm {
    fn focused(&self) -> &str {
        match self.focus {
            CredentialField::Email => &self.email,
            CredentialField::Password => &self.password,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            CredentialField::Email => &mut self.email,
            CredentialField::Password => &mut self.password,
        }
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos;
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            CredentialField::Email => CredentialField::Password,
            CredentialField::Password => CredentialField::Email,
        };
    }

    fn focus_prev(&mut self) {
        self.focus_next();
    }
}

/// Four-field shipment buffer (new-shipment and edit forms)
#[derive(Clone, Debug, PartialEq)]
pub struct ShipmentForm {
    pub draft: ShipmentDraft,
    pub focus: ShipmentField,
    pub cursor: usize,
}

impl Default for ShipmentForm {
    fn default() -> Self {
        ShipmentForm::seeded(ShipmentDraft::default())
    }
}

impl ShipmentForm {
    pub fn seeded(draft: ShipmentDraft) -> Self {
        let cursor = draft.tracking_number.len();
        ShipmentForm {
            draft,
            focus: ShipmentField::TrackingNumber,
            cursor,
        }
    }
}

impl TextForm for ShipmentForm {
    fn focused(&self) -> &str {
        self.draft.get(self.focus)
    }

    fn focused_mut(&mut self) -> &mut String {
        self.draft.get_mut(self.focus)
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos;
    }

    fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }
}

/// Edit modal: the record's id plus a buffer seeded with its fields
#[derive(Clone, Debug, PartialEq)]
pub struct EditModal {
    pub original: Shipment,
    pub form: ShipmentForm,
}

impl EditModal {
    pub fn open(shipment: &Shipment) -> Self {
        EditModal {
            original: shipment.clone(),
            form: ShipmentForm::seeded(shipment.fields.clone()),
        }
    }

    /// The record to send: original id, edited fields
    pub fn edited(&self) -> Shipment {
        Shipment::new(self.original.id.clone(), self.form.draft.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShipmentId;

    #[test]
    fn test_typing_inserts_at_cursor() {
        let mut form = CredentialsForm::default();
        for c in "ab".chars() {
            form.enter_char(c);
        }
        form.move_cursor_left();
        form.enter_char('X');
        assert_eq!(form.email, "aXb");
        form.delete_char();
        assert_eq!(form.email, "ab");
    }

    #[test]
    fn test_cursor_respects_multibyte_chars() {
        let mut form = ShipmentForm::default();
        form.enter_char('é');
        form.enter_char('ß');
        assert_eq!(form.cursor, "éß".len());
        form.move_cursor_left();
        assert_eq!(form.cursor, "é".len());
        form.delete_char();
        assert_eq!(form.draft.tracking_number, "ß");
        form.move_cursor_right();
        assert_eq!(form.cursor, "ß".len());
    }

    #[test]
    fn test_field_switch_moves_cursor_to_end() {
        let mut form = CredentialsForm {
            email: "a@x.com".into(),
            password: "pw".into(),
            ..Default::default()
        };
        form.next_field();
        assert_eq!(form.focus, CredentialField::Password);
        assert_eq!(form.cursor, 2);
        form.enter_char('!');
        assert_eq!(form.password, "pw!");
    }

    #[test]
    fn test_edit_modal_keeps_id() {
        let shipment = Shipment::new(ShipmentId::Int(9), ShipmentDraft::new("T", "N", "I", "C"));
        let mut modal = EditModal::open(&shipment);
        modal.form.draft.customer_name = "Zed".into();
        let edited = modal.edited();
        assert_eq!(edited.id, ShipmentId::Int(9));
        assert_eq!(edited.fields.customer_name, "Zed");
        assert_eq!(modal.original, shipment);
    }
}
