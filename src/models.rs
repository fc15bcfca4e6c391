use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier assigned by the row store.
///
/// The store may use integer or text keys; the client never interprets the
/// value, it only echoes it back in the update filter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShipmentId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipmentId::Int(n) => write!(f, "{}", n),
            ShipmentId::Text(s) => f.write_str(s),
        }
    }
}

/// The four editable shipment fields
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipmentField {
    TrackingNumber,
    CustomerName,
    InvoiceNumber,
    CustomerNumber,
}

impl ShipmentField {
    pub const ALL: [ShipmentField; 4] = [
        ShipmentField::TrackingNumber,
        ShipmentField::CustomerName,
        ShipmentField::InvoiceNumber,
        ShipmentField::CustomerNumber,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShipmentField::TrackingNumber => "Tracking Number",
            ShipmentField::CustomerName => "Customer Name",
            ShipmentField::InvoiceNumber => "Invoice Number",
            ShipmentField::CustomerNumber => "Customer Number",
        }
    }

    pub fn next(&self) -> ShipmentField {
        match self {
            ShipmentField::TrackingNumber => ShipmentField::CustomerName,
            ShipmentField::CustomerName => ShipmentField::InvoiceNumber,
            ShipmentField::InvoiceNumber => ShipmentField::CustomerNumber,
            ShipmentField::CustomerNumber => ShipmentField::TrackingNumber,
        }
    }

    pub fn prev(&self) -> ShipmentField {
        match self {
            ShipmentField::TrackingNumber => ShipmentField::CustomerNumber,
            ShipmentField::CustomerName => ShipmentField::TrackingNumber,
            ShipmentField::InvoiceNumber => ShipmentField::CustomerName,
            ShipmentField::CustomerNumber => ShipmentField::InvoiceNumber,
        }
    }
}

/// A shipment that has not been persisted yet (no id)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentDraft {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tracking_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub invoice_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub customer_number: String,
}

/// Nullable text columns read as empty strings
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ShipmentDraft {
    pub fn new(
        tracking_number: impl Into<String>,
        customer_name: impl Into<String>,
        invoice_number: impl Into<String>,
        customer_number: impl Into<String>,
    ) -> Self {
        ShipmentDraft {
            tracking_number: tracking_number.into(),
            customer_name: customer_name.into(),
            invoice_number: invoice_number.into(),
            customer_number: customer_number.into(),
        }
    }

    pub fn get(&self, field: ShipmentField) -> &str {
        match field {
            ShipmentField::TrackingNumber => &self.tracking_number,
            ShipmentField::CustomerName => &self.customer_name,
            ShipmentField::InvoiceNumber => &self.invoice_number,
            ShipmentField::CustomerNumber => &self.customer_number,
        }
    }

    pub fn get_mut(&mut self, field: ShipmentField) -> &mut String {
        match field {
            ShipmentField::TrackingNumber => &mut self.tracking_number,
            ShipmentField::CustomerName => &mut self.customer_name,
            ShipmentField::InvoiceNumber => &mut self.invoice_number,
            ShipmentField::CustomerNumber => &mut self.customer_number,
        }
    }

    pub fn is_empty(&self) -> bool {
        ShipmentField::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// A persisted shipment row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    #[serde(flatten)]
    pub fields: ShipmentDraft,
}

impl Shipment {
    pub fn new(id: ShipmentId, fields: ShipmentDraft) -> Self {
        Shipment { id, fields }
    }
}

/// Email/password pair sent to the auth service
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs and panic messages
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipment_id_accepts_int_and_text() {
        let row: Shipment = serde_json::from_str(
            r#"{"id": 7, "tracking_number": "T1", "customer_name": "Bob", "invoice_number": "I1", "customer_number": "C1", "created_at": "2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(row.id, ShipmentId::Int(7));
        assert_eq!(row.fields.customer_name, "Bob");

        let row: Shipment = serde_json::from_str(
            r#"{"id": "5f1c", "tracking_number": "", "customer_name": "", "invoice_number": "", "customer_number": ""}"#,
        )
        .unwrap();
        assert_eq!(row.id.to_string(), "5f1c");
    }

    #[test]
    fn test_null_columns_read_as_empty() {
        let rows: Vec<Shipment> = serde_json::from_str(
            r#"[
                {"id": 1, "tracking_number": "T1", "customer_name": "Bob", "invoice_number": "I1", "customer_number": "C1"},
                {"id": 2, "tracking_number": "T2", "customer_name": null, "invoice_number": null}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].fields, ShipmentDraft::new("T2", "", "", ""));
    }

    #[test]
    fn test_draft_serializes_without_id() {
        let draft = ShipmentDraft::new("T1", "Bob", "I1", "C1");
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["tracking_number"], "T1");
    }

    #[test]
    fn test_field_cycle_round_trips() {
        for field in ShipmentField::ALL {
            assert_eq!(field.next().prev(), field);
        }
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("a@x.com", "secret123");
        let shown = format!("{:?}", creds);
        assert!(shown.contains("a@x.com"));
        assert!(!shown.contains("secret123"));
    }
}
