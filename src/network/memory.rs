//! In-memory backend used by controller and actor tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{Credentials, Shipment, ShipmentDraft, ShipmentId};
use crate::network::backend::{Backend, RemoteError};

#[derive(Default)]
struct Inner {
    users: HashMap<String, String>,
    signed_in: Option<String>,
    rows: Vec<Shipment>,
    next_id: i64,
    fail_next: Option<String>,
    calls: Vec<&'static str>,
}

/// Fake auth service + row store. Row calls require a signed-in user, the
/// way a row-level security policy would.
#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, email: &str, password: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.users.insert(email.to_string(), password.to_string());
    }

    /// Make the next call fail with `message`
    pub fn fail_next(&self, message: &str) {
        self.inner.lock().unwrap().fail_next = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().calls.clone()
    }

    fn enter(&self, call: &'static str) -> Result<std::sync::MutexGuard<'_, Inner>, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        match inner.fail_next.take() {
            Some(message) => Err(RemoteError::new(message)),
            None => Ok(inner),
        }
    }
}

fn require_session(inner: &Inner) -> Result<(), RemoteError> {
    if inner.signed_in.is_some() {
        Ok(())
    } else {
        Err(RemoteError::new("permission denied for table shipments"))
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn sign_up(&self, credentials: &Credentials) -> Result<(), RemoteError> {
        let mut inner = self.enter("sign_up")?;
        if inner.users.contains_key(&credentials.email) {
            return Err(RemoteError::new("User already registered"));
        }
        inner
            .users
            .insert(credentials.email.clone(), credentials.password.clone());
        Ok(())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<(), RemoteError> {
        let mut inner = self.enter("sign_in")?;
        let known = inner
            .users
            .get(&credentials.email)
            .is_some_and(|pw| *pw == credentials.password);
        if !known {
            return Err(RemoteError::new("Invalid login credentials"));
        }
        inner.signed_in = Some(credentials.email.clone());
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        let mut inner = self.enter("sign_out")?;
        inner.signed_in = None;
        Ok(())
    }

    async fn select_shipments(&self) -> Result<Vec<Shipment>, RemoteError> {
        let inner = self.enter("select")?;
        require_session(&inner)?;
        Ok(inner.rows.clone())
    }

    async fn insert_shipment(&self, draft: &ShipmentDraft) -> Result<(), RemoteError> {
        let mut inner = self.enter("insert")?;
        require_session(&inner)?;
        inner.next_id += 1;
        let id = ShipmentId::Int(inner.next_id);
        inner.rows.push(Shipment::new(id, draft.clone()));
        Ok(())
    }

    async fn update_shipment(&self, shipment: &Shipment) -> Result<(), RemoteError> {
        let mut inner = self.enter("update")?;
        require_session(&inner)?;
        if let Some(row) = inner.rows.iter_mut().find(|r| r.id == shipment.id) {
            row.fields = shipment.fields.clone();
        }
        Ok(())
    }
}
