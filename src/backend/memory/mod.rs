//! In-process backend: the `orders` table lives in a [`ResourceActor`], and
//! accounts and the current session live behind a mutex.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{Backend, BackendError};
use crate::actor_framework::{ResourceActor, ResourceClient};
use crate::domain::{Credentials, Order, OrderInsert, OrderPatch, Session, SessionUser};

mod entity;

const SESSION_HOURS: i64 = 1;

#[derive(Default)]
struct AuthState {
    accounts: HashMap<String, String>,
    session: Option<Session>,
}

#[derive(Clone)]
pub struct MemoryBackend {
    table: ResourceClient<Order>,
    auth: Arc<Mutex<AuthState>>,
}

impl MemoryBackend {
    /// Wrap an existing table client. Tests pass a mock client here.
    pub fn new(table: ResourceClient<Order>) -> Self {
        Self {
            table,
            auth: Arc::new(Mutex::new(AuthState::default())),
        }
    }

    /// Spawn the table actor and return a backend wired to it.
    pub fn start(buffer_size: usize) -> (Self, JoinHandle<()>) {
        let (actor, table) =
            ResourceActor::<Order>::new(buffer_size, || Uuid::new_v4().to_string());
        let handle = tokio::spawn(actor.run());
        (Self::new(table), handle)
    }

    /// Register an admin account that [`Backend::sign_in`] will accept.
    pub fn with_account(self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.lock_auth().accounts.insert(email.into(), password.into());
        self
    }

    /// Start with an already signed-in session, as if restored from storage.
    pub fn with_session(self, session: Session) -> Self {
        self.lock_auth().session = Some(session);
        self
    }

    fn lock_auth(&self) -> std::sync::MutexGuard<'_, AuthState> {
        // A poisoned lock only means another task panicked mid-update; the
        // state itself is still usable.
        self.auth.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Backend for MemoryBackend {
    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<Order>, BackendError> {
        debug!("Listing orders");
        Ok(self.table.list().await?)
    }

    #[instrument(skip(self))]
    async fn update_order(&self, id: &str, patch: OrderPatch) -> Result<(), BackendError> {
        debug!("Updating order");
        self.table.update(id.to_string(), patch).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(ordercli = %row.identifier))]
    async fn insert_order(&self, row: OrderInsert) -> Result<(), BackendError> {
        debug!("Inserting order");
        let id = self.table.create(row).await?;
        info!(order_id = %id, "Order inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, id: &str) -> Result<(), BackendError> {
        debug!("Deleting order");
        Ok(self.table.delete(id.to_string()).await?)
    }

    async fn current_session(&self) -> Result<Option<Session>, BackendError> {
        let mut auth = self.lock_auth();
        if auth.session.as_ref().is_some_and(|s| s.is_expired(Utc::now())) {
            debug!("Stored session expired");
            auth.session = None;
        }
        Ok(auth.session.clone())
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_in(&self, credentials: Credentials) -> Result<Session, BackendError> {
        let mut auth = self.lock_auth();
        match auth.accounts.get(&credentials.email) {
            Some(password) if *password == credentials.password => {
                let session = Session {
                    access_token: Uuid::new_v4().to_string(),
                    refresh_token: Some(Uuid::new_v4().to_string()),
                    expires_at: Some(Utc::now() + Duration::hours(SESSION_HOURS)),
                    user: SessionUser {
                        id: credentials.email.clone(),
                        email: Some(credentials.email),
                    },
                };
                auth.session = Some(session.clone());
                info!("Signed in");
                Ok(session)
            }
            _ => {
                warn!("Rejected sign-in");
                Err(BackendError::Auth("Invalid login credentials".to_string()))
            }
        }
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.lock_auth().session = None;
        Ok(())
    }

    async fn close(&self) {
        if let Err(e) = self.table.shutdown().await {
            debug!(error = %e, "Table actor already stopped");
        }
    }
}
