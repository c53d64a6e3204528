//! The data client: CRUD on the `orders` table plus password auth.
//!
//! [`RestBackend`] talks to the hosted service over HTTP; [`MemoryBackend`]
//! keeps everything in-process and backs the demo and the tests.

use std::future::Future;

use crate::domain::{Credentials, Order, OrderInsert, OrderPatch, Session};

pub mod error;
pub mod memory;
pub mod rest;

pub use error::BackendError;
pub use memory::MemoryBackend;
pub use rest::RestBackend;

pub trait Backend: Send + Sync + 'static {
    /// Every row, newest `created_at` first.
    fn list_orders(&self) -> impl Future<Output = Result<Vec<Order>, BackendError>> + Send;

    fn update_order(
        &self,
        id: &str,
        patch: OrderPatch,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn insert_order(&self, row: OrderInsert) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn delete_order(&self, id: &str) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// The current session, if one is still valid.
    fn current_session(&self) -> impl Future<Output = Result<Option<Session>, BackendError>> + Send;

    fn sign_in(
        &self,
        credentials: Credentials,
    ) -> impl Future<Output = Result<Session, BackendError>> + Send;

    fn sign_out(&self) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Release any background resources. Called once at system shutdown.
    fn close(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}
