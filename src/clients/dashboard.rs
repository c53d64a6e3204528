use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use super::BoardClient;
use crate::backend::Backend;
use crate::board::notice::{self, Notice};
use crate::board::{AdminForm, BoardSnapshot, FormField, FormSubmission, QrCard, View};
use crate::domain::{Credentials, Order, OrderPatch};
use crate::error::BoardError;
use crate::filter::OrderFilter;

/// Every user action on the board.
///
/// Each action calls the backend directly and then refetches the whole list
/// into the board actor. Actions are not serialized against each other; when
/// two overlap, whichever refetch lands last wins.
pub struct Dashboard<B: Backend> {
    backend: Arc<B>,
    board: BoardClient,
    notices: broadcast::Sender<Notice>,
}

impl<B: Backend> Clone for Dashboard<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            board: self.board.clone(),
            notices: self.notices.clone(),
        }
    }
}

impl<B: Backend> Dashboard<B> {
    pub fn new(backend: Arc<B>, board: BoardClient, notices: broadcast::Sender<Notice>) -> Self {
        Self {
            backend,
            board,
            notices,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn board(&self) -> &BoardClient {
        &self.board
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    fn notify(&self, notice: Notice) {
        debug!(level = ?notice.level, message = %notice.message, "Notice");
        // Nobody listening is fine.
        let _ = self.notices.send(notice);
    }

    // -------------------------------------------------------------------------
    // Startup and list
    // -------------------------------------------------------------------------

    /// Fetch the list and check for an existing session, concurrently.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<View, BoardError> {
        info!("Starting board");
        let (fetched, view) = tokio::join!(self.refresh(), self.check_session());
        if let Err(e) = fetched {
            warn!(error = %e, "Initial fetch failed");
        }
        view?;
        Ok(self.board.snapshot().await?.view)
    }

    /// Replace the list with a fresh fetch.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<usize, BoardError> {
        match self.backend.list_orders().await {
            Ok(orders) => self.board.replace_orders(orders).await,
            Err(e) => {
                error!(error = %e, "Fetching orders failed");
                self.notify(Notice::error(notice::FETCH_FAILED));
                self.board.fetch_failed().await?;
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn check_session(&self) -> Result<View, BoardError> {
        let signed_in = match self.backend.current_session().await {
            Ok(session) => session.is_some(),
            Err(e) => {
                warn!(error = %e, "Session check failed, continuing signed out");
                false
            }
        };
        self.board.session_checked(signed_in).await
    }

    pub async fn snapshot(&self) -> Result<BoardSnapshot, BoardError> {
        self.board.snapshot().await
    }

    // -------------------------------------------------------------------------
    // Search and filter
    // -------------------------------------------------------------------------

    /// Search box input, matched as typed and ignoring case. The box shows
    /// it uppercased ([`crate::filter::normalize_query`]).
    pub async fn search(&self, input: &str) -> Result<Vec<Order>, BoardError> {
        self.board.search(input.to_string()).await
    }

    pub async fn clear_search(&self) -> Result<Vec<Order>, BoardError> {
        self.board.search(String::new()).await
    }

    pub async fn apply_filter(&self, filter: OrderFilter) -> Result<Vec<Order>, BoardError> {
        self.board.apply_filter(filter).await
    }

    pub async fn reset_filter(&self) -> Result<Vec<Order>, BoardError> {
        self.board.reset_filter().await
    }

    // -------------------------------------------------------------------------
    // Arrival toggle and QR
    // -------------------------------------------------------------------------

    /// Flip one order's arrival flag. The list only shows the new value once
    /// the refetch that follows has landed.
    #[instrument(skip(self))]
    pub async fn toggle_arrival(&self, id: &str) -> Result<(), BoardError> {
        let Some(order) = self.board.find_order(id.to_string()).await? else {
            warn!("Toggle requested for unknown order");
            self.notify(Notice::error(notice::STATUS_FAILED));
            return Err(BoardError::OrderNotFound(id.to_string()));
        };

        let patch = OrderPatch::arrival(!order.arrived);
        if let Err(e) = self.backend.update_order(id, patch).await {
            error!(error = %e, "Arrival update failed");
            self.notify(Notice::error(notice::STATUS_FAILED));
            return Err(e.into());
        }

        info!(arrived = !order.arrived, "Arrival status updated");
        self.notify(Notice::success(notice::STATUS_UPDATED));
        self.refresh().await?;
        Ok(())
    }

    pub async fn show_qr(&self, id: &str) -> Result<QrCard, BoardError> {
        self.board.open_qr(id.to_string()).await
    }

    pub async fn close_qr(&self) -> Result<(), BoardError> {
        self.board.close_qr().await
    }

    // -------------------------------------------------------------------------
    // Session gate
    // -------------------------------------------------------------------------

    pub async fn show_login(&self) -> Result<View, BoardError> {
        self.board.show_login().await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<View, BoardError> {
        match self.backend.sign_in(Credentials::new(email, password)).await {
            Ok(_) => {
                self.notify(Notice::success(notice::LOGIN_OK));
                self.board.login_succeeded().await
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                let message = e.backend_message().unwrap_or(notice::LOGIN_FAILED);
                self.notify(Notice::error(message));
                Err(e.into())
            }
        }
    }

    /// Sign out and return to the public list. The view changes even when
    /// the backend call fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<View, BoardError> {
        match self.backend.sign_out().await {
            Ok(()) => self.notify(Notice::success(notice::LOGOUT_OK)),
            Err(e) => {
                error!(error = %e, "Sign-out failed");
                self.notify(Notice::error(notice::LOGOUT_FAILED));
            }
        }
        self.board.logged_out().await
    }

    // -------------------------------------------------------------------------
    // Admin form
    // -------------------------------------------------------------------------

    /// Show the empty form, or hide it if already shown.
    pub async fn open_new_form(&self) -> Result<Option<AdminForm>, BoardError> {
        self.board.toggle_form().await
    }

    #[instrument(skip(self))]
    pub async fn edit_order(&self, id: &str) -> Result<AdminForm, BoardError> {
        let result = self.board.edit_order(id.to_string()).await;
        if result.is_err() {
            self.notify(Notice::error(notice::EDIT_FAILED));
        }
        result
    }

    pub async fn set_form_field(&self, field: FormField, value: &str) -> Result<AdminForm, BoardError> {
        let result = self.board.set_form_field(field, value.to_string()).await;
        if let Err(e) = &result {
            warn!(?field, error = %e, "Form input rejected");
            self.notify(Notice::error(e.to_string()));
        }
        result
    }

    pub async fn cancel_form(&self) -> Result<(), BoardError> {
        self.board.cancel_form().await
    }

    /// Validate the form, then insert or update. Validation failures never
    /// reach the backend.
    #[instrument(skip(self))]
    pub async fn submit_form(&self) -> Result<(), BoardError> {
        let submission = match self.board.take_submission().await {
            Ok(submission) => submission,
            Err(e) => {
                warn!(error = %e, "Form not submitted");
                self.notify(Notice::error(e.to_string()));
                return Err(e);
            }
        };

        let result = match submission {
            FormSubmission::Insert(row) => self.backend.insert_order(row).await,
            FormSubmission::Update { id, patch } => self.backend.update_order(&id, patch).await,
        };
        if let Err(e) = result {
            error!(error = %e, "Saving order failed");
            self.notify(Notice::error(notice::SAVE_FAILED));
            return Err(e.into());
        }

        info!("Order saved");
        self.notify(Notice::success(notice::ORDER_SAVED));
        self.board.form_saved().await?;
        self.refresh().await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Delete with confirmation
    // -------------------------------------------------------------------------

    /// Ask for confirmation before deleting. Nothing is sent yet.
    pub async fn request_delete(&self, id: &str) -> Result<(), BoardError> {
        self.board.request_delete(id.to_string()).await
    }

    pub async fn cancel_delete(&self) -> Result<(), BoardError> {
        self.board.cancel_delete().await
    }

    #[instrument(skip(self))]
    pub async fn confirm_delete(&self) -> Result<(), BoardError> {
        let id = self.board.take_pending_delete().await?;
        if let Err(e) = self.backend.delete_order(&id).await {
            error!(order_id = %id, error = %e, "Delete failed");
            self.notify(Notice::error(notice::DELETE_FAILED));
            return Err(e.into());
        }

        info!(order_id = %id, "Order deleted");
        self.notify(Notice::success(notice::ORDER_DELETED));
        self.refresh().await?;
        Ok(())
    }
}
