use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::board::{AdminForm, BoardSnapshot, FormField, FormSubmission, QrCard, View};
use crate::domain::Order;
use crate::error::BoardError;
use crate::filter::OrderFilter;
use crate::messages::BoardRequest;

/// Handle to the [`crate::board::BoardService`] actor.
#[derive(Clone)]
pub struct BoardClient {
    sender: mpsc::Sender<BoardRequest>,
}

impl BoardClient {
    pub fn new(sender: mpsc::Sender<BoardRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), BoardError> {
        debug!("Sending shutdown request");
        self.sender
            .send(BoardRequest::Shutdown)
            .await
            .map_err(|e| BoardError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(BoardClient => fn replace_orders(orders: Vec<Order>) -> usize as BoardRequest::ReplaceOrders);
client_method!(BoardClient => fn fetch_failed() -> () as BoardRequest::FetchFailed);
client_method!(BoardClient => fn find_order(id: String) -> Option<Order> as BoardRequest::FindOrder);
client_method!(BoardClient => fn search(query: String) -> Vec<Order> as BoardRequest::Search);
client_method!(BoardClient => fn apply_filter(filter: OrderFilter) -> Vec<Order> as BoardRequest::ApplyFilter);
client_method!(BoardClient => fn reset_filter() -> Vec<Order> as BoardRequest::ResetFilter);
client_method!(BoardClient => fn snapshot() -> BoardSnapshot as BoardRequest::Snapshot);

client_method!(BoardClient => fn session_checked(signed_in: bool) -> View as BoardRequest::SessionChecked);
client_method!(BoardClient => fn show_login() -> View as BoardRequest::ShowLogin);
client_method!(BoardClient => fn login_succeeded() -> View as BoardRequest::LoginSucceeded);
client_method!(BoardClient => fn logged_out() -> View as BoardRequest::LoggedOut);

client_method!(BoardClient => fn open_qr(id: String) -> QrCard as BoardRequest::OpenQr);
client_method!(BoardClient => fn close_qr() -> () as BoardRequest::CloseQr);

client_method!(BoardClient => fn toggle_form() -> Option<AdminForm> as BoardRequest::ToggleForm);
client_method!(BoardClient => fn edit_order(id: String) -> AdminForm as BoardRequest::EditOrder);
client_method!(BoardClient => fn set_form_field(field: FormField, value: String) -> AdminForm as BoardRequest::SetFormField);
client_method!(BoardClient => fn cancel_form() -> () as BoardRequest::CancelForm);
client_method!(BoardClient => fn take_submission() -> FormSubmission as BoardRequest::TakeSubmission);
client_method!(BoardClient => fn form_saved() -> () as BoardRequest::FormSaved);

client_method!(BoardClient => fn request_delete(id: String) -> () as BoardRequest::RequestDelete);
client_method!(BoardClient => fn take_pending_delete() -> String as BoardRequest::TakePendingDelete);
client_method!(BoardClient => fn cancel_delete() -> () as BoardRequest::CancelDelete);
