use tokio::sync::oneshot;

use crate::board::{AdminForm, BoardSnapshot, FormField, FormSubmission, QrCard, View};
use crate::domain::Order;
use crate::error::BoardError;
use crate::filter::OrderFilter;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Messages understood by [`crate::board::BoardService`]. Each variant carries
/// its parameters and a oneshot channel for the reply.
#[derive(Debug)]
pub enum BoardRequest {
    // --- list ---
    ReplaceOrders {
        orders: Vec<Order>,
        respond_to: ServiceResponse<usize, BoardError>,
    },
    FetchFailed {
        respond_to: ServiceResponse<(), BoardError>,
    },
    FindOrder {
        id: String,
        respond_to: ServiceResponse<Option<Order>, BoardError>,
    },
    Search {
        query: String,
        respond_to: ServiceResponse<Vec<Order>, BoardError>,
    },
    ApplyFilter {
        filter: OrderFilter,
        respond_to: ServiceResponse<Vec<Order>, BoardError>,
    },
    ResetFilter {
        respond_to: ServiceResponse<Vec<Order>, BoardError>,
    },
    Snapshot {
        respond_to: ServiceResponse<BoardSnapshot, BoardError>,
    },

    // --- session gate ---
    SessionChecked {
        signed_in: bool,
        respond_to: ServiceResponse<View, BoardError>,
    },
    ShowLogin {
        respond_to: ServiceResponse<View, BoardError>,
    },
    LoginSucceeded {
        respond_to: ServiceResponse<View, BoardError>,
    },
    LoggedOut {
        respond_to: ServiceResponse<View, BoardError>,
    },

    // --- QR modal ---
    OpenQr {
        id: String,
        respond_to: ServiceResponse<QrCard, BoardError>,
    },
    CloseQr {
        respond_to: ServiceResponse<(), BoardError>,
    },

    // --- admin form ---
    ToggleForm {
        respond_to: ServiceResponse<Option<AdminForm>, BoardError>,
    },
    EditOrder {
        id: String,
        respond_to: ServiceResponse<AdminForm, BoardError>,
    },
    SetFormField {
        field: FormField,
        value: String,
        respond_to: ServiceResponse<AdminForm, BoardError>,
    },
    CancelForm {
        respond_to: ServiceResponse<(), BoardError>,
    },
    TakeSubmission {
        respond_to: ServiceResponse<FormSubmission, BoardError>,
    },
    FormSaved {
        respond_to: ServiceResponse<(), BoardError>,
    },

    // --- delete confirmation ---
    RequestDelete {
        id: String,
        respond_to: ServiceResponse<(), BoardError>,
    },
    TakePendingDelete {
        respond_to: ServiceResponse<String, BoardError>,
    },
    CancelDelete {
        respond_to: ServiceResponse<(), BoardError>,
    },

    Shutdown,
}
