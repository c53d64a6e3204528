use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::{AdminForm, FormField, FormSubmission, QrCard, SessionGate, View};
use crate::clients::BoardClient;
use crate::domain::Order;
use crate::error::BoardError;
use crate::filter::ActiveFilter;
use crate::messages::{BoardRequest, ServiceResponse};

/// Everything a renderer needs, captured at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub view: View,
    /// The full fetched list.
    pub orders: Vec<Order>,
    /// The list after the active search or filter.
    pub filtered: Vec<Order>,
    pub filter: ActiveFilter,
    pub qr: Option<QrCard>,
    pub form: Option<AdminForm>,
    pub pending_delete: Option<String>,
}

impl BoardSnapshot {
    /// Rows for the current view: the admin table lists everything, the
    /// public list shows the filtered subset.
    pub fn visible(&self) -> &[Order] {
        match self.view {
            View::AdminPanel => &self.orders,
            View::PublicList => &self.filtered,
            View::Loading | View::LoginForm => &[],
        }
    }
}

/// Owns the board's state. The fetched list is only ever replaced wholesale
/// from a backend fetch; this actor never edits rows itself.
pub struct BoardService {
    receiver: mpsc::Receiver<BoardRequest>,
    orders: Vec<Order>,
    filtered: Vec<Order>,
    filter: ActiveFilter,
    loading: bool,
    gate: SessionGate,
    qr: Option<QrCard>,
    form: Option<AdminForm>,
    pending_delete: Option<String>,
}

impl BoardService {
    pub fn new(buffer_size: usize) -> (Self, BoardClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            orders: Vec::new(),
            filtered: Vec::new(),
            filter: ActiveFilter::default(),
            loading: true,
            gate: SessionGate::default(),
            qr: None,
            form: None,
            pending_delete: None,
        };
        (service, BoardClient::new(sender))
    }

    #[instrument(name = "board_service", skip(self))]
    pub async fn run(mut self) {
        info!("BoardService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                BoardRequest::ReplaceOrders { orders, respond_to } => {
                    self.handle_replace_orders(orders, respond_to);
                }
                BoardRequest::FetchFailed { respond_to } => {
                    self.loading = false;
                    let _ = respond_to.send(Ok(()));
                }
                BoardRequest::FindOrder { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.find(&id).cloned()));
                }
                BoardRequest::Search { query, respond_to } => {
                    self.set_filter(ActiveFilter::Search(query), respond_to);
                }
                BoardRequest::ApplyFilter { filter, respond_to } => {
                    self.set_filter(ActiveFilter::Fields(filter), respond_to);
                }
                BoardRequest::ResetFilter { respond_to } => {
                    self.set_filter(ActiveFilter::default(), respond_to);
                }
                BoardRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.snapshot()));
                }
                BoardRequest::SessionChecked { signed_in, respond_to } => {
                    self.gate = self.gate.session_checked(signed_in);
                    let _ = respond_to.send(Ok(self.view()));
                }
                BoardRequest::ShowLogin { respond_to } => {
                    self.gate = self.gate.show_login();
                    let _ = respond_to.send(Ok(self.view()));
                }
                BoardRequest::LoginSucceeded { respond_to } => {
                    self.gate = self.gate.login_succeeded();
                    let _ = respond_to.send(Ok(self.view()));
                }
                BoardRequest::LoggedOut { respond_to } => {
                    self.handle_logged_out(respond_to);
                }
                BoardRequest::OpenQr { id, respond_to } => {
                    self.handle_open_qr(id, respond_to);
                }
                BoardRequest::CloseQr { respond_to } => {
                    self.qr = None;
                    let _ = respond_to.send(Ok(()));
                }
                BoardRequest::ToggleForm { respond_to } => {
                    self.handle_toggle_form(respond_to);
                }
                BoardRequest::EditOrder { id, respond_to } => {
                    self.handle_edit_order(id, respond_to);
                }
                BoardRequest::SetFormField { field, value, respond_to } => {
                    self.handle_set_form_field(field, value, respond_to);
                }
                BoardRequest::CancelForm { respond_to } => {
                    self.form = None;
                    let _ = respond_to.send(Ok(()));
                }
                BoardRequest::TakeSubmission { respond_to } => {
                    let _ = respond_to.send(self.submission());
                }
                BoardRequest::FormSaved { respond_to } => {
                    self.form = None;
                    let _ = respond_to.send(Ok(()));
                }
                BoardRequest::RequestDelete { id, respond_to } => {
                    self.handle_request_delete(id, respond_to);
                }
                BoardRequest::TakePendingDelete { respond_to } => {
                    let result = self.pending_delete.take().ok_or(BoardError::NoPendingDelete);
                    let _ = respond_to.send(result);
                }
                BoardRequest::CancelDelete { respond_to } => {
                    self.pending_delete = None;
                    let _ = respond_to.send(Ok(()));
                }
                BoardRequest::Shutdown => {
                    info!("BoardService shutting down");
                    break;
                }
            }
        }

        info!("BoardService stopped");
    }

    fn find(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    fn view(&self) -> View {
        View::derive(self.gate, self.loading)
    }

    fn require_admin(&self) -> Result<(), BoardError> {
        if self.gate.is_admin() {
            Ok(())
        } else {
            Err(BoardError::NotAuthorized)
        }
    }

    fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            view: self.view(),
            orders: self.orders.clone(),
            filtered: self.filtered.clone(),
            filter: self.filter.clone(),
            qr: self.qr.clone(),
            form: self.form.clone(),
            pending_delete: self.pending_delete.clone(),
        }
    }

    #[instrument(fields(row_count = orders.len()), skip(self, orders, respond_to))]
    fn handle_replace_orders(
        &mut self,
        orders: Vec<Order>,
        respond_to: ServiceResponse<usize, BoardError>,
    ) {
        self.orders = orders;
        self.filtered = self.filter.apply(&self.orders);
        self.loading = false;
        debug!(visible = self.filtered.len(), "Order list replaced");
        let _ = respond_to.send(Ok(self.orders.len()));
    }

    #[instrument(skip(self, respond_to))]
    fn set_filter(&mut self, filter: ActiveFilter, respond_to: ServiceResponse<Vec<Order>, BoardError>) {
        self.filter = filter;
        self.filtered = self.filter.apply(&self.orders);
        debug!(visible = self.filtered.len(), "Filter applied");
        let _ = respond_to.send(Ok(self.filtered.clone()));
    }

    fn handle_logged_out(&mut self, respond_to: ServiceResponse<View, BoardError>) {
        self.gate = self.gate.logged_out();
        self.form = None;
        self.pending_delete = None;
        let _ = respond_to.send(Ok(self.view()));
    }

    #[instrument(fields(order_id = %id), skip(self, respond_to))]
    fn handle_open_qr(&mut self, id: String, respond_to: ServiceResponse<QrCard, BoardError>) {
        let result = match self.find(&id) {
            Some(order) => {
                let card = QrCard::detail(order);
                self.qr = Some(card.clone());
                Ok(card)
            }
            None => Err(BoardError::OrderNotFound(id)),
        };
        let _ = respond_to.send(result);
    }

    fn handle_toggle_form(&mut self, respond_to: ServiceResponse<Option<AdminForm>, BoardError>) {
        let result = self.require_admin().map(|()| {
            self.form = match self.form {
                Some(_) => None,
                None => Some(AdminForm::default()),
            };
            self.form.clone()
        });
        let _ = respond_to.send(result);
    }

    #[instrument(fields(order_id = %id), skip(self, respond_to))]
    fn handle_edit_order(&mut self, id: String, respond_to: ServiceResponse<AdminForm, BoardError>) {
        let result = self.require_admin().and_then(|()| {
            let order = self.find(&id).ok_or_else(|| BoardError::OrderNotFound(id.clone()))?;
            let form = AdminForm::from_order(order);
            self.form = Some(form.clone());
            Ok(form)
        });
        if let Err(e) = &result {
            warn!(error = %e, "Cannot edit order");
        }
        let _ = respond_to.send(result);
    }

    fn handle_set_form_field(
        &mut self,
        field: FormField,
        value: String,
        respond_to: ServiceResponse<AdminForm, BoardError>,
    ) {
        let result = match self.form.as_mut() {
            Some(form) => form
                .set(field, &value)
                .map(|()| form.clone())
                .map_err(BoardError::from),
            None => Err(BoardError::FormClosed),
        };
        let _ = respond_to.send(result);
    }

    fn submission(&self) -> Result<FormSubmission, BoardError> {
        self.require_admin()?;
        let form = self.form.as_ref().ok_or(BoardError::FormClosed)?;
        Ok(form.validate()?)
    }

    #[instrument(fields(order_id = %id), skip(self, respond_to))]
    fn handle_request_delete(&mut self, id: String, respond_to: ServiceResponse<(), BoardError>) {
        let result = self.require_admin().and_then(|()| {
            if self.find(&id).is_none() {
                return Err(BoardError::OrderNotFound(id.clone()));
            }
            self.pending_delete = Some(id.clone());
            Ok(())
        });
        let _ = respond_to.send(result);
    }
}
