use crate::domain::wire::parse_calendar_date;
use crate::domain::{Customer, Order, OrderInsert, OrderPatch};
use crate::error::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Identifier,
    Customer,
    ExpectedArrival,
    OrderCount,
    VolumeCount,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Identifier => "Order code",
            FormField::Customer => "Customer",
            FormField::ExpectedArrival => "Expected arrival",
            FormField::OrderCount => "Order count",
            FormField::VolumeCount => "Volume count",
        }
    }
}

/// Raw admin form input, held as typed until submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminForm {
    /// Record id when editing an existing order.
    pub editing: Option<String>,
    pub identifier: String,
    pub customer: Customer,
    pub expected_arrival: String,
    pub order_count: String,
    pub volume_count: String,
}

/// What a valid form turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmission {
    Insert(OrderInsert),
    /// Every field except the order code, by record id.
    Update { id: String, patch: OrderPatch },
}

impl AdminForm {
    pub fn from_order(order: &Order) -> Self {
        Self {
            editing: Some(order.id.clone()),
            identifier: order.identifier.clone(),
            customer: order.customer,
            expected_arrival: order.expected_arrival.format("%Y-%m-%d").to_string(),
            order_count: order.order_count.to_string(),
            volume_count: order.volume_count.to_string(),
        }
    }

    pub fn edit_target(&self) -> Option<&str> {
        self.editing.as_deref().filter(|id| !id.is_empty())
    }

    /// Update one input. The order code of an existing order is not editable,
    /// since saving an edit never sends it.
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        match field {
            FormField::Identifier if self.edit_target().is_some() => {
                if value.trim() != self.identifier.trim() {
                    return Err(FormError::IdentifierLocked);
                }
            }
            FormField::Identifier => self.identifier = value.to_string(),
            FormField::Customer => {
                self.customer = value
                    .parse()
                    .map_err(|_| FormError::InvalidCustomer(value.to_string()))?;
            }
            FormField::ExpectedArrival => self.expected_arrival = value.to_string(),
            FormField::OrderCount => self.order_count = value.to_string(),
            FormField::VolumeCount => self.volume_count = value.to_string(),
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<FormSubmission, FormError> {
        let identifier = required(FormField::Identifier, &self.identifier)?;
        let date_raw = required(FormField::ExpectedArrival, &self.expected_arrival)?;
        let expected_arrival =
            parse_calendar_date(date_raw).ok_or_else(|| FormError::InvalidDate(date_raw.to_string()))?;
        // The minimum of 1 is only a hint on the input; it is not enforced.
        let order_count = count(FormField::OrderCount, &self.order_count)?;
        let volume_count = count(FormField::VolumeCount, &self.volume_count)?;

        Ok(match self.edit_target() {
            Some(id) => FormSubmission::Update {
                id: id.to_string(),
                patch: OrderPatch {
                    identifier: None,
                    customer: Some(self.customer),
                    expected_arrival: Some(expected_arrival),
                    order_count: Some(order_count),
                    volume_count: Some(volume_count),
                    arrived: None,
                },
            },
            None => FormSubmission::Insert(OrderInsert {
                identifier: identifier.to_string(),
                customer: self.customer,
                expected_arrival,
                order_count,
                volume_count,
                arrived: None,
            }),
        })
    }
}

fn required(field: FormField, value: &str) -> Result<&str, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::MissingField(field.label()));
    }
    Ok(value)
}

fn count(field: FormField, value: &str) -> Result<i32, FormError> {
    required(field, value)?
        .parse()
        .map_err(|_| FormError::InvalidNumber {
            field: field.label(),
            value: value.to_string(),
        })
}
