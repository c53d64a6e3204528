use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

/// The two customer accounts whose deliveries are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Customer {
    #[default]
    #[serde(alias = "natura", alias = "NATURA")]
    Natura,
    #[serde(alias = "avon", alias = "AVON")]
    Avon,
}

impl Customer {
    pub fn as_str(self) -> &'static str {
        match self {
            Customer::Natura => "Natura",
            Customer::Avon => "Avon",
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Customer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Natura" => Ok(Customer::Natura),
            "Avon" => Ok(Customer::Avon),
            other => Err(format!("Unknown customer: {other}")),
        }
    }
}

/// A tracked delivery batch, as stored in the `orders` table.
///
/// Field names on the wire are the table's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "wire::string_or_number")]
    pub id: String,
    /// External client-order code. Used as search key and QR payload.
    #[serde(rename = "ordercli")]
    pub identifier: String,
    #[serde(rename = "cliente")]
    pub customer: Customer,
    #[serde(rename = "previsao_chegada", with = "wire::calendar_date")]
    pub expected_arrival: NaiveDate,
    #[serde(rename = "qtde_pedidos", deserialize_with = "wire::count")]
    pub order_count: i32,
    #[serde(rename = "qtde_volumes", deserialize_with = "wire::count")]
    pub volume_count: i32,
    #[serde(rename = "chegou_na_base", default)]
    pub arrived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        identifier: impl Into<String>,
        customer: Customer,
        expected_arrival: NaiveDate,
        order_count: i32,
        volume_count: i32,
    ) -> Self {
        Self {
            id: id.into(),
            identifier: identifier.into(),
            customer,
            expected_arrival,
            order_count,
            volume_count,
            arrived: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_arrived(mut self, arrived: bool) -> Self {
        self.arrived = arrived;
        self
    }
}

/// Payload for inserting a new order. Server-assigned columns are never sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderInsert {
    #[serde(rename = "ordercli")]
    pub identifier: String,
    #[serde(rename = "cliente")]
    pub customer: Customer,
    #[serde(rename = "previsao_chegada", with = "wire::calendar_date")]
    pub expected_arrival: NaiveDate,
    #[serde(rename = "qtde_pedidos")]
    pub order_count: i32,
    #[serde(rename = "qtde_volumes")]
    pub volume_count: i32,
    #[serde(rename = "chegou_na_base", skip_serializing_if = "Option::is_none")]
    pub arrived: Option<bool>,
}

/// Partial update. Only the fields that are set go over the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderPatch {
    #[serde(rename = "ordercli", skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(rename = "cliente", skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(
        rename = "previsao_chegada",
        skip_serializing_if = "Option::is_none",
        serialize_with = "wire::optional_calendar_date"
    )]
    pub expected_arrival: Option<NaiveDate>,
    #[serde(rename = "qtde_pedidos", skip_serializing_if = "Option::is_none")]
    pub order_count: Option<i32>,
    #[serde(rename = "qtde_volumes", skip_serializing_if = "Option::is_none")]
    pub volume_count: Option<i32>,
    #[serde(rename = "chegou_na_base", skip_serializing_if = "Option::is_none")]
    pub arrived: Option<bool>,
}

impl OrderPatch {
    /// A patch that only sets the arrival flag.
    pub fn arrival(arrived: bool) -> Self {
        Self {
            arrived: Some(arrived),
            ..Self::default()
        }
    }
}
