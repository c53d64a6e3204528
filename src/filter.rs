//! List narrowing: the search box and the multi-field filter.

use crate::domain::{Customer, Order};

/// How the search box displays typed text. Matching uses the text as typed,
/// since uppercasing is not a case fold ("ß" becomes "SS").
pub fn normalize_query(input: &str) -> String {
    input.to_uppercase()
}

/// Orders whose identifier contains `query`, ignoring case. An empty query
/// keeps every order. Relative order is preserved.
pub fn search_orders(orders: &[Order], query: &str) -> Vec<Order> {
    if query.is_empty() {
        return orders.to_vec();
    }
    let needle = query.to_lowercase();
    orders
        .iter()
        .filter(|order| order.identifier.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Multi-field filter. Each control only applies when set, and all set
/// controls must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    /// Case-sensitive substring of the identifier.
    pub term: Option<String>,
    pub customer: Option<Customer>,
    /// Inclusive lower bound on order count.
    pub min_orders: Option<i32>,
    /// Inclusive upper bound on order count.
    pub max_orders: Option<i32>,
    pub arrived: Option<bool>,
}

impl OrderFilter {
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    pub fn customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn order_count_between(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_orders = min;
        self.max_orders = max;
        self
    }

    pub fn arrived(mut self, arrived: bool) -> Self {
        self.arrived = Some(arrived);
        self
    }

    /// Clear every control.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, order: &Order) -> bool {
        if let Some(term) = self.term.as_deref().filter(|t| !t.is_empty()) {
            if !order.identifier.contains(term) {
                return false;
            }
        }
        if self.customer.is_some_and(|c| c != order.customer) {
            return false;
        }
        if self.min_orders.is_some_and(|min| order.order_count < min) {
            return false;
        }
        if self.max_orders.is_some_and(|max| order.order_count > max) {
            return false;
        }
        if self.arrived.is_some_and(|arrived| arrived != order.arrived) {
            return false;
        }
        true
    }

    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        orders.iter().filter(|o| self.matches(o)).cloned().collect()
    }
}

/// Whichever narrowing the user last asked for. Re-applied after every fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveFilter {
    Search(String),
    Fields(OrderFilter),
}

impl Default for ActiveFilter {
    fn default() -> Self {
        ActiveFilter::Search(String::new())
    }
}

impl ActiveFilter {
    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        match self {
            ActiveFilter::Search(query) => search_orders(orders, query),
            ActiveFilter::Fields(filter) => filter.apply(orders),
        }
    }
}
