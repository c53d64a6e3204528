use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Order, OrderInsert, OrderPatch};

impl Entity for Order {
    type Id = String;
    type CreatePayload = OrderInsert;
    type Patch = OrderPatch;

    fn id(&self) -> &String {
        &self.id
    }

    /// Builds the stored row. The arrival flag defaults to `false` like the
    /// table column does.
    fn from_create(id: String, payload: OrderInsert) -> Result<Self, String> {
        if payload.identifier.trim().is_empty() {
            return Err("ordercli must not be empty".to_string());
        }
        Ok(Self {
            id,
            identifier: payload.identifier,
            customer: payload.customer,
            expected_arrival: payload.expected_arrival,
            order_count: payload.order_count,
            volume_count: payload.volume_count,
            arrived: payload.arrived.unwrap_or(false),
            created_at: None,
            updated_at: None,
        })
    }

    fn on_create(&mut self) -> Result<(), String> {
        let now = Utc::now();
        self.created_at = Some(now);
        self.updated_at = Some(now);
        Ok(())
    }

    fn on_update(&mut self, patch: OrderPatch) -> Result<(), String> {
        if let Some(identifier) = patch.identifier {
            if identifier.trim().is_empty() {
                return Err("ordercli must not be empty".to_string());
            }
            self.identifier = identifier;
        }
        if let Some(customer) = patch.customer {
            self.customer = customer;
        }
        if let Some(date) = patch.expected_arrival {
            self.expected_arrival = date;
        }
        if let Some(count) = patch.order_count {
            self.order_count = count;
        }
        if let Some(count) = patch.volume_count {
            self.volume_count = count;
        }
        if let Some(arrived) = patch.arrived {
            self.arrived = arrived;
        }
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}
