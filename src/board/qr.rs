use crate::domain::Order;

/// QR error-correction level. Every card on the board uses the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcLevel {
    High,
}

pub const DETAIL_SIZE: u32 = 200;
pub const THUMBNAIL_SIZE: u32 = 100;

/// Everything a renderer needs to draw one order's code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCard {
    pub payload: String,
    pub size: u32,
    pub level: EcLevel,
    pub include_margin: bool,
}

impl QrCard {
    fn sized(order: &Order, size: u32) -> Self {
        Self {
            payload: order.identifier.clone(),
            size,
            level: EcLevel::High,
            include_margin: true,
        }
    }

    /// The enlarged code shown in the detail modal.
    pub fn detail(order: &Order) -> Self {
        Self::sized(order, DETAIL_SIZE)
    }

    /// The small code on each list card.
    pub fn thumbnail(order: &Order) -> Self {
        Self::sized(order, THUMBNAIL_SIZE)
    }
}
