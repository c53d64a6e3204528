#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message for the user (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub const FETCH_FAILED: &str = "Failed to fetch orders";
pub const STATUS_UPDATED: &str = "Order status updated";
pub const STATUS_FAILED: &str = "Failed to update order";
pub const ORDER_SAVED: &str = "Order saved successfully";
pub const SAVE_FAILED: &str = "Failed to save order";
pub const ORDER_DELETED: &str = "Order deleted successfully";
pub const DELETE_FAILED: &str = "Failed to delete order";
pub const EDIT_FAILED: &str = "Could not load order for editing";
pub const LOGIN_OK: &str = "Signed in successfully";
pub const LOGIN_FAILED: &str = "Failed to sign in";
pub const LOGOUT_OK: &str = "Signed out successfully";
pub const LOGOUT_FAILED: &str = "Failed to sign out";
