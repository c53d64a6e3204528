//! Board state: the fetched list, the session gate, the QR modal, the admin
//! form and delete confirmation, all owned by one actor.

pub mod display;
pub mod form;
pub mod gate;
pub mod notice;
pub mod qr;
mod service;

pub use form::{AdminForm, FormField, FormSubmission};
pub use gate::{SessionGate, View};
pub use notice::{Notice, NoticeLevel};
pub use qr::QrCard;
pub use service::{BoardService, BoardSnapshot};
