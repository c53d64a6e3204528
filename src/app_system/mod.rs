//! System startup and shutdown, plus tracing setup.

pub mod board_system;
pub mod tracing;

pub use self::board_system::*;
pub use self::tracing::*;
