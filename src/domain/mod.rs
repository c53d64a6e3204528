pub mod order;
pub mod session;
pub mod wire;

pub use order::*;
pub use session::*;
