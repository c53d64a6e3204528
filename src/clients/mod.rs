#[macro_use]
mod macros;
mod board_client;
mod dashboard;

pub use board_client::BoardClient;
pub use dashboard::Dashboard;
