//! Delivery arrival board: a public order list with search, QR cards and an
//! arrival flag, plus a password-gated admin panel for order CRUD.
//!
//! Start a [`app_system::BoardSystem`] over a [`backend::Backend`] and drive
//! it through its [`clients::Dashboard`].

pub mod actor_framework;
pub mod app_system;
pub mod backend;
pub mod board;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod messages;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;
