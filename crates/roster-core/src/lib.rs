//! Domain layer of the roster client.
//!
//! Holds the models exchanged with the roster backend, the shared error type,
//! and the traits the application layer depends on (remote gateway, durable
//! storage).

pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod preferences;
pub mod route;
pub mod session;
pub mod storage;

// Re-export common error type
pub use error::{Result, RosterError};
