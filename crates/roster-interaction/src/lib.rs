//! Remote gateway implementations for the roster backend.

pub mod http_gateway;

pub use http_gateway::HttpRosterGateway;
