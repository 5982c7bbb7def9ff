//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed [`CommandRunner`](crate::domain::ports::CommandRunner)
//! - **session**: session cookie parsing for the
//!   [`TokenSource`](crate::domain::ports::TokenSource) port
//!
//! Adapters translate between domain types and wire representations. They
//! contain no business logic.

pub mod http;
pub mod session;
