//! REST backend adapters.
//!
//! This module provides a thin HTTP implementation of the `CommandRunner`
//! port plus the response classification it relies on.

mod command_runner;
mod response;

pub use command_runner::HttpCommandRunner;
pub use response::classify_response;
