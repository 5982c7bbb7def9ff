//! Event portal front-end core.
//!
//! Client-side validation and submission orchestration for the event
//! portal: form rule chains, destructive-action confirmation, a classified
//! REST command runner and user feedback. The domain talks to the outside
//! world through the ports in [`domain::ports`]; [`outbound`] and [`ui`]
//! provide the shipped adapters.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod ui;
