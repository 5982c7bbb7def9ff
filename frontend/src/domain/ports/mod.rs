//! Domain ports and supporting types for the hexagonal boundary.
//!
//! The action layer only reaches the backend, the user and the rendered
//! page through these traits. Adapters live in `crate::outbound` and
//! `crate::ui`; fixtures here give tests and demos deterministic doubles.

mod command_runner;
mod confirmation_gateway;
mod notifier;
mod token_source;
mod view_surface;

#[cfg(test)]
pub use command_runner::MockCommandRunner;
pub use command_runner::{
    ApiCommand, AuthRequirement, CommandRunner, FixtureCommandRunner, HttpMethod, RequestBody,
};
#[cfg(test)]
pub use confirmation_gateway::MockConfirmationGateway;
pub use confirmation_gateway::{ConfirmationGateway, FixtureConfirmationGateway};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{FixtureNotifier, Notifier};
#[cfg(test)]
pub use token_source::MockTokenSource;
pub use token_source::{FixtureTokenSource, TokenSource};
#[cfg(test)]
pub use view_surface::MockViewSurface;
pub use view_surface::ViewSurface;
