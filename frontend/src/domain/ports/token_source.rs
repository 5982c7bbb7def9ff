//! Driven port exposing the session token.

/// Port reading the `access_token` session credential.
#[cfg_attr(test, mockall::automock)]
pub trait TokenSource: Send + Sync {
    /// Current token, or `None` when the user is not signed in.
    fn access_token(&self) -> Option<String>;
}

/// Token source returning a fixed value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureTokenSource(pub Option<String>);

impl TokenSource for FixtureTokenSource {
    fn access_token(&self) -> Option<String> {
        self.0.clone()
    }
}
