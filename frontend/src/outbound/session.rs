//! Session cookie token source.

use crate::domain::ports::TokenSource;

const TOKEN_COOKIE: &str = "access_token";

/// Token read from a `Cookie`-header style string.
///
/// # Examples
/// ```
/// use frontend::domain::ports::TokenSource;
/// use frontend::outbound::session::SessionCookie;
///
/// let cookie = SessionCookie::from_cookie_header("theme=dark; access_token=abc123");
/// assert_eq!(cookie.access_token().as_deref(), Some("abc123"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookie {
    token: Option<String>,
}

impl SessionCookie {
    /// Parse `name=value` pairs separated by `;`.
    ///
    /// An empty `access_token` value counts as signed out.
    pub fn from_cookie_header(header: &str) -> Self {
        let token = header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| name.trim() == TOKEN_COOKIE)
            .map(|(_, value)| value.trim().trim_matches('"').to_owned())
            .filter(|value| !value.is_empty());
        Self { token }
    }

    /// Cookie with no session.
    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl TokenSource for SessionCookie {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}
