//! Classified results of backend calls.
//!
//! The runner never returns transport errors to callers directly; every call
//! resolves to one [`ApiOutcome`] so feedback can be chosen exhaustively.

use serde_json::Value;

/// Known backend `detail` phrases the pages react to specifically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailKind {
    /// The assistant has no registration for the event.
    RegistrationNotFound,
    /// The row already exists (for example, attendance recorded twice).
    DuplicateEntry,
    /// Face recognition found zero or several faces in the uploaded photo.
    FaceNotDetected,
    /// The person behind the id number is already registered.
    PersonAlreadyExists,
    /// The account email is already taken.
    UserAlreadyExists,
    /// Any other detail text.
    Unclassified,
}

const DETAIL_PATTERNS: [(&str, DetailKind); 5] = [
    ("registration not found", DetailKind::RegistrationNotFound),
    ("duplicate entry", DetailKind::DuplicateEntry),
    ("face could not be detected", DetailKind::FaceNotDetected),
    ("person already exists", DetailKind::PersonAlreadyExists),
    ("user already exists", DetailKind::UserAlreadyExists),
];

impl DetailKind {
    /// Classify a backend `detail` string by case-insensitive substring match.
    ///
    /// # Examples
    /// ```
    /// use frontend::domain::DetailKind;
    ///
    /// assert_eq!(
    ///     DetailKind::classify("(1062, \"Duplicate entry '3-5' for key 'PRIMARY'\")"),
    ///     DetailKind::DuplicateEntry,
    /// );
    /// assert_eq!(DetailKind::classify("boom"), DetailKind::Unclassified);
    /// ```
    pub fn classify(detail: &str) -> Self {
        let lowered = detail.to_lowercase();
        DETAIL_PATTERNS
            .iter()
            .find(|(pattern, _)| lowered.contains(pattern))
            .map_or(Self::Unclassified, |(_, kind)| *kind)
    }
}

/// Business-rule rejection reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainFailure {
    /// HTTP status code of the response.
    pub status: u16,
    /// Human-readable detail extracted from the body.
    pub detail: String,
    /// Classification of `detail`.
    pub kind: DetailKind,
    /// Route the backend asked the page to navigate to, if any.
    pub redirect: Option<String>,
}

impl DomainFailure {
    /// Build a failure, classifying the detail text.
    pub fn new(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            status,
            kind: DetailKind::classify(&detail),
            detail,
            redirect: None,
        }
    }

    /// Attach a backend-supplied redirect route.
    #[must_use]
    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }
}

/// Result of executing one API command.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// 2xx response with its decoded body.
    Success(Value),
    /// Non-2xx response other than 401.
    DomainError(DomainFailure),
    /// 401 response, or an authenticated call without a session token.
    SessionExpired,
    /// No usable response arrived.
    NetworkError {
        /// Transport failure description.
        message: String,
    },
}

impl ApiOutcome {
    /// Helper for domain failures.
    pub fn domain(status: u16, detail: impl Into<String>) -> Self {
        Self::DomainError(DomainFailure::new(status, detail))
    }

    /// Helper for transport failures.
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Whether the call succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Success payload, if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success(payload) => Some(payload),
            _ => None,
        }
    }
}
