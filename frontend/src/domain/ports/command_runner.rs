//! Driven port for issuing backend calls.
//!
//! A command describes one REST call completely: method, path, query, body
//! encoding and the credential it needs. Runners classify every response
//! into an [`ApiOutcome`]; they never return transport errors directly.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{ApiOutcome, FormSubmission};

/// HTTP verb of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Upper-case verb as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body and its encoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` pairs.
    UrlEncoded(Vec<(String, String)>),
    /// `multipart/form-data` built from a submission, files included.
    Multipart(FormSubmission),
    /// `application/json` document.
    Json(Value),
}

/// Credential attached to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthRequirement {
    /// Sent without credentials.
    #[default]
    Anonymous,
    /// `Authorization: Bearer <access_token>`.
    Bearer,
    /// Session cookie replayed with the request.
    SessionCookie,
}

impl AuthRequirement {
    /// Whether the command needs the session token.
    pub fn needs_token(self) -> bool {
        !matches!(self, Self::Anonymous)
    }
}

/// One backend call.
///
/// # Examples
/// ```
/// use frontend::domain::ports::{ApiCommand, AuthRequirement, HttpMethod};
///
/// let command = ApiCommand::patch("/organizer/change-settings")
///     .with_query("model_name", "Facenet512")
///     .with_query("threshold", "0.4")
///     .with_auth(AuthRequirement::Bearer);
/// assert_eq!(command.method, HttpMethod::Patch);
/// assert_eq!(command.query.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCommand {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path relative to the configured base URL, starting with `/`.
    pub path: String,
    /// Trailing path segments carrying user input, each percent-encoded by
    /// the runner as exactly one segment.
    pub segments: Vec<String>,
    /// Query string pairs, percent-encoded by the runner.
    pub query: Vec<(String, String)>,
    /// Body and its encoding.
    pub body: RequestBody,
    /// Credential to attach.
    pub auth: AuthRequirement,
}

impl ApiCommand {
    /// Command with no query, body or credential.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
            auth: AuthRequirement::Anonymous,
        }
    }

    /// `GET` command.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// `POST` command.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// `PATCH` command.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// `DELETE` command.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Append one user-supplied path segment.
    #[must_use]
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Append a query pair.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Set the credential requirement.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthRequirement) -> Self {
        self.auth = auth;
        self
    }
}

/// Port executing backend commands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Issue the command and classify its result.
    async fn execute(&self, command: &ApiCommand) -> ApiOutcome;
}

/// Scripted runner that records every command it receives.
///
/// Outcomes are returned in the order they were queued; once the script is
/// exhausted every call succeeds with a `null` payload.
#[derive(Debug, Default)]
pub struct FixtureCommandRunner {
    script: Mutex<VecDeque<ApiOutcome>>,
    issued: Mutex<Vec<ApiCommand>>,
}

impl FixtureCommandRunner {
    /// Runner answering with `outcomes` in order.
    pub fn scripted(outcomes: impl IntoIterator<Item = ApiOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            issued: Mutex::new(Vec::new()),
        }
    }

    /// Queue one more outcome.
    pub fn push(&self, outcome: ApiOutcome) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(outcome);
    }

    /// Commands issued so far.
    pub fn issued(&self) -> Vec<ApiCommand> {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CommandRunner for FixtureCommandRunner {
    async fn execute(&self, command: &ApiCommand) -> ApiOutcome {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.clone());
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(ApiOutcome::Success(Value::Null))
    }
}
