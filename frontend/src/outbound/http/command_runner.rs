//! Reqwest-backed command runner.
//!
//! This adapter owns transport details only: URL assembly, credential
//! headers, body encoding, timeouts, and handing the raw response to
//! [`classify_response`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use reqwest::header::COOKIE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Url};
use tracing::{debug, warn};

use super::response::classify_response;
use crate::domain::ports::{
    ApiCommand, AuthRequirement, CommandRunner, HttpMethod, RequestBody, TokenSource,
};
use crate::domain::{ApiOutcome, FormSubmission};

/// Why a command could not be turned into a request URL.
#[derive(Debug, Error, PartialEq, Eq)]
enum EndpointError {
    #[error(transparent)]
    Parse(#[from] url::ParseError),
    #[error("base URL `{0}` cannot carry path segments")]
    CannotBeABase(String),
    #[error("path segment `{0}` is not a resource name")]
    DotSegment(String),
}

/// Command runner issuing real HTTP requests against one backend.
pub struct HttpCommandRunner {
    client: Client,
    base: Url,
    tokens: Arc<dyn TokenSource>,
}

impl HttpCommandRunner {
    /// Build a runner using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        timeout: Duration,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            tokens,
        })
    }

    fn endpoint(&self, command: &ApiCommand) -> Result<Url, EndpointError> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            command.path.trim_start_matches('/')
        ))?;
        if let Some(dot) = command
            .segments
            .iter()
            .find(|segment| matches!(segment.as_str(), "." | ".."))
        {
            return Err(EndpointError::DotSegment(dot.clone()));
        }
        if !command.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| EndpointError::CannotBeABase(self.base.to_string()))?
                .pop_if_empty()
                .extend(&command.segments);
        }
        if !command.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&command.query);
        }
        Ok(url)
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn with_credentials(request: RequestBuilder, auth: AuthRequirement, token: &str) -> RequestBuilder {
    match auth {
        AuthRequirement::Anonymous => request,
        AuthRequirement::Bearer => request.bearer_auth(token),
        AuthRequirement::SessionCookie => request.header(COOKIE, format!("access_token={token}")),
    }
}

fn multipart_form(submission: &FormSubmission) -> Result<Form, reqwest::Error> {
    let (fields, files) = submission.multipart_parts();
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }
    for (name, upload) in files {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        form = form.part(name, part);
    }
    Ok(form)
}

fn with_body(request: RequestBuilder, body: &RequestBody) -> Result<RequestBuilder, reqwest::Error> {
    Ok(match body {
        RequestBody::Empty => request,
        RequestBody::UrlEncoded(pairs) => request.form(pairs),
        RequestBody::Multipart(submission) => request.multipart(multipart_form(submission)?),
        RequestBody::Json(document) => request.json(document),
    })
}

fn transport_message(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    }
}

#[async_trait]
impl CommandRunner for HttpCommandRunner {
    async fn execute(&self, command: &ApiCommand) -> ApiOutcome {
        let token = if command.auth.needs_token() {
            let Some(token) = self.tokens.access_token() else {
                warn!(path = %command.path, "no session token; not issuing request");
                return ApiOutcome::SessionExpired;
            };
            token
        } else {
            String::new()
        };

        let url = match self.endpoint(command) {
            Ok(url) => url,
            Err(error) => return ApiOutcome::network(format!("invalid request URL: {error}")),
        };
        let request = with_credentials(
            self.client.request(method(command.method), url),
            command.auth,
            &token,
        );
        let request = match with_body(request, &command.body) {
            Ok(request) => request,
            Err(error) => return ApiOutcome::network(transport_message(&error)),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(method = %command.method, path = %command.path, %error, "request failed");
                return ApiOutcome::network(transport_message(&error));
            }
        };
        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(error) => return ApiOutcome::network(transport_message(&error)),
        };
        debug!(
            method = %command.method,
            path = %command.path,
            status = status.as_u16(),
            "response received"
        );
        classify_response(status, body.as_ref())
    }
}
