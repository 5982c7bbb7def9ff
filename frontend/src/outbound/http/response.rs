//! Classification of backend responses.

use reqwest::StatusCode;
use serde_json::Value;

use crate::domain::{ApiOutcome, DomainFailure};

/// Turn a status and raw body into an [`ApiOutcome`].
///
/// `401` always means the session expired, whatever the body says. Other
/// non-2xx responses become domain failures whose detail is taken from the
/// body's `detail` key, then its `error` key, then the raw text, then the
/// status line.
///
/// # Examples
/// ```
/// use frontend::domain::{ApiOutcome, DetailKind};
/// use frontend::outbound::http::classify_response;
/// use reqwest::StatusCode;
///
/// let outcome = classify_response(StatusCode::NOT_FOUND, br#"{"detail":"Registration not found"}"#);
/// let ApiOutcome::DomainError(failure) = outcome else { panic!("domain error expected") };
/// assert_eq!(failure.kind, DetailKind::RegistrationNotFound);
/// ```
pub fn classify_response(status: StatusCode, body: &[u8]) -> ApiOutcome {
    if status == StatusCode::UNAUTHORIZED {
        return ApiOutcome::SessionExpired;
    }
    let parsed = serde_json::from_slice::<Value>(body).ok();
    if status.is_success() {
        return ApiOutcome::Success(success_payload(parsed, &String::from_utf8_lossy(body)));
    }
    let detail = parsed
        .as_ref()
        .and_then(error_detail)
        .or_else(|| {
            std::str::from_utf8(body)
                .ok()
                .map(str::trim)
                .filter(|raw| !raw.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| status_line(status));
    let failure = DomainFailure::new(status.as_u16(), detail);
    let redirect = parsed
        .as_ref()
        .and_then(|value| value.get("redirect"))
        .and_then(Value::as_str);
    ApiOutcome::DomainError(match redirect {
        Some(route) => failure.with_redirect(route),
        None => failure,
    })
}

fn success_payload(parsed: Option<Value>, text: &str) -> Value {
    match parsed {
        Some(value) => value,
        None if text.trim().is_empty() => Value::Null,
        None => Value::String(text.to_owned()),
    }
}

fn error_detail(body: &Value) -> Option<String> {
    match body.get("detail") {
        Some(Value::String(detail)) => Some(detail.clone()),
        Some(Value::Null) | None => body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_owned),
        Some(other) => Some(other.to_string()),
    }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}
