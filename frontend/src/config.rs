//! Portal configuration loaded via OrthoConfig.
//!
//! Values come from `PORTAL_*` environment variables or a configuration
//! file. Raw values are kept as loaded and parsed by the accessors, so a bad
//! value is reported once at startup with the offending key.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::OrganizerDeleteRoute;
use crate::domain::validation::{PassportPolicy, ValidationRules};
use crate::outbound::session::SessionCookie;
use crate::ui::FeedbackStyle;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_INSTITUTION_DOMAIN: &str = "udla.edu.ec";

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `api_url` is not an absolute URL.
    #[error("invalid api_url `{value}`: {source}")]
    InvalidApiUrl {
        /// Configured value.
        value: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// `feedback_style` is neither `native` nor `modal`.
    #[error("unknown feedback_style `{value}`; expected `native` or `modal`")]
    UnknownFeedbackStyle {
        /// Configured value.
        value: String,
    },
    /// `passport_policy` names no known policy.
    #[error(
        "unknown passport_policy `{value}`; expected `alphanumeric`, `numeric`, `flexible` or `legacy`"
    )]
    UnknownPassportPolicy {
        /// Configured value.
        value: String,
    },
    /// `organizer_delete_route` is neither `api` nor `credentialed`.
    #[error("unknown organizer_delete_route `{value}`; expected `api` or `credentialed`")]
    UnknownOrganizerDeleteRoute {
        /// Configured value.
        value: String,
    },
    /// `request_timeout_secs` is zero.
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Configuration values for the portal front end.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Backend base URL.
    pub api_url: Option<String>,
    /// `native` or `modal`.
    pub feedback_style: Option<String>,
    /// Accepted passport format.
    pub passport_policy: Option<String>,
    /// HTTP client timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// `api` or `credentialed`.
    pub organizer_delete_route: Option<String>,
    /// Email domain rejected for self-registration.
    pub institution_domain: Option<String>,
    /// Cookie string holding `access_token`.
    pub session_cookie: Option<String>,
}

impl PortalSettings {
    /// Backend base URL, falling back to the local development server.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let value = self.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        Url::parse(value).map_err(|source| ConfigError::InvalidApiUrl {
            value: value.to_owned(),
            source,
        })
    }

    /// Rendering style of notices and prompts.
    pub fn feedback_style(&self) -> Result<FeedbackStyle, ConfigError> {
        self.feedback_style.as_deref().map_or(Ok(FeedbackStyle::default()), |raw| {
            raw.parse()
                .map_err(|_| ConfigError::UnknownFeedbackStyle {
                    value: raw.to_owned(),
                })
        })
    }

    /// Accepted passport format.
    pub fn passport_policy(&self) -> Result<PassportPolicy, ConfigError> {
        self.passport_policy.as_deref().map_or(Ok(PassportPolicy::default()), |raw| {
            raw.parse()
                .map_err(|_| ConfigError::UnknownPassportPolicy {
                    value: raw.to_owned(),
                })
        })
    }

    /// HTTP client timeout.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => Err(ConfigError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Route used to delete organizers.
    pub fn organizer_delete_route(&self) -> Result<OrganizerDeleteRoute, ConfigError> {
        self.organizer_delete_route
            .as_deref()
            .map_or(Ok(OrganizerDeleteRoute::default()), |raw| {
                raw.parse()
                    .map_err(|_| ConfigError::UnknownOrganizerDeleteRoute {
                        value: raw.to_owned(),
                    })
            })
    }

    /// Email domain rejected for self-registration.
    pub fn institution_domain(&self) -> &str {
        self.institution_domain
            .as_deref()
            .unwrap_or(DEFAULT_INSTITUTION_DOMAIN)
    }

    /// Session credential, signed out when no cookie is configured.
    pub fn session(&self) -> SessionCookie {
        self.session_cookie
            .as_deref()
            .map_or_else(SessionCookie::signed_out, SessionCookie::from_cookie_header)
    }

    /// Validation policies for this deployment.
    pub fn validation_rules(&self) -> Result<ValidationRules, ConfigError> {
        Ok(ValidationRules::new(
            self.passport_policy()?,
            self.institution_domain(),
        ))
    }
}
