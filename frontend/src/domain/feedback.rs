//! User feedback and view synchronisation after an operation.
//!
//! Every reported outcome produces exactly one [`Notice`] followed by the
//! smallest view change that reflects it. Intermediate steps built with
//! [`OperationFeedback::failures_only`] stay silent on success.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::ports::{Notifier, ViewSurface};
use super::validation::ValidationError;
use super::{ActionOutcome, ApiOutcome, DetailKind, DomainFailure};

/// Route the user is sent to when the session is no longer valid.
pub const LOGIN_ROUTE: &str = "/login";

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Operation completed.
    Success,
    /// Nothing went wrong but the user should know something.
    Info,
    /// The user must act, for example sign in again.
    Warning,
    /// Operation failed.
    Error,
}

/// One notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Heading.
    pub title: String,
    /// Body text.
    pub message: String,
}

impl Notice {
    /// Build a notice of any kind.
    pub fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Success notice.
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, message)
    }

    /// Informational notice.
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, message)
    }

    /// Warning notice.
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, title, message)
    }

    /// Error notice.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title, message)
    }
}

/// View change applied after a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewTransition {
    /// Leave the page as it is.
    Stay,
    /// Reload the whole view.
    Reload,
    /// Remove the row with this element id, reloading when it is absent.
    RemoveRow(String),
    /// Navigate to a route.
    Redirect(String),
}

/// Feedback plan of one operation.
///
/// # Examples
/// ```
/// use frontend::domain::{DetailKind, Notice, OperationFeedback, ViewTransition};
///
/// let plan = OperationFeedback::new(
///     Notice::success("Registrado", "Asistencia registrada."),
///     ViewTransition::Reload,
/// )
/// .on_detail(
///     DetailKind::DuplicateEntry,
///     Notice::info("Ya registrado", "La asistencia ya fue registrada."),
/// );
/// assert_eq!(plan.transition(), &ViewTransition::Reload);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFeedback {
    success: Option<Notice>,
    transition: ViewTransition,
    failure_title: String,
    failure_text: FailureText,
    detail_notices: Vec<(DetailKind, Notice)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FailureText {
    Detail,
    Prefixed(String),
    Fixed(String),
}

impl OperationFeedback {
    /// Plan showing `success` and then applying `transition`.
    pub fn new(success: Notice, transition: ViewTransition) -> Self {
        Self {
            success: Some(success),
            transition,
            failure_title: "Error".to_owned(),
            failure_text: FailureText::Detail,
            detail_notices: Vec::new(),
        }
    }

    /// Plan for an intermediate step such as a lookup: success shows nothing
    /// and leaves the view alone, failures are reported as usual.
    pub fn failures_only() -> Self {
        Self {
            success: None,
            transition: ViewTransition::Stay,
            failure_title: "Error".to_owned(),
            failure_text: FailureText::Detail,
            detail_notices: Vec::new(),
        }
    }

    /// Heading of the generic failure notice.
    #[must_use]
    pub fn with_failure_title(mut self, title: impl Into<String>) -> Self {
        self.failure_title = title.into();
        self
    }

    /// Render generic failures as `"{prefix}: {detail}"`.
    #[must_use]
    pub fn with_failure_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.failure_text = FailureText::Prefixed(prefix.into());
        self
    }

    /// Render generic failures with a fixed message, ignoring the detail.
    #[must_use]
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_text = FailureText::Fixed(message.into());
        self
    }

    /// Dedicated notice for a classified backend detail.
    #[must_use]
    pub fn on_detail(mut self, kind: DetailKind, notice: Notice) -> Self {
        self.detail_notices.push((kind, notice));
        self
    }

    /// Transition applied on success.
    pub fn transition(&self) -> &ViewTransition {
        &self.transition
    }

    fn failure_notice(&self, failure: &DomainFailure) -> Notice {
        self.detail_notices
            .iter()
            .find(|(kind, _)| *kind == failure.kind && failure.kind != DetailKind::Unclassified)
            .map(|(_, notice)| notice.clone())
            .unwrap_or_else(|| {
                Notice::error(self.failure_title.clone(), self.failure_text(failure))
            })
    }

    fn failure_text(&self, failure: &DomainFailure) -> String {
        let detail = if failure.detail.trim().is_empty() {
            "Ocurrió un error inesperado."
        } else {
            failure.detail.as_str()
        };
        match &self.failure_text {
            FailureText::Detail => detail.to_owned(),
            FailureText::Prefixed(prefix) => format!("{prefix}: {detail}"),
            FailureText::Fixed(message) => message.clone(),
        }
    }
}

/// Renders outcomes through the notifier and updates the view.
#[derive(Clone)]
pub struct FeedbackReporter {
    notifier: Arc<dyn Notifier>,
    surface: Arc<dyn ViewSurface>,
}

impl FeedbackReporter {
    /// Reporter writing to `notifier` and mutating `surface`.
    pub fn new(notifier: Arc<dyn Notifier>, surface: Arc<dyn ViewSurface>) -> Self {
        Self { notifier, surface }
    }

    /// Show the single notice for `outcome` and apply the matching transition.
    pub fn report(&self, outcome: &ApiOutcome, plan: &OperationFeedback) -> ActionOutcome {
        match outcome {
            ApiOutcome::Success(_) => {
                if let Some(notice) = &plan.success {
                    self.notifier.show(notice);
                }
                self.apply(&plan.transition);
                ActionOutcome::Completed
            }
            ApiOutcome::DomainError(failure) => {
                warn!(
                    status = failure.status,
                    kind = ?failure.kind,
                    detail = %failure.detail,
                    "backend rejected operation"
                );
                self.notifier.show(&plan.failure_notice(failure));
                if let Some(route) = &failure.redirect {
                    self.surface.redirect(route);
                }
                ActionOutcome::Rejected(failure.kind)
            }
            ApiOutcome::SessionExpired => {
                info!("session expired; redirecting to login");
                self.notifier.show(&Notice::warning(
                    "Sesión expirada",
                    "Tu sesión ha expirado. Por favor, inicia sesión nuevamente.",
                ));
                self.surface.redirect(LOGIN_ROUTE);
                ActionOutcome::SessionExpired
            }
            ApiOutcome::NetworkError { message } => {
                warn!(%message, "backend unreachable");
                self.notifier.show(&Notice::error(
                    "Error de red",
                    "No se pudo conectar con el servidor. Inténtalo de nuevo.",
                ));
                ActionOutcome::NetworkFailure
            }
        }
    }

    /// Report a failed local validation without touching the network.
    pub fn reject_input(&self, error: ValidationError) -> ActionOutcome {
        debug!(%error, "validation failed");
        if let Some(field) = error.field() {
            if self.surface.has_element(field) {
                self.surface.mark_field_error(field, &error.to_string());
            }
        }
        self.notifier
            .show(&Notice::warning(error.title(), error.to_string()));
        ActionOutcome::Invalid(error)
    }

    fn apply(&self, transition: &ViewTransition) {
        match transition {
            ViewTransition::Stay => {}
            ViewTransition::Reload => self.surface.reload(),
            ViewTransition::RemoveRow(id) => {
                if !self.surface.remove_row(id) {
                    debug!(row = %id, "row not rendered; reloading instead");
                    self.surface.reload();
                }
            }
            ViewTransition::Redirect(route) => self.surface.redirect(route),
        }
    }
}
