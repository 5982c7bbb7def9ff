//! User-triggered portal operations.
//!
//! Every operation follows the same sequence: validate the bound form,
//! confirm when the action is destructive, issue the command, then hand the
//! outcome to [`FeedbackReporter`]. Validation failures and declined prompts
//! never reach the [`CommandRunner`].

mod accounts;
mod events;
mod profile;

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use tracing::{debug, info};

use super::binding::InFlight;
use super::feedback::{FeedbackReporter, OperationFeedback};
use super::ports::{ApiCommand, CommandRunner, ConfirmationGateway, Notifier, ViewSurface};
use super::validation::{ValidationError, ValidationRules};
use super::{ConfirmPrompt, DetailKind};

pub use events::{Attendee, Reaction};

/// What became of one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The backend accepted the operation, or the form was handed over to
    /// native submission.
    Completed,
    /// Local validation blocked the submission.
    Invalid(ValidationError),
    /// The user declined the confirmation prompt.
    Cancelled,
    /// The backend rejected the operation.
    Rejected(DetailKind),
    /// The session token is missing or expired.
    SessionExpired,
    /// The backend could not be reached.
    NetworkFailure,
    /// The trigger was ignored because an earlier request is still running.
    AlreadyInFlight,
}

/// Route used to delete an organizer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrganizerDeleteRoute {
    /// `DELETE /organizer/{id}` on the REST backend.
    #[default]
    Api,
    /// `DELETE /delete-organizer/{id}` with the session cookie.
    Credentialed,
}

impl FromStr for OrganizerDeleteRoute {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "credentialed" => Ok(Self::Credentialed),
            other => Err(other.to_owned()),
        }
    }
}

/// Collaborators required by [`PortalActions`].
#[derive(Clone)]
pub struct PortalPorts {
    /// Backend command runner.
    pub runner: Arc<dyn CommandRunner>,
    /// Destructive-action prompt.
    pub confirmation: Arc<dyn ConfirmationGateway>,
    /// Notification display.
    pub notifier: Arc<dyn Notifier>,
    /// Rendered page.
    pub surface: Arc<dyn ViewSurface>,
    /// Source of "today" for date-of-birth checks.
    pub clock: Arc<dyn Clock>,
}

/// Orchestrates every portal operation.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use frontend::domain::ports::{
///     FixtureCommandRunner, FixtureConfirmationGateway, FixtureNotifier,
/// };
/// use frontend::domain::{PortalActions, PortalPorts};
/// use frontend::ui::HeadlessView;
/// use mockable::DefaultClock;
///
/// # async fn demo() {
/// let actions = PortalActions::new(PortalPorts {
///     runner: Arc::new(FixtureCommandRunner::default()),
///     confirmation: Arc::new(FixtureConfirmationGateway::default()),
///     notifier: Arc::new(FixtureNotifier::default()),
///     surface: Arc::new(HeadlessView::default()),
///     clock: Arc::new(DefaultClock),
/// });
/// actions.delete_event(7).await;
/// # }
/// ```
#[derive(Clone)]
pub struct PortalActions {
    runner: Arc<dyn CommandRunner>,
    confirmation: Arc<dyn ConfirmationGateway>,
    feedback: FeedbackReporter,
    surface: Arc<dyn ViewSurface>,
    clock: Arc<dyn Clock>,
    rules: ValidationRules,
    organizer_delete_route: OrganizerDeleteRoute,
}

impl PortalActions {
    /// Build the service with default validation rules.
    pub fn new(ports: PortalPorts) -> Self {
        Self {
            feedback: FeedbackReporter::new(ports.notifier, Arc::clone(&ports.surface)),
            runner: ports.runner,
            confirmation: ports.confirmation,
            surface: ports.surface,
            clock: ports.clock,
            rules: ValidationRules::default(),
            organizer_delete_route: OrganizerDeleteRoute::default(),
        }
    }

    /// Replace the validation policies.
    #[must_use]
    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    /// Choose the organizer deletion route.
    #[must_use]
    pub fn with_organizer_delete_route(mut self, route: OrganizerDeleteRoute) -> Self {
        self.organizer_delete_route = route;
        self
    }

    /// Page the actions operate on.
    pub fn surface(&self) -> &dyn ViewSurface {
        self.surface.as_ref()
    }

    fn today(&self) -> NaiveDate {
        self.clock.local().date_naive()
    }

    async fn confirm_then_execute(
        &self,
        prompt: &ConfirmPrompt,
        command: &ApiCommand,
        plan: &OperationFeedback,
    ) -> ActionOutcome {
        if !self.confirmation.confirm(prompt).await {
            info!(path = %command.path, "destructive action declined");
            return ActionOutcome::Cancelled;
        }
        self.execute_and_report(command, plan).await
    }

    async fn execute_and_report(
        &self,
        command: &ApiCommand,
        plan: &OperationFeedback,
    ) -> ActionOutcome {
        debug!(method = %command.method, path = %command.path, "issuing command");
        let outcome = self.runner.execute(command).await;
        self.feedback.report(&outcome, plan)
    }

    /// Validate, then submit while `control` is disabled.
    async fn guarded_submit(
        &self,
        control: &'static str,
        validation: Result<(), ValidationError>,
        command: &ApiCommand,
        plan: &OperationFeedback,
    ) -> ActionOutcome {
        if let Err(error) = validation {
            return self.feedback.reject_input(error);
        }
        let Some(_guard) = InFlight::acquire(self.surface.as_ref(), control) else {
            return ActionOutcome::AlreadyInFlight;
        };
        self.execute_and_report(command, plan).await
    }

    /// Validate, then let the page submit the form itself.
    fn native_submit(&self, form_id: &str, validation: Result<(), ValidationError>) -> ActionOutcome {
        match validation {
            Ok(()) => {
                debug!(form = form_id, "handing form to native submission");
                self.surface.submit_native(form_id);
                ActionOutcome::Completed
            }
            Err(error) => self.feedback.reject_input(error),
        }
    }
}

#[cfg(test)]
mod tests;
