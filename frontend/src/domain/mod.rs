//! Domain layer of the portal front end.
//!
//! Purpose: hold the validation rules, submission model and action
//! orchestration that every page shares. Nothing here touches the network,
//! the terminal or a real document; those live behind the traits in
//! [`ports`].
//!
//! Public surface:
//! - FormSubmission / FileUpload: captured form values.
//! - ApiOutcome / DomainFailure / DetailKind: classified backend results.
//! - ConfirmPrompt / DialogAnswer: destructive-action confirmation.
//! - Notice / OperationFeedback / FeedbackReporter: user feedback and view
//!   transitions.
//! - FormView / FormKind / InFlight: per-form view bindings.
//! - PortalActions: every user-triggered operation.

pub mod actions;
pub mod binding;
pub mod confirmation;
pub mod feedback;
pub mod outcome;
pub mod ports;
pub mod submission;
pub mod validation;

pub use self::actions::{
    ActionOutcome, Attendee, OrganizerDeleteRoute, PortalActions, PortalPorts, Reaction,
};
pub use self::binding::{BindingError, FormKind, FormView, InFlight};
pub use self::confirmation::{ConfirmPrompt, DialogAnswer};
pub use self::feedback::{
    FeedbackReporter, Notice, NoticeKind, OperationFeedback, ViewTransition,
};
pub use self::outcome::{ApiOutcome, DetailKind, DomainFailure};
pub use self::submission::{CONFIRM_PASSWORD_FIELD, FileUpload, FormSubmission};
