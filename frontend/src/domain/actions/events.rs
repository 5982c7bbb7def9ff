//! Event pages: deletion, editing, reactions, companions, staff assignment,
//! attendance and recognition settings.

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use super::{ActionOutcome, PortalActions};
use crate::domain::binding::{
    AttendanceForm, CompanionForm, EventEditForm, EventImageForm, FormView, InFlight,
    SettingsForm, StaffAssignmentForm,
};
use crate::domain::feedback::{Notice, OperationFeedback, ViewTransition};
use crate::domain::ports::{ApiCommand, AuthRequirement, RequestBody};
use crate::domain::validation::{ValidationError, validate_event_edit, validate_settings};
use crate::domain::{ApiOutcome, ConfirmPrompt, DetailKind, DomainFailure};

const CONFIRM_TITLE: &str = "¿Estás seguro?";

/// Reaction sent by the like/dislike buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Thumbs up.
    Like,
    /// Thumbs down.
    Dislike,
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Like => f.write_str("like"),
            Self::Dislike => f.write_str("dislike"),
        }
    }
}

/// Who attendance is recorded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attendee {
    /// Assistant id already known to the page.
    Known(u64),
    /// Look the assistant up by the id number typed in the attendance form.
    ByIdNumber(FormView<AttendanceForm>),
}

/// Assistant returned by the id-number lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct AssistantRef {
    pub(super) id: String,
    pub(super) full_name: String,
}

impl AssistantRef {
    fn from_payload(payload: &Value) -> Option<Self> {
        let id = match payload.get("id")? {
            Value::Number(number) => number.to_string(),
            Value::String(text) if !text.trim().is_empty() => text.clone(),
            _ => return None,
        };
        let name_part = |key: &str| payload.get(key).and_then(Value::as_str).unwrap_or_default();
        let full_name = format!("{} {}", name_part("first_name"), name_part("last_name"))
            .trim()
            .to_owned();
        Some(Self { id, full_name })
    }
}

fn event_row(event_id: u64) -> String {
    format!("event-{event_id}")
}

fn companion_added_message(full_name: &str) -> String {
    if full_name.is_empty() {
        "Acompañante añadido al evento con éxito.".to_owned()
    } else {
        format!("{full_name} fue añadido al evento con éxito.")
    }
}

fn has_id(payload: &Value) -> bool {
    payload.get("id").is_some_and(|id| !id.is_null())
}

/// Treat a 2xx body carrying a `detail` string as a rejection.
fn detail_in_success(outcome: ApiOutcome) -> ApiOutcome {
    match outcome {
        ApiOutcome::Success(payload) => match payload.get("detail").and_then(Value::as_str) {
            Some(detail) => ApiOutcome::DomainError(DomainFailure::new(200, detail)),
            None => ApiOutcome::Success(payload),
        },
        other => other,
    }
}

impl PortalActions {
    /// Delete an event after confirmation.
    pub async fn delete_event(&self, event_id: u64) -> ActionOutcome {
        let prompt = ConfirmPrompt::destructive(
            CONFIRM_TITLE,
            "¿Estás seguro de que deseas eliminar este evento?",
        );
        let command = ApiCommand::delete(format!("/events/{event_id}"));
        let plan = OperationFeedback::new(
            Notice::success("Evento eliminado", "Evento eliminado con éxito"),
            ViewTransition::RemoveRow(event_row(event_id)),
        )
        .with_failure_title("Error al eliminar el evento");
        self.confirm_then_execute(&prompt, &command, &plan).await
    }

    /// Delete one date of an event after confirmation.
    pub async fn delete_event_date(&self, date_id: u64) -> ActionOutcome {
        let prompt = ConfirmPrompt::destructive(
            CONFIRM_TITLE,
            "¿Estás seguro de que deseas eliminar esta fecha?",
        );
        let command = ApiCommand::delete(format!("/events/date/{date_id}"));
        let plan = OperationFeedback::new(
            Notice::success("Fecha eliminada", "Fecha eliminada con éxito"),
            ViewTransition::RemoveRow(format!("date-{date_id}")),
        )
        .with_failure_title("Error al eliminar la fecha");
        self.confirm_then_execute(&prompt, &command, &plan).await
    }

    /// Save the event details form as JSON.
    pub async fn edit_event(&self, view: &FormView<EventEditForm>, event_id: u64) -> ActionOutcome {
        let form = view.read(self.surface());
        let command = ApiCommand::patch(format!("/events/{event_id}"))
            .with_body(RequestBody::Json(form.to_json()));
        let plan = OperationFeedback::new(
            Notice::success("Evento editado", "Evento editado con éxito"),
            ViewTransition::Reload,
        )
        .with_failure_message("Error al editar el evento");
        self.guarded_submit(
            view.submit_control(),
            validate_event_edit(&form),
            &command,
            &plan,
        )
        .await
    }

    /// Upload a new cover image for an event.
    pub async fn edit_event_image(
        &self,
        view: &FormView<EventImageForm>,
        event_id: u64,
    ) -> ActionOutcome {
        let form = view.read(self.surface());
        let validation = match form.file("image") {
            Some(_) => Ok(()),
            None => Err(ValidationError::MissingFile {
                field: "image".to_owned(),
            }),
        };
        let command = ApiCommand::patch(format!("/events/{event_id}/image"))
            .with_body(RequestBody::Multipart(form));
        let plan = OperationFeedback::new(
            Notice::success("Imagen editada", "Imagen del evento editada con éxito"),
            ViewTransition::Reload,
        )
        .with_failure_message("Error al editar la imagen del evento");
        self.guarded_submit(view.submit_control(), validation, &command, &plan)
            .await
    }

    /// Update the face-recognition model and threshold.
    pub async fn change_settings(&self, view: &FormView<SettingsForm>) -> ActionOutcome {
        let form = view.read(self.surface());
        let command = ApiCommand::patch("/organizer/change-settings")
            .with_query("model_name", form.value("model"))
            .with_query("threshold", form.value("threshold"));
        let plan = OperationFeedback::new(
            Notice::success("Configuración guardada", "Configuración guardada con éxito."),
            ViewTransition::Reload,
        )
        .with_failure_message("Error al guardar la configuración.");
        self.guarded_submit(
            view.submit_control(),
            validate_settings(&form),
            &command,
            &plan,
        )
        .await
    }

    /// Send a like or dislike and reload whatever the backend answers.
    pub async fn react_to_event(
        &self,
        user_id: u64,
        event_id: u64,
        reaction: Reaction,
    ) -> ActionOutcome {
        let command = ApiCommand::get(format!("/assistant/react/{user_id}/{event_id}"))
            .with_query("reaction", reaction.to_string());
        let outcome = self.runner.execute(&command).await;
        if outcome.is_success() {
            debug!(user_id, event_id, %reaction, "reaction recorded");
        } else {
            warn!(user_id, event_id, %reaction, ?outcome, "reaction call failed; reloading anyway");
        }
        self.surface.reload();
        ActionOutcome::Completed
    }

    /// Look up a companion by id number and register them for the event.
    pub async fn add_companion(&self, view: &FormView<CompanionForm>, event_id: u64) -> ActionOutcome {
        let form = view.read(self.surface());
        if form.is_blank("companion_id_number") {
            return self.feedback.reject_input(ValidationError::MissingRequired {
                field: "companion_id_number".to_owned(),
            });
        }
        let Some(_guard) = InFlight::acquire(self.surface(), view.submit_control()) else {
            return ActionOutcome::AlreadyInFlight;
        };

        let lookup_failure = OperationFeedback::failures_only()
            .with_failure_title("Error de búsqueda")
            .with_failure_message(
                "Ocurrió un error al añadir el acompañante. Revise si la identificación es correcta.",
            );
        let companion = match self
            .lookup_assistant(form.value("companion_id_number"), &lookup_failure)
            .await
        {
            Ok(companion) => companion,
            Err(outcome) => return outcome,
        };

        let command = ApiCommand::post(format!("/assistant/register-companion-to-event/{event_id}"))
            .with_auth(AuthRequirement::Bearer)
            .with_body(RequestBody::UrlEncoded(vec![
                ("companion_id".to_owned(), companion.id.clone()),
                ("companion_type".to_owned(), "first_grade".to_owned()),
            ]));
        let plan = OperationFeedback::new(
            Notice::success(
                "Acompañante añadido",
                companion_added_message(&companion.full_name),
            ),
            ViewTransition::Stay,
        )
        .with_failure_message("Ocurrió un error al añadir el acompañante al evento.");
        self.execute_and_report(&command, &plan).await
    }

    /// Assign the selected staff member to the event.
    pub async fn add_staff_to_event(
        &self,
        view: &FormView<StaffAssignmentForm>,
        event_id: u64,
    ) -> ActionOutcome {
        let form = view.read(self.surface());
        if form.is_blank("staff_id") {
            return self.feedback.reject_input(ValidationError::MissingRequired {
                field: "staff_id".to_owned(),
            });
        }
        let Some(_guard) = InFlight::acquire(self.surface(), view.submit_control()) else {
            return ActionOutcome::AlreadyInFlight;
        };

        let command = ApiCommand::post("/staff/add-staff-to-event").with_body(
            RequestBody::UrlEncoded(vec![
                ("staff_id".to_owned(), form.value("staff_id").to_owned()),
                ("event_id".to_owned(), event_id.to_string()),
            ]),
        );
        let plan = OperationFeedback::new(
            Notice::success(
                "Personal añadido",
                "Miembro del personal añadido al evento con éxito.",
            ),
            ViewTransition::Stay,
        )
        .with_failure_message("Error al añadir miembro del personal al evento.");

        let outcome = match self.runner.execute(&command).await {
            ApiOutcome::Success(payload) if !has_id(&payload) => {
                warn!(event_id, "staff assignment response carried no id");
                ApiOutcome::DomainError(DomainFailure::new(200, "response without id"))
            }
            other => other,
        };
        self.feedback.report(&outcome, &plan)
    }

    /// Record attendance for one event date and go back to the attendance
    /// list.
    pub async fn record_attendance(
        &self,
        event_id: u64,
        date_id: u64,
        attendee: Attendee,
    ) -> ActionOutcome {
        let (assistant_id, _in_flight) = match attendee {
            Attendee::Known(id) => (id.to_string(), None),
            Attendee::ByIdNumber(view) => {
                let form = view.read(self.surface());
                if form.is_blank("id_number") {
                    return self.feedback.reject_input(ValidationError::MissingRequired {
                        field: "id_number".to_owned(),
                    });
                }
                let Some(guard) = InFlight::acquire(self.surface(), view.submit_control()) else {
                    return ActionOutcome::AlreadyInFlight;
                };
                let lookup_failure = OperationFeedback::failures_only()
                    .with_failure_title("Error de búsqueda")
                    .with_failure_message(
                        "Ocurrió un error al buscar el asistente. Revise si la identificación es correcta.",
                    );
                match self
                    .lookup_assistant(form.value("id_number"), &lookup_failure)
                    .await
                {
                    Ok(assistant) => (assistant.id, Some(guard)),
                    Err(outcome) => return outcome,
                }
            }
        };

        let command = ApiCommand::post(format!("/events/add/attendance/{date_id}/{event_id}"))
            .with_segment(assistant_id);
        let plan = OperationFeedback::new(
            Notice::success("Asistencia registrada", "Asistencia registrada correctamente."),
            ViewTransition::Redirect(format!("/record-assistant/{event_id}/{date_id}")),
        )
        .on_detail(
            DetailKind::RegistrationNotFound,
            Notice::warning(
                "No registrado",
                "La persona no se encuentra registrada en el evento.",
            ),
        )
        .on_detail(
            DetailKind::DuplicateEntry,
            Notice::info(
                "Ya registrado",
                "La persona ya se encuentra registrada en el evento.",
            ),
        );
        let outcome = detail_in_success(self.runner.execute(&command).await);
        self.feedback.report(&outcome, &plan)
    }

    /// Resolve an id number to an assistant, reporting any failure with
    /// `failure`.
    pub(super) async fn lookup_assistant(
        &self,
        id_number: &str,
        failure: &OperationFeedback,
    ) -> Result<AssistantRef, ActionOutcome> {
        let command = ApiCommand::get("/assistant/get-by-id-number").with_segment(id_number);
        let outcome = self.runner.execute(&command).await;
        let resolved = outcome.payload().and_then(AssistantRef::from_payload);
        match (resolved, outcome) {
            (Some(assistant), _) => {
                debug!(assistant_id = %assistant.id, "assistant resolved");
                Ok(assistant)
            }
            (None, ApiOutcome::Success(_)) => Err(self.feedback.report(
                &ApiOutcome::DomainError(DomainFailure::new(200, "lookup without id")),
                failure,
            )),
            (None, other) => Err(self.feedback.report(&other, failure)),
        }
    }
}
