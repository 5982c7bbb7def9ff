//! Tests for the portal action orchestration.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::json;

use super::*;
use crate::domain::binding::{
    AttendanceForm, CompanionForm, EventEditForm, EventImageForm, FormView, OrganizerEditForm,
    ProfileForm, SettingsForm, SignupForm, StaffAssignmentForm, StaffCreationForm,
};
use crate::domain::ports::{
    AuthRequirement, FixtureCommandRunner, FixtureConfirmationGateway, FixtureNotifier,
    HttpMethod, MockCommandRunner, MockConfirmationGateway, RequestBody, ViewSurface,
};
use crate::domain::validation::{ProfileField, ValidationError};
use crate::domain::{ApiOutcome, DetailKind, DialogAnswer, DomainFailure, FileUpload, NoticeKind};
use crate::ui::{HeadlessView, Navigation};

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }
}

struct Harness {
    actions: PortalActions,
    notifier: Arc<FixtureNotifier>,
    view: Arc<HeadlessView>,
}

fn harness(
    runner: Arc<dyn CommandRunner>,
    confirmation: Arc<dyn ConfirmationGateway>,
    view: HeadlessView,
) -> Harness {
    let notifier = Arc::new(FixtureNotifier::default());
    let view = Arc::new(view);
    let actions = PortalActions::new(PortalPorts {
        runner,
        confirmation,
        notifier: notifier.clone(),
        surface: view.clone(),
        clock: Arc::new(FixtureClock),
    });
    Harness {
        actions,
        notifier,
        view,
    }
}

fn confirming(answer: DialogAnswer) -> Arc<FixtureConfirmationGateway> {
    Arc::new(FixtureConfirmationGateway::answering([answer]))
}

fn signup_view() -> HeadlessView {
    HeadlessView::builder()
        .form::<SignupForm>()
        .field("first_name", "Ada")
        .field("last_name", "Lovelace")
        .field("id_number", "1710034065")
        .field("id_number_type", "cedula")
        .field("phone", "0991234567")
        .field("gender", "female")
        .field("date_of_birth", "1999-12-10")
        .field("email", "ada@gmail.com")
        .field("password", "Abc12345!")
        .field("confirm_password", "Abc12345!")
        .field("accepted_terms", "on")
        .file("image", FileUpload::new("ada.png", "image/png", vec![0x89, 0x50]))
        .build()
}

#[tokio::test]
async fn declined_confirmation_issues_no_call() {
    for answer in [
        DialogAnswer::Cancelled,
        DialogAnswer::Dismissed,
        DialogAnswer::ClickedOutside,
    ] {
        let mut runner = MockCommandRunner::new();
        runner.expect_execute().never();
        let h = harness(
            Arc::new(runner),
            confirming(answer),
            HeadlessView::builder().row("event-7").build(),
        );

        assert_eq!(h.actions.delete_event(7).await, ActionOutcome::Cancelled);
        assert!(h.notifier.shown().is_empty());
        assert!(h.view.has_row("event-7"));
    }
}

#[tokio::test]
async fn confirmed_delete_removes_only_the_row() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_execute()
        .withf(|command| command.method == HttpMethod::Delete && command.path == "/events/7")
        .times(1)
        .returning(|_| ApiOutcome::Success(json!({"message": "ok"})));
    let h = harness(
        Arc::new(runner),
        confirming(DialogAnswer::Affirmed),
        HeadlessView::builder().row("event-7").row("event-8").build(),
    );

    assert_eq!(h.actions.delete_event(7).await, ActionOutcome::Completed);
    assert!(!h.view.has_row("event-7"));
    assert!(h.view.has_row("event-8"));
    assert!(h.view.navigation().is_empty());
    let shown = h.notifier.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown.first().map(|notice| notice.kind), Some(NoticeKind::Success));
}

#[tokio::test]
async fn delete_without_rendered_row_reloads() {
    let runner = Arc::new(FixtureCommandRunner::default());
    let h = harness(runner, confirming(DialogAnswer::Affirmed), HeadlessView::default());

    assert_eq!(h.actions.delete_event_date(4).await, ActionOutcome::Completed);
    assert_eq!(h.view.navigation(), vec![Navigation::Reload]);
}

#[tokio::test]
async fn staff_rejection_follows_backend_redirect() {
    let runner = Arc::new(FixtureCommandRunner::scripted([ApiOutcome::DomainError(
        DomainFailure::new(403, "No autorizado").with_redirect("/login-staff"),
    )]));
    let h = harness(
        runner.clone(),
        confirming(DialogAnswer::Affirmed),
        HeadlessView::builder().row("staff-3").build(),
    );

    assert_eq!(
        h.actions.delete_staff(3).await,
        ActionOutcome::Rejected(DetailKind::Unclassified)
    );
    let issued = runner.issued();
    assert_eq!(issued.len(), 1);
    assert_eq!(
        issued.first().map(|command| command.auth),
        Some(AuthRequirement::SessionCookie)
    );
    assert!(h.view.has_row("staff-3"));
    assert_eq!(
        h.view.navigation(),
        vec![Navigation::Redirect("/login-staff".to_owned())]
    );
}

#[tokio::test]
async fn organizer_deletion_uses_the_configured_route() {
    let runner = Arc::new(FixtureCommandRunner::default());
    let h = harness(
        runner.clone(),
        Arc::new(FixtureConfirmationGateway::answering([
            DialogAnswer::Affirmed,
            DialogAnswer::Affirmed,
        ])),
        HeadlessView::builder().row("organizer-2").row("organizer-5").build(),
    );
    let credentialed = h
        .actions
        .clone()
        .with_organizer_delete_route(OrganizerDeleteRoute::Credentialed);

    h.actions.delete_organizer(2).await;
    credentialed.delete_organizer(5).await;

    let paths: Vec<_> = runner
        .issued()
        .into_iter()
        .map(|command| (command.path, command.auth))
        .collect();
    assert_eq!(
        paths,
        vec![
            ("/organizer/2".to_owned(), AuthRequirement::Anonymous),
            (
                "/delete-organizer/5".to_owned(),
                AuthRequirement::SessionCookie
            ),
        ]
    );
}

#[tokio::test]
async fn invalid_signup_never_reaches_the_network() {
    let mut runner = MockCommandRunner::new();
    runner.expect_execute().never();
    let view = signup_view();
    view.set_field("email", "ada@udla.edu.ec");
    let h = harness(Arc::new(runner), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<SignupForm>::bind(h.view.as_ref()).expect("signup form bound");

    let outcome = h.actions.signup(&form).await;
    assert!(matches!(
        outcome,
        ActionOutcome::Invalid(ValidationError::InstitutionalEmail { .. })
    ));
    assert!(h.view.field_error("email").is_some());
    assert_eq!(h.notifier.shown().len(), 1);
}

#[tokio::test]
async fn signup_sends_multipart_without_confirmation_and_redirects() {
    let runner = Arc::new(FixtureCommandRunner::default());
    let h = harness(
        runner.clone(),
        Arc::new(MockConfirmationGateway::new()),
        signup_view(),
    );
    let form = FormView::<SignupForm>::bind(h.view.as_ref()).expect("signup form bound");

    assert_eq!(h.actions.signup(&form).await, ActionOutcome::Completed);

    let issued = runner.issued();
    let Some(command) = issued.first() else {
        panic!("signup issued no command");
    };
    assert_eq!(command.path, "/assistant/add");
    let RequestBody::Multipart(submission) = &command.body else {
        panic!("signup must be multipart, got {:?}", command.body);
    };
    let (text, files) = submission.multipart_parts();
    assert!(text.iter().all(|(name, _)| name != "confirm_password"));
    assert_eq!(files.len(), 1);
    assert_eq!(
        h.view.navigation(),
        vec![Navigation::Redirect("/login".to_owned())]
    );
    assert!(h.view.is_control_enabled("signup-submit"));
}

#[tokio::test]
async fn signup_face_rejection_gets_dedicated_message() {
    let runner = Arc::new(FixtureCommandRunner::scripted([ApiOutcome::domain(
        400,
        "Face could not be detected. Please confirm that the picture is a face photo",
    )]));
    let h = harness(runner, Arc::new(MockConfirmationGateway::new()), signup_view());
    let form = FormView::<SignupForm>::bind(h.view.as_ref()).expect("signup form bound");

    assert_eq!(
        h.actions.signup(&form).await,
        ActionOutcome::Rejected(DetailKind::FaceNotDetected)
    );
    let shown = h.notifier.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(
        shown.first().map(|notice| notice.title.as_str()),
        Some("Rostro no detectado")
    );
    assert!(h.view.navigation().is_empty());
}

#[tokio::test]
async fn duplicate_attendance_is_informational_and_stays() {
    let runner = Arc::new(FixtureCommandRunner::scripted([ApiOutcome::domain(
        400,
        "(1062, \"Duplicate entry '5-3' for key 'PRIMARY'\")",
    )]));
    let h = harness(runner.clone(), Arc::new(MockConfirmationGateway::new()), HeadlessView::default());

    let outcome = h.actions.record_attendance(5, 1, Attendee::Known(3)).await;
    assert_eq!(outcome, ActionOutcome::Rejected(DetailKind::DuplicateEntry));
    assert_eq!(
        runner
            .issued()
            .first()
            .map(|command| (command.path.clone(), command.segments.clone())),
        Some(("/events/add/attendance/1/5".to_owned(), vec!["3".to_owned()]))
    );
    let shown = h.notifier.shown();
    assert_eq!(shown.first().map(|notice| notice.kind), Some(NoticeKind::Info));
    assert!(h.view.navigation().is_empty());
}

#[tokio::test]
async fn missing_registration_is_a_warning() {
    let runner = Arc::new(FixtureCommandRunner::scripted([ApiOutcome::Success(
        json!({"detail": "Registration not found"}),
    )]));
    let h = harness(runner, Arc::new(MockConfirmationGateway::new()), HeadlessView::default());

    let outcome = h.actions.record_attendance(5, 1, Attendee::Known(3)).await;
    assert_eq!(outcome, ActionOutcome::Rejected(DetailKind::RegistrationNotFound));
    assert_eq!(
        h.notifier.shown().first().map(|notice| notice.kind),
        Some(NoticeKind::Warning)
    );
}

#[tokio::test]
async fn attendance_by_id_number_looks_up_then_redirects() {
    let runner = Arc::new(FixtureCommandRunner::scripted([
        ApiOutcome::Success(json!({"id": 42, "first_name": "Ada", "last_name": "Lovelace"})),
        ApiOutcome::Success(json!({"id": 1})),
    ]));
    let view = HeadlessView::builder()
        .form::<AttendanceForm>()
        .field("id_number", "1710034065")
        .build();
    let h = harness(runner.clone(), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<AttendanceForm>::bind(h.view.as_ref()).expect("attendance form bound");

    let outcome = h
        .actions
        .record_attendance(5, 1, Attendee::ByIdNumber(form))
        .await;
    assert_eq!(outcome, ActionOutcome::Completed);
    let paths: Vec<_> = runner
        .issued()
        .into_iter()
        .map(|command| (command.path, command.segments))
        .collect();
    assert_eq!(
        paths,
        vec![
            (
                "/assistant/get-by-id-number".to_owned(),
                vec!["1710034065".to_owned()]
            ),
            (
                "/events/add/attendance/1/5".to_owned(),
                vec!["42".to_owned()]
            ),
        ]
    );
    assert_eq!(
        h.view.navigation(),
        vec![Navigation::Redirect("/record-assistant/5/1".to_owned())]
    );
}

#[tokio::test]
async fn failed_companion_lookup_stops_with_one_notice() {
    let runner = Arc::new(FixtureCommandRunner::scripted([ApiOutcome::domain(
        404,
        "Assistant not found",
    )]));
    let view = HeadlessView::builder()
        .form::<CompanionForm>()
        .field("companion_id_number", "0926687856")
        .build();
    let h = harness(runner.clone(), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<CompanionForm>::bind(h.view.as_ref()).expect("companion form bound");

    let outcome = h.actions.add_companion(&form, 9).await;
    assert_eq!(outcome, ActionOutcome::Rejected(DetailKind::Unclassified));
    assert_eq!(runner.issued().len(), 1);
    let shown = h.notifier.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(
        shown.first().map(|notice| notice.title.as_str()),
        Some("Error de búsqueda")
    );
    assert!(h.view.is_control_enabled("companion-submit"));
}

#[tokio::test]
async fn companion_registration_uses_bearer_and_names_the_companion() {
    let runner = Arc::new(FixtureCommandRunner::scripted([
        ApiOutcome::Success(json!({"id": 11, "first_name": "Grace", "last_name": "Hopper"})),
        ApiOutcome::Success(json!({"status": "ok"})),
    ]));
    let view = HeadlessView::builder()
        .form::<CompanionForm>()
        .field("companion_id_number", "0926687856")
        .build();
    let h = harness(runner.clone(), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<CompanionForm>::bind(h.view.as_ref()).expect("companion form bound");

    assert_eq!(h.actions.add_companion(&form, 9).await, ActionOutcome::Completed);
    let issued = runner.issued();
    let Some(register) = issued.get(1) else {
        panic!("registration call missing");
    };
    assert_eq!(register.path, "/assistant/register-companion-to-event/9");
    assert_eq!(register.auth, AuthRequirement::Bearer);
    assert_eq!(
        register.body,
        RequestBody::UrlEncoded(vec![
            ("companion_id".to_owned(), "11".to_owned()),
            ("companion_type".to_owned(), "first_grade".to_owned()),
        ])
    );
    let shown = h.notifier.shown();
    assert_eq!(shown.len(), 1);
    assert!(
        shown
            .first()
            .is_some_and(|notice| notice.message.contains("Grace Hopper"))
    );
}

#[tokio::test]
async fn staff_assignment_without_id_is_a_failure() {
    let runner = Arc::new(FixtureCommandRunner::scripted([ApiOutcome::Success(
        json!({"message": "queued"}),
    )]));
    let view = HeadlessView::builder()
        .form::<StaffAssignmentForm>()
        .field("staff_id", "3")
        .build();
    let h = harness(runner.clone(), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<StaffAssignmentForm>::bind(h.view.as_ref()).expect("form bound");

    let outcome = h.actions.add_staff_to_event(&form, 5).await;
    assert_eq!(outcome, ActionOutcome::Rejected(DetailKind::Unclassified));
    assert_eq!(
        runner.issued().first().map(|command| command.body.clone()),
        Some(RequestBody::UrlEncoded(vec![
            ("staff_id".to_owned(), "3".to_owned()),
            ("event_id".to_owned(), "5".to_owned()),
        ]))
    );
    assert_eq!(
        h.notifier.shown().first().map(|notice| notice.kind),
        Some(NoticeKind::Error)
    );
}

#[tokio::test]
async fn failed_reaction_still_reloads() {
    let runner = Arc::new(FixtureCommandRunner::scripted([ApiOutcome::network(
        "connection reset",
    )]));
    let h = harness(runner.clone(), Arc::new(MockConfirmationGateway::new()), HeadlessView::default());

    let outcome = h.actions.react_to_event(2, 8, Reaction::Dislike).await;
    assert_eq!(outcome, ActionOutcome::Completed);
    assert!(h.notifier.shown().is_empty());
    assert_eq!(h.view.navigation(), vec![Navigation::Reload]);
    assert_eq!(
        runner.issued().first().map(|command| command.query.clone()),
        Some(vec![("reaction".to_owned(), "dislike".to_owned())])
    );
}

#[tokio::test]
async fn settings_travel_as_query_parameters() {
    let runner = Arc::new(FixtureCommandRunner::default());
    let view = HeadlessView::builder()
        .form::<SettingsForm>()
        .field("model", "Facenet512")
        .field("threshold", "0.35")
        .build();
    let h = harness(runner.clone(), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<SettingsForm>::bind(h.view.as_ref()).expect("settings form bound");

    assert_eq!(h.actions.change_settings(&form).await, ActionOutcome::Completed);
    let issued = runner.issued();
    let command = issued.first().expect("settings command");
    assert_eq!(command.method, HttpMethod::Patch);
    assert_eq!(
        command.query,
        vec![
            ("model_name".to_owned(), "Facenet512".to_owned()),
            ("threshold".to_owned(), "0.35".to_owned()),
        ]
    );
    assert_eq!(h.view.navigation(), vec![Navigation::Reload]);
}

#[tokio::test]
async fn profile_update_drops_blank_fields() {
    let runner = Arc::new(FixtureCommandRunner::default());
    let view = HeadlessView::builder()
        .form::<ProfileForm>()
        .field("first_name", "Ada")
        .field("phone", "0991234567")
        .build();
    let h = harness(runner.clone(), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<ProfileForm>::bind(h.view.as_ref()).expect("profile form bound");

    assert_eq!(h.actions.update_profile(&form).await, ActionOutcome::Completed);
    let issued = runner.issued();
    let command = issued.first().expect("profile command");
    assert_eq!(command.auth, AuthRequirement::SessionCookie);
    let RequestBody::Multipart(submission) = &command.body else {
        panic!("profile update must be multipart");
    };
    assert_eq!(
        submission.field_names().collect::<Vec<_>>(),
        vec!["first_name", "phone"]
    );
}

#[tokio::test]
async fn second_trigger_while_in_flight_is_ignored() {
    let mut runner = MockCommandRunner::new();
    runner.expect_execute().never();
    let view = HeadlessView::builder()
        .form::<SettingsForm>()
        .field("model", "Facenet512")
        .field("threshold", "0.35")
        .build();
    let h = harness(Arc::new(runner), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<SettingsForm>::bind(h.view.as_ref()).expect("settings form bound");
    h.view.set_control_enabled("settings-submit", false);

    assert_eq!(
        h.actions.change_settings(&form).await,
        ActionOutcome::AlreadyInFlight
    );
}

#[tokio::test]
async fn expired_session_redirects_to_login() {
    let runner = Arc::new(FixtureCommandRunner::scripted([ApiOutcome::SessionExpired]));
    let h = harness(runner, confirming(DialogAnswer::Affirmed), HeadlessView::default());

    assert_eq!(h.actions.delete_profile().await, ActionOutcome::SessionExpired);
    assert_eq!(
        h.view.navigation(),
        vec![Navigation::Redirect("/login".to_owned())]
    );
}

#[tokio::test]
async fn profile_deletion_error_is_prefixed() {
    let runner = Arc::new(FixtureCommandRunner::scripted([ApiOutcome::domain(
        500,
        "database locked",
    )]));
    let h = harness(runner, confirming(DialogAnswer::Affirmed), HeadlessView::default());

    h.actions.delete_profile().await;
    assert_eq!(
        h.notifier.shown().first().map(|notice| notice.message.clone()),
        Some("Error al eliminar el perfil: database locked".to_owned())
    );
}

#[test]
fn blur_validation_marks_and_clears_inline_errors() {
    let view = HeadlessView::builder()
        .form::<ProfileForm>()
        .field("phone", "12345")
        .build();
    let h = harness(
        Arc::new(MockCommandRunner::new()),
        Arc::new(MockConfirmationGateway::new()),
        view,
    );

    assert_eq!(
        h.actions.check_profile_field(ProfileField::Phone),
        Err(ValidationError::InvalidPhone)
    );
    assert!(h.view.field_error("phone").is_some());

    h.view.set_field("phone", "0991234567");
    assert_eq!(h.actions.check_profile_field(ProfileField::Phone), Ok(()));
    assert!(h.view.field_error("phone").is_none());
    assert!(h.notifier.shown().is_empty());
}

#[test]
fn valid_staff_creation_hands_over_to_native_submit() {
    let view = HeadlessView::builder()
        .form::<StaffCreationForm>()
        .field("first_name", "Grace")
        .field("last_name", "Hopper")
        .field("email", "grace@udla.edu.ec")
        .field("password", "Abc12345!")
        .field("confirm_password", "Abc12345!")
        .build();
    let h = harness(
        Arc::new(MockCommandRunner::new()),
        Arc::new(MockConfirmationGateway::new()),
        view,
    );
    let form = FormView::<StaffCreationForm>::bind(h.view.as_ref()).expect("form bound");

    assert_eq!(h.actions.create_staff(&form), ActionOutcome::Completed);
    assert_eq!(
        h.view.navigation(),
        vec![Navigation::NativeSubmit("create-staff-form".to_owned())]
    );
}

#[test]
fn organizer_edit_requires_the_longer_password() {
    let view = HeadlessView::builder()
        .form::<OrganizerEditForm>()
        .field("password", "Abc1234!")
        .build();
    let h = harness(
        Arc::new(MockCommandRunner::new()),
        Arc::new(MockConfirmationGateway::new()),
        view,
    );
    let form = FormView::<OrganizerEditForm>::bind(h.view.as_ref()).expect("form bound");

    assert_eq!(
        h.actions.edit_organizer(&form),
        ActionOutcome::Invalid(ValidationError::WeakPassword { min_length: 9 })
    );
    assert!(h.view.navigation().is_empty());
}

#[test]
fn organizer_delete_route_parses_settings_values() {
    assert_eq!(
        "api".parse::<OrganizerDeleteRoute>(),
        Ok(OrganizerDeleteRoute::Api)
    );
    assert_eq!(
        " Credentialed ".parse::<OrganizerDeleteRoute>(),
        Ok(OrganizerDeleteRoute::Credentialed)
    );
    assert_eq!(
        "cookie".parse::<OrganizerDeleteRoute>(),
        Err("cookie".to_owned())
    );
}

#[tokio::test]
async fn attendance_lookup_is_ignored_while_in_flight() {
    let mut runner = MockCommandRunner::new();
    runner.expect_execute().never();
    let view = HeadlessView::builder()
        .form::<AttendanceForm>()
        .field("id_number", "1710034065")
        .build();
    let h = harness(Arc::new(runner), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<AttendanceForm>::bind(h.view.as_ref()).expect("attendance form bound");
    h.view.set_control_enabled("attendance-submit", false);

    assert_eq!(
        h.actions
            .record_attendance(5, 1, Attendee::ByIdNumber(form))
            .await,
        ActionOutcome::AlreadyInFlight
    );
    assert!(h.notifier.shown().is_empty());
    assert!(h.view.navigation().is_empty());
}

#[tokio::test]
async fn attendance_control_is_released_after_the_lookup_fails() {
    let runner = Arc::new(FixtureCommandRunner::scripted([ApiOutcome::domain(
        404,
        "Assistant not found",
    )]));
    let view = HeadlessView::builder()
        .form::<AttendanceForm>()
        .field("id_number", "1710034065")
        .build();
    let h = harness(runner.clone(), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<AttendanceForm>::bind(h.view.as_ref()).expect("attendance form bound");

    let outcome = h
        .actions
        .record_attendance(5, 1, Attendee::ByIdNumber(form))
        .await;
    assert_eq!(outcome, ActionOutcome::Rejected(DetailKind::Unclassified));
    assert_eq!(runner.issued().len(), 1);
    assert!(h.view.is_control_enabled("attendance-submit"));
}

#[tokio::test]
async fn id_number_lookup_sends_the_typed_value_as_one_segment() {
    let runner = Arc::new(FixtureCommandRunner::scripted([ApiOutcome::domain(
        404,
        "Assistant not found",
    )]));
    let view = HeadlessView::builder()
        .form::<CompanionForm>()
        .field("companion_id_number", "../../profile?admin=1")
        .build();
    let h = harness(runner.clone(), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<CompanionForm>::bind(h.view.as_ref()).expect("companion form bound");

    assert_eq!(
        h.actions.add_companion(&form, 9).await,
        ActionOutcome::Rejected(DetailKind::Unclassified)
    );
    let issued = runner.issued();
    let Some(lookup) = issued.first() else {
        panic!("lookup call missing");
    };
    assert_eq!(lookup.path, "/assistant/get-by-id-number");
    assert_eq!(lookup.segments, vec!["../../profile?admin=1".to_owned()]);
    assert!(lookup.query.is_empty());
}

fn event_edit_view(maps_link: &str) -> HeadlessView {
    HeadlessView::builder()
        .form::<EventEditForm>()
        .field("name", "Casa abierta")
        .field("description", "Feria de proyectos")
        .field("location", "Campus Granados")
        .field("maps_link", maps_link)
        .field("capacity", "120")
        .field("capacity_type", "limited")
        .build()
}

#[tokio::test]
async fn event_edit_is_a_json_patch_then_reload() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_execute()
        .withf(|command| {
            command.method == HttpMethod::Patch
                && command.path == "/events/12"
                && matches!(
                    &command.body,
                    RequestBody::Json(document)
                        if document.get("capacity") == Some(&json!("120"))
                            && document.get("maps_link")
                                == Some(&json!("https://maps.app.goo.gl/abc123"))
                )
        })
        .times(1)
        .returning(|_| ApiOutcome::Success(json!({"id": 12})));
    let h = harness(
        Arc::new(runner),
        Arc::new(MockConfirmationGateway::new()),
        event_edit_view("https://maps.app.goo.gl/abc123"),
    );
    let form = FormView::<EventEditForm>::bind(h.view.as_ref()).expect("event form bound");

    assert_eq!(h.actions.edit_event(&form, 12).await, ActionOutcome::Completed);
    assert_eq!(h.view.navigation(), vec![Navigation::Reload]);
    assert_eq!(
        h.notifier.shown().first().map(|notice| notice.kind),
        Some(NoticeKind::Success)
    );
    assert!(h.view.is_control_enabled("edit-event-submit"));
}

#[tokio::test]
async fn event_edit_with_foreign_maps_link_issues_no_call() {
    let mut runner = MockCommandRunner::new();
    runner.expect_execute().never();
    let h = harness(
        Arc::new(runner),
        Arc::new(MockConfirmationGateway::new()),
        event_edit_view("https://goo.gl/maps/abc"),
    );
    let form = FormView::<EventEditForm>::bind(h.view.as_ref()).expect("event form bound");

    let outcome = h.actions.edit_event(&form, 12).await;
    assert!(matches!(
        outcome,
        ActionOutcome::Invalid(ValidationError::InvalidMapsLink { .. })
    ));
    assert!(h.view.navigation().is_empty());
}

#[tokio::test]
async fn event_image_upload_is_multipart_then_reload() {
    let runner = Arc::new(FixtureCommandRunner::default());
    let view = HeadlessView::builder()
        .form::<EventImageForm>()
        .file("image", FileUpload::new("cover.png", "image/png", vec![0x89, 0x50]))
        .build();
    let h = harness(runner.clone(), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<EventImageForm>::bind(h.view.as_ref()).expect("image form bound");

    assert_eq!(h.actions.edit_event_image(&form, 12).await, ActionOutcome::Completed);
    let issued = runner.issued();
    let Some(command) = issued.first() else {
        panic!("image upload missing");
    };
    assert_eq!(command.method, HttpMethod::Patch);
    assert_eq!(command.path, "/events/12/image");
    let RequestBody::Multipart(submission) = &command.body else {
        panic!("image upload must be multipart");
    };
    assert!(submission.file("image").is_some());
    assert_eq!(h.view.navigation(), vec![Navigation::Reload]);
}

#[tokio::test]
async fn event_image_without_file_is_rejected_before_any_request() {
    let mut runner = MockCommandRunner::new();
    runner.expect_execute().never();
    let view = HeadlessView::builder().form::<EventImageForm>().build();
    let h = harness(Arc::new(runner), Arc::new(MockConfirmationGateway::new()), view);
    let form = FormView::<EventImageForm>::bind(h.view.as_ref()).expect("image form bound");

    assert_eq!(
        h.actions.edit_event_image(&form, 12).await,
        ActionOutcome::Invalid(ValidationError::MissingFile {
            field: "image".to_owned()
        })
    );
    assert!(h.view.navigation().is_empty());
}

#[tokio::test]
async fn confirmed_date_delete_targets_the_date_and_removes_its_row() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_execute()
        .withf(|command| {
            command.method == HttpMethod::Delete
                && command.path == "/events/date/4"
                && command.body == RequestBody::Empty
        })
        .times(1)
        .returning(|_| ApiOutcome::Success(json!({"message": "ok"})));
    let h = harness(
        Arc::new(runner),
        confirming(DialogAnswer::Affirmed),
        HeadlessView::builder().row("date-4").row("date-5").build(),
    );

    assert_eq!(h.actions.delete_event_date(4).await, ActionOutcome::Completed);
    assert!(!h.view.has_row("date-4"));
    assert!(h.view.has_row("date-5"));
    assert!(h.view.navigation().is_empty());
}
