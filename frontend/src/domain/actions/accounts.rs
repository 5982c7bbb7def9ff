//! Account pages: signup, staff management and organizer management.

use super::{ActionOutcome, OrganizerDeleteRoute, PortalActions};
use crate::domain::binding::{
    FormView, OrganizerEditForm, SignupForm, StaffCreationForm, StaffEditForm,
};
use crate::domain::feedback::{Notice, OperationFeedback, ViewTransition};
use crate::domain::ports::{ApiCommand, AuthRequirement, RequestBody};
use crate::domain::validation::{
    PasswordPolicy, validate_account_edit, validate_signup, validate_staff_creation,
};
use crate::domain::{ConfirmPrompt, DetailKind};

impl PortalActions {
    /// Register a new assistant and send them to the login page.
    ///
    /// The profile photo travels as multipart; the confirmation password is
    /// dropped by the encoder.
    pub async fn signup(&self, view: &FormView<SignupForm>) -> ActionOutcome {
        let form = view.read(self.surface());
        let validation = validate_signup(&form, &self.rules, self.today());
        let command = ApiCommand::post("/assistant/add").with_body(RequestBody::Multipart(form));
        let plan = OperationFeedback::new(
            Notice::success(
                "Registro exitoso",
                "Tu cuenta ha sido creada. Inicia sesión para continuar.",
            ),
            ViewTransition::Redirect("/login".to_owned()),
        )
        .with_failure_title("Error en el registro")
        .with_failure_prefix("Error en el registro")
        .on_detail(
            DetailKind::FaceNotDetected,
            Notice::error(
                "Rostro no detectado",
                "No se pudo detectar un único rostro en la imagen. Por favor, asegúrate de \
                 que la imagen contenga un solo rostro claro y visible.",
            ),
        )
        .on_detail(
            DetailKind::PersonAlreadyExists,
            Notice::error(
                "Persona ya registrada",
                "Ya existe una persona registrada con esta identificación.",
            ),
        )
        .on_detail(
            DetailKind::UserAlreadyExists,
            Notice::error(
                "Usuario ya registrado",
                "Ya existe una cuenta registrada con este correo electrónico.",
            ),
        );
        self.guarded_submit(view.submit_control(), validation, &command, &plan)
            .await
    }

    /// Validate the staff creation form and let the page submit it.
    pub fn create_staff(&self, view: &FormView<StaffCreationForm>) -> ActionOutcome {
        let form = view.read(self.surface());
        self.native_submit(view.form_id(), validate_staff_creation(&form))
    }

    /// Validate the staff edit form and let the page submit it.
    pub fn edit_staff(&self, view: &FormView<StaffEditForm>) -> ActionOutcome {
        let form = view.read(self.surface());
        self.native_submit(
            view.form_id(),
            validate_account_edit(&form, PasswordPolicy::STANDARD),
        )
    }

    /// Validate the organizer edit form and let the page submit it.
    pub fn edit_organizer(&self, view: &FormView<OrganizerEditForm>) -> ActionOutcome {
        let form = view.read(self.surface());
        self.native_submit(
            view.form_id(),
            validate_account_edit(&form, PasswordPolicy::ORGANIZER),
        )
    }

    /// Delete a staff account after confirmation.
    ///
    /// The backend may answer a rejection with a `redirect` route, which is
    /// followed after the error notice.
    pub async fn delete_staff(&self, staff_id: u64) -> ActionOutcome {
        let prompt = ConfirmPrompt::destructive(
            "¿Estás seguro?",
            "¿Estás seguro de que quieres eliminar este miembro del staff? Esta acción no se \
             puede deshacer.",
        )
        .with_confirm_label("Eliminar");
        let command = ApiCommand::delete(format!("/staff/delete/{staff_id}"))
            .with_auth(AuthRequirement::SessionCookie);
        let plan = OperationFeedback::new(
            Notice::success("Staff eliminado", "Staff eliminado correctamente"),
            ViewTransition::RemoveRow(format!("staff-{staff_id}")),
        )
        .with_failure_title("Error al eliminar el staff");
        self.confirm_then_execute(&prompt, &command, &plan).await
    }

    /// Delete an organizer account after confirmation, through the
    /// configured route.
    pub async fn delete_organizer(&self, organizer_id: u64) -> ActionOutcome {
        let prompt = ConfirmPrompt::destructive(
            "¿Estás seguro?",
            "¿Estás seguro de que deseas eliminar este organizador?",
        );
        let command = match self.organizer_delete_route {
            OrganizerDeleteRoute::Api => ApiCommand::delete(format!("/organizer/{organizer_id}")),
            OrganizerDeleteRoute::Credentialed => {
                ApiCommand::delete(format!("/delete-organizer/{organizer_id}"))
                    .with_auth(AuthRequirement::SessionCookie)
            }
        };
        let plan = OperationFeedback::new(
            Notice::success("Organizador eliminado", "Organizador eliminado con éxito"),
            ViewTransition::RemoveRow(format!("organizer-{organizer_id}")),
        )
        .with_failure_title("Error al eliminar el organizador");
        self.confirm_then_execute(&prompt, &command, &plan).await
    }
}
