//! Assistant profile page.

use tracing::debug;

use super::{ActionOutcome, PortalActions};
use crate::domain::binding::{FormView, ProfileForm};
use crate::domain::feedback::{Notice, OperationFeedback, ViewTransition};
use crate::domain::ports::{ApiCommand, AuthRequirement, RequestBody};
use crate::domain::validation::{
    ProfileField, ValidationResult, validate_profile_field, validate_profile_update,
};
use crate::domain::ConfirmPrompt;

/// Fields left out of the update when blank so the stored value survives.
const OPTIONAL_PROFILE_FIELDS: [&str; 8] = [
    "first_name",
    "last_name",
    "email",
    "password",
    "phone",
    "id_number",
    "gender",
    "date_of_birth",
];

impl PortalActions {
    /// Re-check one profile input when it loses focus.
    ///
    /// A failure is marked inline on the field; a pass clears any earlier
    /// mark. No notice is shown.
    pub fn check_profile_field(&self, field: ProfileField) -> ValidationResult {
        let value = self.surface.field_value(field.id()).unwrap_or_default();
        let result = validate_profile_field(field, &value, &self.rules, self.today());
        match &result {
            Ok(()) => self.surface.clear_field_error(field.id()),
            Err(error) => {
                debug!(field = field.id(), %error, "profile field rejected");
                self.surface.mark_field_error(field.id(), &error.to_string());
            }
        }
        result
    }

    /// Send the filled-in profile fields.
    pub async fn update_profile(&self, view: &FormView<ProfileForm>) -> ActionOutcome {
        let mut form = view.read(self.surface());
        let validation = validate_profile_update(&form, &self.rules, self.today());
        form.drop_blank(&OPTIONAL_PROFILE_FIELDS);
        let command = ApiCommand::post("/profile/update")
            .with_auth(AuthRequirement::SessionCookie)
            .with_body(RequestBody::Multipart(form));
        let plan = OperationFeedback::new(
            Notice::success("Perfil actualizado", "Perfil actualizado con éxito"),
            ViewTransition::Reload,
        )
        .with_failure_prefix("Error al actualizar el perfil");
        self.guarded_submit(view.submit_control(), validation, &command, &plan)
            .await
    }

    /// Delete the signed-in assistant's profile after confirmation, then log
    /// out.
    pub async fn delete_profile(&self) -> ActionOutcome {
        let prompt = ConfirmPrompt::destructive(
            "¿Confirmar eliminación?",
            "¿Estás seguro de que deseas eliminar tu perfil? Esta acción no se puede deshacer.",
        )
        .with_confirm_label("Eliminar");
        let command = ApiCommand::delete("/profile").with_auth(AuthRequirement::SessionCookie);
        let plan = OperationFeedback::new(
            Notice::success("Perfil eliminado", "Perfil eliminado con éxito"),
            ViewTransition::Redirect("/logout".to_owned()),
        )
        .with_failure_prefix("Error al eliminar el perfil");
        self.confirm_then_execute(&prompt, &command, &plan).await
    }
}
