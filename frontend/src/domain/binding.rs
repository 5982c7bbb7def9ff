//! Per-form view bindings.
//!
//! Each page form is described once by a [`FormKind`]. Binding checks every
//! element the form needs up front, so an action never discovers a missing
//! input halfway through a submission.

use std::iter;
use std::marker::PhantomData;

use thiserror::Error;
use tracing::debug;

use super::FormSubmission;
use super::ports::ViewSurface;

/// Binding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The page lacks an element the form relies on.
    #[error("required element `{id}` is missing from the page")]
    MissingElement {
        /// Identifier of the missing element.
        id: String,
    },
}

/// Static description of one page form.
pub trait FormKind {
    /// Identifier of the form element.
    const FORM_ID: &'static str;
    /// Identifier of the control that triggers the submission.
    const SUBMIT_CONTROL: &'static str;
    /// Text, select and checkbox inputs read on submission.
    const FIELDS: &'static [&'static str];
    /// File inputs read on submission.
    const FILES: &'static [&'static str] = &[];
}

macro_rules! form_kind {
    (
        $(#[$meta:meta])*
        $name:ident {
            form: $form:literal,
            submit: $submit:literal,
            fields: [$($field:literal),* $(,)?]
            $(, files: [$($file:literal),* $(,)?])?
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl FormKind for $name {
            const FORM_ID: &'static str = $form;
            const SUBMIT_CONTROL: &'static str = $submit;
            const FIELDS: &'static [&'static str] = &[$($field),*];
            $(const FILES: &'static [&'static str] = &[$($file),*];)?
        }
    };
}

form_kind! {
    /// Public assistant self-registration.
    SignupForm {
        form: "signup-form",
        submit: "signup-submit",
        fields: [
            "first_name", "last_name", "id_number", "id_number_type", "phone", "gender",
            "date_of_birth", "email", "password", "confirm_password", "accepted_terms",
        ],
        files: ["image"],
    }
}

form_kind! {
    /// Organizer creating a staff account.
    StaffCreationForm {
        form: "create-staff-form",
        submit: "create-staff-submit",
        fields: ["first_name", "last_name", "email", "password", "confirm_password"],
    }
}

form_kind! {
    /// Editing a staff account.
    StaffEditForm {
        form: "edit-staff-form",
        submit: "edit-staff-submit",
        fields: ["first_name", "last_name", "email", "password"],
    }
}

form_kind! {
    /// Editing an organizer account.
    OrganizerEditForm {
        form: "edit-organizer-form",
        submit: "edit-organizer-submit",
        fields: ["first_name", "last_name", "email", "password"],
    }
}

form_kind! {
    /// Assistant profile editor.
    ProfileForm {
        form: "profile-form",
        submit: "profile-submit",
        fields: [
            "first_name", "last_name", "email", "phone", "password", "id_number", "gender",
            "date_of_birth",
        ],
        files: ["image"],
    }
}

form_kind! {
    /// Event details editor.
    EventEditForm {
        form: "edit-event-form",
        submit: "edit-event-submit",
        fields: ["name", "description", "location", "maps_link", "capacity", "capacity_type"],
    }
}

form_kind! {
    /// Event cover image upload.
    EventImageForm {
        form: "event-image-form",
        submit: "event-image-submit",
        fields: [],
        files: ["image"],
    }
}

form_kind! {
    /// Face-recognition settings.
    SettingsForm {
        form: "settings-form",
        submit: "settings-submit",
        fields: ["model", "threshold"],
    }
}

form_kind! {
    /// Companion registration by id number.
    CompanionForm {
        form: "companion-form",
        submit: "companion-submit",
        fields: ["companion_id_number"],
    }
}

form_kind! {
    /// Staff assignment to an event.
    StaffAssignmentForm {
        form: "assign-staff-form",
        submit: "assign-staff-submit",
        fields: ["staff_id"],
    }
}

form_kind! {
    /// Attendance recording by id number.
    AttendanceForm {
        form: "attendance-form",
        submit: "attendance-submit",
        fields: ["id_number"],
    }
}

/// A form whose elements were all found on the page.
///
/// # Examples
/// ```
/// use frontend::domain::binding::{FormView, SettingsForm};
/// use frontend::ui::HeadlessView;
///
/// let view = HeadlessView::builder()
///     .element("settings-form")
///     .element("settings-submit")
///     .field("model", "Facenet512")
///     .field("threshold", "0.4")
///     .build();
/// let form = FormView::<SettingsForm>::bind(&view).expect("settings form present");
/// assert_eq!(form.read(&view).value("model"), "Facenet512");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormView<K> {
    kind: PhantomData<fn() -> K>,
}

impl<K: FormKind> FormView<K> {
    /// Check that every element of `K` is present on `surface`.
    pub fn bind(surface: &dyn ViewSurface) -> Result<Self, BindingError> {
        let missing = iter::once(K::FORM_ID)
            .chain(iter::once(K::SUBMIT_CONTROL))
            .chain(K::FIELDS.iter().copied())
            .chain(K::FILES.iter().copied())
            .find(|id| !surface.has_element(id));
        match missing {
            Some(id) => Err(BindingError::MissingElement { id: id.to_owned() }),
            None => Ok(Self { kind: PhantomData }),
        }
    }

    /// Identifier of the bound form.
    pub fn form_id(&self) -> &'static str {
        K::FORM_ID
    }

    /// Identifier of the control guarded while a request is in flight.
    pub fn submit_control(&self) -> &'static str {
        K::SUBMIT_CONTROL
    }

    /// Capture the current field values and file selections.
    pub fn read(&self, surface: &dyn ViewSurface) -> FormSubmission {
        let mut submission = FormSubmission::new();
        for field in K::FIELDS {
            submission.insert(*field, surface.field_value(field).unwrap_or_default());
        }
        for file in K::FILES {
            if let Some(upload) = surface.file_value(file) {
                submission.insert_file(*file, upload);
            }
        }
        submission
    }
}

/// Guard keeping a submit control disabled while its request runs.
///
/// Dropping the guard re-enables the control.
pub struct InFlight<'a> {
    surface: &'a dyn ViewSurface,
    control: &'static str,
}

impl<'a> InFlight<'a> {
    /// Disable `control`, or return `None` when it is already disabled
    /// because an earlier trigger is still in flight.
    pub fn acquire(surface: &'a dyn ViewSurface, control: &'static str) -> Option<Self> {
        if surface.set_control_enabled(control, false) {
            Some(Self { surface, control })
        } else {
            debug!(control, "control already disabled; ignoring trigger");
            None
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.surface.set_control_enabled(self.control, true);
    }
}
