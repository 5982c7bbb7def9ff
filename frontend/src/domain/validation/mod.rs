//! Client-side validators.
//!
//! Every validator is a pure function over raw strings: no view access, no
//! I/O, and "today" is passed in rather than read from a clock. Rules fail
//! closed and fail fast; a chain stops at the first broken rule and reports a
//! single message.

mod account;
mod forms;
mod identity;

use thiserror::Error;

pub use account::{
    ALLOWED_SIGNUP_DOMAINS, EmailPolicy, PASSWORD_SPECIAL_CHARACTERS, PasswordPolicy,
    validate_birth_date, validate_email, validate_phone,
};
pub use forms::{
    ProfileField, validate_account_edit, validate_event_edit, validate_profile_field,
    validate_profile_update, validate_settings, validate_signup, validate_staff_creation,
};
pub use identity::{
    IdNumberType, PassportPolicy, validate_cedula, validate_id_number, validate_passport,
    validate_untyped_id_number,
};

/// Outcome of a validator: pass, or exactly one failure.
pub type ValidationResult = Result<(), ValidationError>;

/// A broken validation rule, rendered as the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A mandatory field is empty.
    #[error("Por favor, complete todos los campos.")]
    MissingRequired {
        /// Identifier of the empty field.
        field: String,
    },
    /// An edit form was submitted with every field empty.
    #[error("Debe proporcionar al menos un campo para actualizar.")]
    NothingToUpdate,
    /// Email does not look like `local@domain.tld`.
    #[error("Por favor, ingrese un email válido.")]
    InvalidEmail,
    /// Self-registration email uses a provider outside the allow-list.
    #[error("El correo debe ser de uno de estos dominios: {allowed}.")]
    EmailDomainNotAllowed {
        /// Comma separated allow-list.
        allowed: String,
    },
    /// Self-registration email uses the institution's own domain.
    #[error("No se permite registrarse con un correo institucional (@{domain}).")]
    InstitutionalEmail {
        /// Institution domain that was used.
        domain: String,
    },
    /// Password misses a length or character-class requirement.
    #[error(
        "La contraseña debe tener al menos {min_length} caracteres, 1 letra minúscula, \
         1 letra mayúscula, 1 dígito y 1 carácter especial."
    )]
    WeakPassword {
        /// Minimum length of the active policy.
        min_length: usize,
    },
    /// Password and its confirmation differ.
    #[error("Las contraseñas no coinciden.")]
    PasswordMismatch,
    /// Cédula fails its shape or checksum rules.
    #[error("Por favor, ingrese una cédula válida.")]
    InvalidCedula,
    /// Passport number does not match the active policy.
    #[error("Por favor, ingrese un pasaporte válido ({format}).")]
    InvalidPassport {
        /// Human description of the accepted format.
        format: &'static str,
    },
    /// The id type selector holds an unknown value.
    #[error("Seleccione un tipo de identificación válido.")]
    UnknownIdType {
        /// Value found in the selector.
        value: String,
    },
    /// Phone is not exactly ten digits.
    #[error("El teléfono debe tener exactamente 10 dígitos.")]
    InvalidPhone,
    /// Birth date is not an ISO `YYYY-MM-DD` date.
    #[error("La fecha de nacimiento no es válida.")]
    InvalidBirthDate,
    /// Birth date is today or later.
    #[error("La fecha de nacimiento debe ser anterior a la fecha actual.")]
    BirthDateNotInPast,
    /// Google Maps link does not use the short-link prefix.
    #[error("El enlace de Google Maps debe comenzar con \"{prefix}\".")]
    InvalidMapsLink {
        /// Required prefix.
        prefix: &'static str,
    },
    /// Capacity is not a positive integer.
    #[error("La capacidad debe ser un número entero positivo.")]
    InvalidCapacity,
    /// Recognition threshold is not a finite, non-negative number.
    #[error("El umbral debe ser un número mayor o igual a cero.")]
    InvalidThreshold,
    /// Terms and conditions checkbox is unchecked.
    #[error("Debe aceptar los términos y condiciones.")]
    TermsNotAccepted,
    /// A required file input is empty.
    #[error("Por favor, seleccione una imagen.")]
    MissingFile {
        /// Identifier of the file input.
        field: String,
    },
}

impl ValidationError {
    /// Short title for the prompt that reports this failure.
    pub fn title(&self) -> &'static str {
        match self {
            Self::MissingRequired { .. } | Self::MissingFile { .. } => "Campos incompletos",
            Self::NothingToUpdate => "Campos vacíos",
            Self::InvalidEmail
            | Self::EmailDomainNotAllowed { .. }
            | Self::InstitutionalEmail { .. } => "Email inválido",
            Self::WeakPassword { .. } | Self::PasswordMismatch => "Contraseña inválida",
            Self::InvalidCedula | Self::InvalidPassport { .. } | Self::UnknownIdType { .. } => {
                "Identificación inválida"
            }
            Self::InvalidPhone => "Teléfono inválido",
            Self::InvalidBirthDate | Self::BirthDateNotInPast => "Fecha inválida",
            Self::InvalidMapsLink { .. } => "Enlace inválido",
            Self::InvalidCapacity => "Capacidad inválida",
            Self::InvalidThreshold => "Configuración inválida",
            Self::TermsNotAccepted => "Términos y condiciones",
        }
    }

    /// Field the failure belongs to, when it maps to a single input.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingRequired { field } | Self::MissingFile { field } => Some(field),
            Self::InvalidEmail
            | Self::EmailDomainNotAllowed { .. }
            | Self::InstitutionalEmail { .. } => Some("email"),
            Self::WeakPassword { .. } => Some("password"),
            Self::PasswordMismatch => Some("confirm_password"),
            Self::InvalidCedula | Self::InvalidPassport { .. } => Some("id_number"),
            Self::UnknownIdType { .. } => Some("id_number_type"),
            Self::InvalidPhone => Some("phone"),
            Self::InvalidBirthDate | Self::BirthDateNotInPast => Some("date_of_birth"),
            Self::InvalidMapsLink { .. } => Some("maps_link"),
            Self::InvalidCapacity => Some("capacity"),
            Self::InvalidThreshold => Some("threshold"),
            Self::TermsNotAccepted => Some("accepted_terms"),
            Self::NothingToUpdate => None,
        }
    }
}

/// Configurable policies shared by the form rule chains.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationRules {
    /// Accepted passport number format.
    pub passport: PassportPolicy,
    /// Email provider rules for self-registration.
    pub email: EmailPolicy,
}

impl ValidationRules {
    /// Rules for a deployment with its own institution domain.
    pub fn new(passport: PassportPolicy, institution_domain: &str) -> Self {
        Self {
            passport,
            email: EmailPolicy::new(institution_domain),
        }
    }
}

fn require(form: &crate::domain::FormSubmission, fields: &[&str]) -> ValidationResult {
    match fields.iter().find(|field| form.is_blank(field)) {
        Some(field) => Err(ValidationError::MissingRequired {
            field: (*field).to_owned(),
        }),
        None => Ok(()),
    }
}
