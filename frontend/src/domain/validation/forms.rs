//! Ordered rule chains for each form of the portal.

use chrono::NaiveDate;

use super::account::{PasswordPolicy, validate_birth_date, validate_email, validate_phone};
use super::identity::{IdNumberType, validate_id_number, validate_untyped_id_number};
use super::{ValidationError, ValidationResult, ValidationRules, require};
use crate::domain::FormSubmission;
use crate::domain::submission::CONFIRM_PASSWORD_FIELD;

const MAPS_LINK_PREFIX: &str = "https://maps.app.goo.gl/";

const SIGNUP_REQUIRED: [&str; 10] = [
    "first_name",
    "last_name",
    "id_number",
    "id_number_type",
    "phone",
    "gender",
    "date_of_birth",
    "email",
    "password",
    CONFIRM_PASSWORD_FIELD,
];

const STAFF_REQUIRED: [&str; 5] = [
    "first_name",
    "last_name",
    "email",
    "password",
    CONFIRM_PASSWORD_FIELD,
];

const ACCOUNT_EDIT_FIELDS: [&str; 4] = ["first_name", "last_name", "email", "password"];

const EVENT_REQUIRED: [&str; 6] = [
    "name",
    "description",
    "location",
    "maps_link",
    "capacity",
    "capacity_type",
];

fn is_checked(value: &str) -> bool {
    matches!(value, "on" | "true" | "1" | "yes")
}

fn passwords_match(form: &FormSubmission) -> ValidationResult {
    if form.raw("password") == form.raw(CONFIRM_PASSWORD_FIELD) {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

/// Public self-registration of an assistant.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use frontend::domain::FormSubmission;
/// use frontend::domain::validation::{ValidationError, ValidationRules, validate_signup};
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");
/// let form = FormSubmission::new().with_field("first_name", "Ada");
/// assert!(matches!(
///     validate_signup(&form, &ValidationRules::default(), today),
///     Err(ValidationError::MissingRequired { .. })
/// ));
/// ```
pub fn validate_signup(
    form: &FormSubmission,
    rules: &ValidationRules,
    today: NaiveDate,
) -> ValidationResult {
    require(form, &SIGNUP_REQUIRED)?;
    if !is_checked(form.value("accepted_terms")) {
        return Err(ValidationError::TermsNotAccepted);
    }
    if form.file("image").is_none() {
        return Err(ValidationError::MissingFile {
            field: "image".to_owned(),
        });
    }
    let id_type: IdNumberType = form.value("id_number_type").parse()?;
    validate_id_number(id_type, form.value("id_number"), rules.passport)?;
    validate_phone(form.value("phone"))?;
    validate_birth_date(form.value("date_of_birth"), today)?;
    rules.email.validate_signup(form.value("email"))?;
    PasswordPolicy::STANDARD.validate(form.raw("password").unwrap_or_default())?;
    passwords_match(form)
}

/// Organizer creating a staff account.
pub fn validate_staff_creation(form: &FormSubmission) -> ValidationResult {
    require(form, &STAFF_REQUIRED)?;
    validate_email(form.value("email"))?;
    passwords_match(form)?;
    PasswordPolicy::STANDARD.validate(form.raw("password").unwrap_or_default())
}

/// Editing a staff or organizer account, where blank fields keep their value.
pub fn validate_account_edit(form: &FormSubmission, policy: PasswordPolicy) -> ValidationResult {
    if ACCOUNT_EDIT_FIELDS.iter().all(|field| form.is_blank(field)) {
        return Err(ValidationError::NothingToUpdate);
    }
    if !form.is_blank("email") {
        validate_email(form.value("email"))?;
    }
    if !form.is_blank("password") {
        policy.validate(form.raw("password").unwrap_or_default())?;
    }
    Ok(())
}

/// Profile fields that carry their own rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    /// `email` input.
    Email,
    /// `phone` input.
    Phone,
    /// `password` input.
    Password,
    /// `id_number` input.
    IdNumber,
    /// `date_of_birth` input.
    DateOfBirth,
}

impl ProfileField {
    /// Every checked profile field, in form order.
    pub const ALL: [Self; 5] = [
        Self::Email,
        Self::Phone,
        Self::Password,
        Self::IdNumber,
        Self::DateOfBirth,
    ];

    /// Element identifier of the input.
    pub fn id(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::IdNumber => "id_number",
            Self::DateOfBirth => "date_of_birth",
        }
    }

    /// Look a field up by element identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.id() == id)
    }
}

/// Validate one profile input, as done when the field loses focus.
///
/// Blank values pass: profile edits only send the fields the user filled in.
pub fn validate_profile_field(
    field: ProfileField,
    value: &str,
    rules: &ValidationRules,
    today: NaiveDate,
) -> ValidationResult {
    if value.trim().is_empty() {
        return Ok(());
    }
    match field {
        ProfileField::Email => validate_email(value),
        ProfileField::Phone => validate_phone(value),
        ProfileField::Password => PasswordPolicy::STANDARD.validate(value),
        ProfileField::IdNumber => validate_untyped_id_number(value, rules.passport),
        ProfileField::DateOfBirth => validate_birth_date(value, today),
    }
}

/// Whole-form check run before a profile update is sent.
pub fn validate_profile_update(
    form: &FormSubmission,
    rules: &ValidationRules,
    today: NaiveDate,
) -> ValidationResult {
    ProfileField::ALL.into_iter().try_for_each(|field| {
        validate_profile_field(field, form.raw(field.id()).unwrap_or_default(), rules, today)
    })
}

/// Event details edited by an organizer.
pub fn validate_event_edit(form: &FormSubmission) -> ValidationResult {
    require(form, &EVENT_REQUIRED)?;
    if !form.value("maps_link").starts_with(MAPS_LINK_PREFIX) {
        return Err(ValidationError::InvalidMapsLink {
            prefix: MAPS_LINK_PREFIX,
        });
    }
    match form.value("capacity").parse::<u32>() {
        Ok(capacity) if capacity > 0 => Ok(()),
        _ => Err(ValidationError::InvalidCapacity),
    }
}

/// Face-recognition settings of the organizer dashboard.
pub fn validate_settings(form: &FormSubmission) -> ValidationResult {
    require(form, &["model", "threshold"])?;
    match form.value("threshold").parse::<f64>() {
        Ok(threshold) if threshold.is_finite() && threshold >= 0.0 => Ok(()),
        _ => Err(ValidationError::InvalidThreshold),
    }
}
