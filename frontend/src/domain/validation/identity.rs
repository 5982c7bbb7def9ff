//! National id (cédula) and passport number rules.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use super::{ValidationError, ValidationResult};

const CEDULA_LENGTH: usize = 10;
const CEDULA_COEFFICIENTS: [u32; 9] = [2, 1, 2, 1, 2, 1, 2, 1, 2];
const PROVINCE_RANGE: std::ops::RangeInclusive<u32> = 1..=24;
const THIRD_DIGIT_LIMIT: u32 = 6;

/// Validate an Ecuadorian cédula with the modulus-10 check digit.
///
/// # Examples
/// ```
/// use frontend::domain::validation::validate_cedula;
///
/// assert!(validate_cedula("1710034065").is_ok());
/// assert!(validate_cedula("9910034065").is_err());
/// assert!(validate_cedula("1760034065").is_err());
/// ```
pub fn validate_cedula(value: &str) -> ValidationResult {
    let digits = cedula_digits(value).ok_or(ValidationError::InvalidCedula)?;
    let [d0, d1, d2, ..] = digits;
    let province = d0 * 10 + d1;
    if !PROVINCE_RANGE.contains(&province) || d2 >= THIRD_DIGIT_LIMIT {
        return Err(ValidationError::InvalidCedula);
    }

    let sum: u32 = digits
        .iter()
        .zip(CEDULA_COEFFICIENTS)
        .map(|(digit, coefficient)| {
            let product = digit * coefficient;
            if product >= 10 { product - 9 } else { product }
        })
        .sum();
    let expected = (10 - sum % 10) % 10;
    let [.., check] = digits;
    if expected == check {
        Ok(())
    } else {
        Err(ValidationError::InvalidCedula)
    }
}

fn cedula_digits(value: &str) -> Option<[u32; CEDULA_LENGTH]> {
    if value.len() != CEDULA_LENGTH {
        return None;
    }
    let mut digits = [0; CEDULA_LENGTH];
    for (slot, byte) in digits.iter_mut().zip(value.bytes()) {
        if !byte.is_ascii_digit() {
            return None;
        }
        *slot = u32::from(byte - b'0');
    }
    Some(digits)
}

/// Accepted passport number format.
///
/// Selected through configuration. [`PassportPolicy::Flexible`] is the
/// default and matches the profile editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassportPolicy {
    /// One to three letters followed by four to eight digits.
    Alphanumeric,
    /// Six to nine digits.
    Numeric,
    /// Either [`PassportPolicy::Alphanumeric`] or [`PassportPolicy::Numeric`].
    #[default]
    Flexible,
    /// Exactly `A` followed by seven digits.
    Legacy,
}

static ALPHANUMERIC_PASSPORT_RE: OnceLock<Regex> = OnceLock::new();
static NUMERIC_PASSPORT_RE: OnceLock<Regex> = OnceLock::new();
static LEGACY_PASSPORT_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("passport regex failed to compile: {error}"))
    })
}

impl PassportPolicy {
    /// Whether `value` matches the policy.
    pub fn accepts(self, value: &str) -> bool {
        let alphanumeric = || {
            compiled(&ALPHANUMERIC_PASSPORT_RE, r"^[A-Za-z]{1,3}[0-9]{4,8}$").is_match(value)
        };
        let numeric = || compiled(&NUMERIC_PASSPORT_RE, r"^[0-9]{6,9}$").is_match(value);
        match self {
            Self::Alphanumeric => alphanumeric(),
            Self::Numeric => numeric(),
            Self::Flexible => alphanumeric() || numeric(),
            Self::Legacy => compiled(&LEGACY_PASSPORT_RE, r"^A[0-9]{7}$").is_match(value),
        }
    }

    /// Human description of the format, shown in error messages.
    pub fn format_hint(self) -> &'static str {
        match self {
            Self::Alphanumeric => "1 a 3 letras seguidas de 4 a 8 dígitos",
            Self::Numeric => "6 a 9 dígitos",
            Self::Flexible => "ej: A1234567 o 6 a 9 dígitos",
            Self::Legacy => "A seguida de 7 dígitos",
        }
    }
}

impl FromStr for PassportPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "alphanumeric" => Ok(Self::Alphanumeric),
            "numeric" => Ok(Self::Numeric),
            "flexible" => Ok(Self::Flexible),
            "legacy" => Ok(Self::Legacy),
            other => Err(other.to_owned()),
        }
    }
}

/// Validate a passport number against `policy`.
pub fn validate_passport(value: &str, policy: PassportPolicy) -> ValidationResult {
    if policy.accepts(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPassport {
            format: policy.format_hint(),
        })
    }
}

/// Identity document selected in the signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdNumberType {
    /// Ecuadorian national id.
    Cedula,
    /// Passport number.
    Passport,
}

impl fmt::Display for IdNumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cedula => f.write_str("cedula"),
            Self::Passport => f.write_str("passport"),
        }
    }
}

impl FromStr for IdNumberType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "cedula" => Ok(Self::Cedula),
            "passport" => Ok(Self::Passport),
            other => Err(ValidationError::UnknownIdType {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validate an id number for an explicitly selected document type.
pub fn validate_id_number(
    id_type: IdNumberType,
    value: &str,
    policy: PassportPolicy,
) -> ValidationResult {
    match id_type {
        IdNumberType::Cedula => validate_cedula(value.trim()),
        IdNumberType::Passport => validate_passport(value, policy),
    }
}

/// Validate an id number when the form has no type selector.
///
/// Ten-digit values are treated as a cédula; anything else must satisfy the
/// passport policy.
pub fn validate_untyped_id_number(value: &str, policy: PassportPolicy) -> ValidationResult {
    let trimmed = value.trim();
    if trimmed.len() == CEDULA_LENGTH && trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        validate_cedula(trimmed)
    } else {
        validate_passport(trimmed, policy)
    }
}
