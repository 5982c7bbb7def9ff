//! Account field rules: password strength, email shape and provider, phone,
//! and date of birth.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::{ValidationError, ValidationResult};

/// Characters accepted as the mandatory special character of a password.
pub const PASSWORD_SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Email providers accepted for self-registration.
pub const ALLOWED_SIGNUP_DOMAINS: [&str; 5] = [
    "gmail.com",
    "hotmail.com",
    "outlook.com",
    "protonmail.com",
    "yahoo.com",
];

const DEFAULT_INSTITUTION_DOMAIN: &str = "udla.edu.ec";
const PHONE_DIGITS: usize = 10;

/// Password strength requirements.
///
/// # Examples
/// ```
/// use frontend::domain::validation::PasswordPolicy;
///
/// assert!(PasswordPolicy::STANDARD.validate("Abc12345!").is_ok());
/// assert!(PasswordPolicy::STANDARD.validate("abc12345").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum number of characters.
    pub min_length: usize,
}

impl PasswordPolicy {
    /// Policy used by signup, staff and profile forms.
    pub const STANDARD: Self = Self { min_length: 8 };
    /// Stricter policy used when an organizer edits an account.
    pub const ORGANIZER: Self = Self { min_length: 9 };

    /// Check length and the four character classes.
    pub fn validate(self, password: &str) -> ValidationResult {
        let long_enough = password.chars().count() >= self.min_length;
        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_special = password
            .chars()
            .any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(c));

        if long_enough && has_lower && has_upper && has_digit && has_special {
            Ok(())
        } else {
            Err(ValidationError::WeakPassword {
                min_length: self.min_length,
            })
        }
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Check the general `local@domain.tld` shape.
pub fn validate_email(email: &str) -> ValidationResult {
    if email_regex().is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Provider rules applied to self-registration emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPolicy {
    allowed_domains: Vec<String>,
    institution_domain: String,
}

impl Default for EmailPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INSTITUTION_DOMAIN)
    }
}

impl EmailPolicy {
    /// Default allow-list, rejecting `institution_domain`.
    pub fn new(institution_domain: impl Into<String>) -> Self {
        Self {
            allowed_domains: ALLOWED_SIGNUP_DOMAINS
                .iter()
                .map(|domain| (*domain).to_owned())
                .collect(),
            institution_domain: institution_domain.into().trim().to_ascii_lowercase(),
        }
    }

    /// Domain rejected for self-registration.
    pub fn institution_domain(&self) -> &str {
        &self.institution_domain
    }

    /// Validate an email entered on the public signup page.
    ///
    /// The shape is checked first. The allow-list and the institution
    /// exclusion are then both evaluated; an institutional address is
    /// reported as such even though it is also outside the allow-list.
    ///
    /// # Examples
    /// ```
    /// use frontend::domain::validation::EmailPolicy;
    ///
    /// let policy = EmailPolicy::default();
    /// assert!(policy.validate_signup("user@gmail.com").is_ok());
    /// assert!(policy.validate_signup("user@udla.edu.ec").is_err());
    /// ```
    pub fn validate_signup(&self, email: &str) -> ValidationResult {
        validate_email(email)?;
        let domain = email
            .trim()
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_ascii_lowercase())
            .unwrap_or_default();

        let is_institutional = domain == self.institution_domain
            || domain.ends_with(&format!(".{}", self.institution_domain));
        let is_allowed = self.allowed_domains.iter().any(|allowed| *allowed == domain);

        if is_institutional {
            return Err(ValidationError::InstitutionalEmail {
                domain: self.institution_domain.clone(),
            });
        }
        if !is_allowed {
            return Err(ValidationError::EmailDomainNotAllowed {
                allowed: self.allowed_domains.join(", "),
            });
        }
        Ok(())
    }
}

/// Check for exactly ten digits with no country code or separators.
pub fn validate_phone(phone: &str) -> ValidationResult {
    let trimmed = phone.trim();
    if trimmed.len() == PHONE_DIGITS && trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

/// Check an ISO `YYYY-MM-DD` birth date lies strictly before `today`.
pub fn validate_birth_date(value: &str, today: NaiveDate) -> ValidationResult {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidBirthDate)?;
    if date < today {
        Ok(())
    } else {
        Err(ValidationError::BirthDateNotInPast)
    }
}
