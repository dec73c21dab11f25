// ── Input validation ──
//
// Pure checks for account forms and titles. Each field contributes its
// first failing rule; every failing field is reported together, and no
// network call is made while any rule fails.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern compiles"));
static LOWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]").expect("lowercase pattern compiles"));
static UPPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("uppercase pattern compiles"));
static DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]").expect("digit pattern compiles"));
static SPECIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[@$!%*?&]").expect("special pattern compiles"));

pub const PASSWORD_MIN_LEN: usize = 8;
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email cannot be empty")]
    EmptyEmail,
    #[error("Email format is incorrect")]
    InvalidEmail,
    #[error("Password cannot be empty")]
    EmptyPassword,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error(
        "Password must contain lowercase letters, uppercase letters, numbers and special characters (@$!%*?&)"
    )]
    WeakPassword,
    #[error("Password does not match")]
    PasswordMismatch,
    #[error("Username cannot be empty")]
    EmptyUsername,
    #[error("Username must be at least 3 characters long")]
    UsernameTooShort,
    #[error("Username must be at most 20 characters long")]
    UsernameTooLong,
    #[error("Username can only contain letters, numbers and underscores")]
    InvalidUsername,
    #[error("{0} title cannot be empty")]
    EmptyTitle(&'static str),
}

impl ValidationError {
    /// Form field the rule belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyPassword | Self::PasswordTooShort | Self::WeakPassword => "password",
            Self::PasswordMismatch => "confirm_password",
            Self::EmptyUsername
            | Self::UsernameTooShort
            | Self::UsernameTooLong
            | Self::InvalidUsername => "username",
            Self::EmptyTitle(_) => "title",
        }
    }
}

/// Every failing field of one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    fn collect(checks: impl IntoIterator<Item = Result<(), ValidationError>>) -> Result<(), Self> {
        let errors: Vec<_> = checks.into_iter().filter_map(Result::err).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self(errors))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(e: ValidationError) -> Self {
        Self(vec![e])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ── Field rules ──────────────────────────────────────────────────────

pub fn check_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Registration strength rules: length and four character classes.
pub fn check_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    let classes = [&LOWER_RE, &UPPER_RE, &DIGIT_RE, &SPECIAL_RE];
    if !classes.iter().all(|re| re.is_match(password)) {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

pub fn check_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if len == 0 {
        return Err(ValidationError::EmptyUsername);
    }
    if len < USERNAME_MIN_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if len > USERNAME_MAX_LEN {
        return Err(ValidationError::UsernameTooLong);
    }
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::InvalidUsername);
    }
    Ok(())
}

fn non_empty_title(raw: &str, what: &'static str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyTitle(what))
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Trimmed board title; empty titles are rejected.
pub fn board_title(raw: &str) -> Result<String, ValidationError> {
    non_empty_title(raw, "Board")
}

pub fn list_title(raw: &str) -> Result<String, ValidationError> {
    non_empty_title(raw, "List")
}

/// Trimmed task title. An edit that trims to empty is rejected and the
/// previous title stays.
pub fn task_title(raw: &str) -> Result<String, ValidationError> {
    non_empty_title(raw, "Task")
}

// ── Forms ────────────────────────────────────────────────────────────

/// Input of the registration flow.
#[derive(Debug)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let password = self.password.expose_secret();
        let confirm = if self.confirm_password.expose_secret() == password {
            Ok(())
        } else {
            Err(ValidationError::PasswordMismatch)
        };
        ValidationErrors::collect([
            check_username(&self.username),
            check_email(&self.email),
            check_password_strength(password),
            confirm,
        ])
    }
}

/// Input of the login flow. Only presence is checked for the password.
#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let password = if self.password.expose_secret().is_empty() {
            Err(ValidationError::EmptyPassword)
        } else {
            Ok(())
        };
        ValidationErrors::collect([check_email(&self.email), password])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registration(username: &str, email: &str, password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            username: username.into(),
            email: email.into(),
            password: SecretString::from(password.to_owned()),
            confirm_password: SecretString::from(confirm.to_owned()),
        }
    }

    #[test]
    fn short_password_is_rejected() {
        assert_eq!(check_password_strength("abc"), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn strong_password_passes_all_classes() {
        assert_eq!(check_password_strength("Abcdefg1!"), Ok(()));
    }

    #[test]
    fn each_missing_class_is_weak() {
        for weak in ["abcdefg1!", "ABCDEFG1!", "Abcdefgh!", "Abcdefgh1"] {
            assert_eq!(
                check_password_strength(weak),
                Err(ValidationError::WeakPassword),
                "{weak}"
            );
        }
    }

    #[test]
    fn email_rules() {
        assert_eq!(check_email(""), Err(ValidationError::EmptyEmail));
        assert_eq!(check_email("ada@example"), Err(ValidationError::InvalidEmail));
        assert_eq!(check_email("ada @example.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(check_email("ada@example.com"), Ok(()));
    }

    #[test]
    fn username_rules() {
        assert_eq!(check_username(""), Err(ValidationError::EmptyUsername));
        assert_eq!(check_username("ab"), Err(ValidationError::UsernameTooShort));
        assert_eq!(check_username(&"a".repeat(21)), Err(ValidationError::UsernameTooLong));
        assert_eq!(check_username("ada-l"), Err(ValidationError::InvalidUsername));
        assert_eq!(check_username(&"a".repeat(20)), Ok(()));
        assert_eq!(check_username("ada_l"), Ok(()));
    }

    #[test]
    fn registration_reports_every_failing_field() {
        let errors = registration("ab", "nope", "abc", "abd").validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::UsernameTooShort));
        assert!(errors.contains(&ValidationError::InvalidEmail));
        assert!(errors.contains(&ValidationError::PasswordTooShort));
        assert!(errors.contains(&ValidationError::PasswordMismatch));
    }

    #[test]
    fn valid_registration() {
        let form = registration("ada_l", "ada@example.com", "Abcdefg1!", "Abcdefg1!");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn login_only_checks_presence_of_password() {
        let form = LoginForm {
            email: "ada@example.com".into(),
            password: SecretString::from("x".to_owned()),
        };
        assert!(form.validate().is_ok());

        let empty = LoginForm {
            email: "ada@example.com".into(),
            password: SecretString::from(String::new()),
        };
        assert_eq!(
            empty.validate().unwrap_err().iter().collect::<Vec<_>>(),
            vec![&ValidationError::EmptyPassword]
        );
    }

    #[test]
    fn titles_are_trimmed_and_non_empty() {
        assert_eq!(board_title("  Work  ").unwrap(), "Work");
        assert_eq!(task_title("   "), Err(ValidationError::EmptyTitle("Task")));
        assert_eq!(
            ValidationError::EmptyTitle("Board").to_string(),
            "Board title cannot be empty"
        );
    }

    #[test]
    fn errors_join_for_display() {
        let errors = registration("ada_l", "", "", "").validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Email cannot be empty; Password cannot be empty"
        );
    }
}
