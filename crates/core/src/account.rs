//! Account form rules: registration and profile self-update.
//!
//! Uniqueness of username and email needs the database, so the cleaning
//! functions here only check shape; the handlers add uniqueness errors with
//! [`USERNAME_TAKEN_MESSAGE`] / [`EMAIL_TAKEN_MESSAGE`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::validation::{
    clean_text, reject_null_characters, FieldErrors, NULL_CHARACTERS_MESSAGE, REQUIRED_MESSAGE,
};

/// Minimum password length accepted on registration and password change.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const USERNAME_MAX: usize = 150;
pub const PERSON_NAME_MIN: usize = 3;
pub const PERSON_NAME_MAX: usize = 30;

pub const USERNAME_TAKEN_MESSAGE: &str = "A user with that username already exists.";
pub const EMAIL_TAKEN_MESSAGE: &str = "This email address is already in use.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "The two password fields didn't match.";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

/// Registration form as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
}

/// Profile update form as submitted. Password fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
}

/// Cleaned account fields shared by registration and profile update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInput {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Plaintext password to hash; `None` leaves the stored hash unchanged.
    pub password: Option<String>,
}

impl RegisterForm {
    pub fn clean(&self) -> Result<AccountInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut input = clean_identity(
            &self.username,
            &self.first_name,
            &self.last_name,
            &self.email,
            &mut errors,
        );

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED_MESSAGE);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED_MESSAGE);
        }
        if !self.password1.is_empty() && !self.password2.is_empty() {
            input.password = clean_password_pair(&self.password1, &self.password2, &mut errors);
        }

        errors.into_result(input)
    }
}

impl ProfileForm {
    /// Pre-fill from the stored account.
    pub fn new(username: &str, first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    pub fn clean(&self) -> Result<AccountInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut input = clean_identity(
            &self.username,
            &self.first_name,
            &self.last_name,
            &self.email,
            &mut errors,
        );

        if !self.password1.is_empty() || !self.password2.is_empty() {
            input.password = clean_password_pair(&self.password1, &self.password2, &mut errors);
        }

        errors.into_result(input)
    }
}

fn clean_identity(
    username: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
    errors: &mut FieldErrors,
) -> AccountInput {
    let input = AccountInput {
        username: clean_text(username),
        first_name: clean_text(first_name),
        last_name: clean_text(last_name),
        email: clean_text(email),
        password: None,
    };

    reject_null_characters(
        &[
            ("username", username),
            ("first_name", first_name),
            ("last_name", last_name),
            ("email", email),
        ],
        errors,
    );

    if !errors.contains("username") {
        if let Err(msg) = validate_username(&input.username) {
            errors.add("username", msg);
        }
    }
    for (field, value) in [
        ("first_name", &input.first_name),
        ("last_name", &input.last_name),
    ] {
        if errors.contains(field) {
            continue;
        }
        if let Err(msg) = validate_person_name(value) {
            errors.add(field, msg);
        }
    }
    if !errors.contains("email") {
        if input.email.is_empty() {
            errors.add("email", REQUIRED_MESSAGE);
        } else if !input.email.validate_email() {
            errors.add("email", "Enter a valid email address.");
        }
    }

    input
}

fn clean_password_pair(
    password1: &str,
    password2: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    if password1.contains('\0') {
        errors.add("password1", NULL_CHARACTERS_MESSAGE);
        return None;
    }
    if password1 != password2 {
        errors.add("password2", PASSWORD_MISMATCH_MESSAGE);
        return None;
    }
    match validate_password_strength(password1, MIN_PASSWORD_LENGTH) {
        Ok(()) => Some(password1.to_string()),
        Err(messages) => {
            for msg in messages {
                errors.add("password1", msg);
            }
            None
        }
    }
}

/// Usernames: required, at most 150 characters of letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }
    if username.chars().count() > USERNAME_MAX {
        return Err(format!(
            "Ensure this value has at most {USERNAME_MAX} characters."
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(
            "Enter a valid username. This value may contain only letters, numbers, \
             and @/./+/-/_ characters."
                .to_string(),
        );
    }
    Ok(())
}

fn validate_person_name(name: &str) -> Result<(), String> {
    let len = name.chars().count();
    if len == 0 {
        return Err(REQUIRED_MESSAGE.to_string());
    }
    if len < PERSON_NAME_MIN {
        return Err(format!(
            "Ensure this value has at least {PERSON_NAME_MIN} characters."
        ));
    }
    if len > PERSON_NAME_MAX {
        return Err(format!(
            "Ensure this value has at most {PERSON_NAME_MAX} characters."
        ));
    }
    Ok(())
}

/// Validate that a password meets minimum strength requirements.
///
/// Returns every failed rule so the form can show them together.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();
    if password.chars().count() < min_length {
        problems.push(format!(
            "This password is too short. It must contain at least {min_length} characters."
        ));
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}
