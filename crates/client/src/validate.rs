// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local pre-validation: cheap, purely local checks that fail fast with
//! field-level errors before any network dispatch. Server-side validation
//! errors pass through the HTTP client separately and are never
//! reinterpreted here.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ApiError, ApiResult, FieldError};

/// Accepted email shape.
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";

/// Special characters the password policy accepts (and requires one of).
const PASSWORD_SPECIALS: &str = "@$!%*#?&";

const PASSWORD_MESSAGE: &str =
    "The password must be at least 8 characters, including letters, numbers, and special characters";

#[allow(clippy::expect_used)]
fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

/// Password policy: at least 8 characters drawn from letters, digits, and
/// the special set, with at least one of each class.
pub fn password_ok(password: &str) -> bool {
    password.len() >= 8
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c))
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

pub fn email_ok(email: &str) -> bool {
    email_regex().is_match(email)
}

fn check_email(fields: &mut Vec<FieldError>, email: &str) {
    if email.is_empty() {
        fields.push(FieldError::new("email", "Email is required"));
    } else if !email_ok(email) {
        fields.push(FieldError::new("email", "The email format is incorrect"));
    }
}

fn check_password(fields: &mut Vec<FieldError>, password: &str) {
    if password.is_empty() {
        fields.push(FieldError::new("password", "Password is required"));
    } else if !password_ok(password) {
        fields.push(FieldError::new("password", PASSWORD_MESSAGE));
    }
}

/// Validate a login form.
pub fn validate_login(email: &str, password: &str) -> ApiResult<()> {
    let mut fields = Vec::new();
    check_email(&mut fields, email);
    check_password(&mut fields, password);
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(fields))
    }
}

/// Validate a registration form, including the confirmation match. The
/// confirmation never leaves the client.
pub fn validate_registration(
    email: &str,
    password: &str,
    confirm_password: &str,
) -> ApiResult<()> {
    let mut fields = Vec::new();
    check_email(&mut fields, email);
    check_password(&mut fields, password);
    if confirm_password.is_empty() {
        fields.push(FieldError::new("confirmPassword", "Password confirmation is required"));
    } else if confirm_password != password {
        fields.push(FieldError::new("confirmPassword", "Passwords do not match"));
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(fields))
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
