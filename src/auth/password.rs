// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password policy and credential hashing.
//!
//! Hashing uses bcrypt with a fixed work factor; the output embeds its salt
//! and parameters, so verification needs no side-channel state. The email
//! shape check lives here so registration, login and admin provisioning all
//! validate through the same surface.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed bcrypt work factor.
pub const HASH_COST: u32 = 12;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Fixed punctuation set accepted as password symbols.
const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?~`";

/// Conservative `local@domain.tld` email shape.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email regex compiles")
});

/// Check password strength: length >= 8 with at least one uppercase letter,
/// one lowercase letter and one symbol from the fixed set. Pure function.
pub fn validate_strength(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

/// Hash a password with the fixed work factor.
pub fn hash(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, HASH_COST)
}

/// Verify a password against a stored hash.
///
/// A malformed hash is treated as a non-match rather than an error; callers
/// never need to distinguish the two.
pub fn verify(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}

/// Check the email shape used uniformly across registration, login and
/// provisioning.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
