// SPDX-License-Identifier: MIT

//!
//! Whether the form may be submitted
//!

use crate::{ErrorKind, OptionKey};
use log::debug;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can arise when setting up a [`FormGate`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Minimum password length {min} is greater than the maximum {max}")]
    InvalidPasswordBounds { min: usize, max: usize },
}

impl FormError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidConfiguration
    }
}

/// Password length in characters (not bytes)
pub fn password_len(password: &str) -> usize {
    password.chars().count()
}

/// True iff the password length is within `min_len..=max_len` and at least one
/// option is checked
pub fn can_submit(
    password: &str,
    checked_options: &BTreeSet<OptionKey>,
    min_len: usize,
    max_len: usize,
) -> bool {
    (min_len..=max_len).contains(&password_len(password)) && !checked_options.is_empty()
}

/// The first `max_len` characters of the password
pub fn clamp_password(password: &str, max_len: usize) -> String {
    match password.char_indices().nth(max_len) {
        Some((byte_index, _)) => password[..byte_index].to_string(),
        None => password.to_string(),
    }
}

/// Why the form can or can't be submitted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubmitValidity {
    Valid,
    Invalid(String),
}

impl SubmitValidity {
    pub fn is_valid(&self) -> bool {
        *self == SubmitValidity::Valid
    }

    pub fn invalid_msg(&self) -> Option<&str> {
        match self {
            SubmitValidity::Valid => None,
            SubmitValidity::Invalid(msg) => Some(msg),
        }
    }
}

/// The password length bounds that decide whether "submit" is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormGate {
    min_password_len: usize,
    max_password_len: usize,
}

impl FormGate {
    /// Create a new gate if `min <= max`
    pub fn new(min_password_len: usize, max_password_len: usize) -> Result<Self, FormError> {
        if min_password_len > max_password_len {
            return Err(FormError::InvalidPasswordBounds {
                min: min_password_len,
                max: max_password_len,
            });
        }
        Ok(Self {
            min_password_len,
            max_password_len,
        })
    }

    pub fn min_password_len(&self) -> usize {
        self.min_password_len
    }

    pub fn max_password_len(&self) -> usize {
        self.max_password_len
    }

    pub fn can_submit(&self, state: &FormState) -> bool {
        can_submit(
            &state.password,
            &state.checked_options,
            self.min_password_len,
            self.max_password_len,
        )
    }

    /// Same answer as [`FormGate::can_submit`], with the reason when it isn't
    pub fn validity(&self, state: &FormState) -> SubmitValidity {
        let len = password_len(&state.password);
        if len < self.min_password_len {
            SubmitValidity::Invalid(format!(
                "Password must be at least {} characters",
                self.min_password_len
            ))
        } else if len > self.max_password_len {
            SubmitValidity::Invalid(format!(
                "Password must be at most {} characters",
                self.max_password_len
            ))
        } else if state.checked_options.is_empty() {
            SubmitValidity::Invalid(String::from("No print target is checked"))
        } else {
            SubmitValidity::Valid
        }
    }

    pub fn clamp(&self, password: &str) -> String {
        clamp_password(password, self.max_password_len)
    }
}

/// What the presentation layer needs to know after an input changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormUpdate {
    /// The password was cut down and the visible input must be updated
    pub password_clamped: bool,

    /// Whether "submit" is now enabled
    pub can_submit: bool,
}

/// The password and the checked options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    password: String,
    checked_options: BTreeSet<OptionKey>,
}

impl FormState {
    pub fn new<S: ToString>(password: S, checked_options: BTreeSet<OptionKey>) -> Self {
        Self {
            password: password.to_string(),
            checked_options,
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn checked_options(&self) -> &BTreeSet<OptionKey> {
        &self.checked_options
    }

    pub fn is_checked(&self, key: &OptionKey) -> bool {
        self.checked_options.contains(key)
    }

    pub fn set_password<S: ToString>(&mut self, password: S) {
        self.password = password.to_string();
    }

    pub fn set_checked(&mut self, key: OptionKey, checked: bool) {
        if checked {
            self.checked_options.insert(key);
        } else {
            self.checked_options.remove(&key);
        }
    }

    /// Clamp the password and recompute whether the form can be submitted.
    /// To be called after every change to the password or the checkboxes.
    pub fn on_form_state_changed(&mut self, gate: &FormGate) -> FormUpdate {
        let clamped = gate.clamp(&self.password);
        let password_clamped = clamped != self.password;
        if password_clamped {
            debug!(
                "Password clamped to {} characters",
                gate.max_password_len()
            );
            self.password = clamped;
        }
        FormUpdate {
            password_clamped,
            can_submit: gate.can_submit(self),
        }
    }
}
