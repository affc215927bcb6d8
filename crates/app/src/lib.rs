// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! *Part of the wider AutoBC project*
//!
//! This library crate is what a front end (desktop window, command line) talks
//! to.  It loads the config, builds the form from it and turns user input into
//! calls on the `auto-bc-core` rules.
//!

mod config;
mod form_session;
mod submission;

pub use config::{Config, config_file_path};
pub use form_session::FormSession;
pub use submission::Submission;

use auto_bc_core::{FormError, OptionError, SelectionError, SessionError, WindowError};
use thiserror::Error;

#[macro_use]
extern crate log;

/// Errors that can be returned by the AutoBC application layer
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unable to find the config directory")]
    ConfigDir,

    #[error("No submission is running")]
    NoSubmission,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Window(#[from] WindowError),

    #[error("{0}")]
    Selection(#[from] SelectionError),

    #[error("{0}")]
    Form(#[from] FormError),

    #[error("{0}")]
    Option(#[from] OptionError),

    #[error("{0}")]
    Session(#[from] SessionError),
}

/// The greeting shown at the top of the form
pub fn greet(user: &str) -> String {
    format!(
        "{user}さん、おつかれさまです！\nBC受付のパスワードと印刷範囲を入力してください。"
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn greeting_names_the_user() {
        let greeting = greet("yamada");
        assert!(greeting.starts_with("yamadaさん"));
        assert_eq!(greeting.lines().count(), 2);
    }
}
