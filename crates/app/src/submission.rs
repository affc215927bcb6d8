// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! What gets handed on when the form is submitted
//!

use serde::Serialize;
use std::fmt;

/// The character the password is masked with
const MASK: char = '●';

/// The form's values, frozen when a submission starts
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    /// Never serialised or printed
    #[serde(skip_serializing)]
    pub password: String,

    /// Label of the start date
    pub start_date: String,

    /// Label of the end date
    pub end_date: String,

    /// Checked print targets, in display order
    pub options: Vec<String>,

    /// `value` of every selected date
    pub dates: Vec<String>,

    /// Downstream codes of the checked print targets
    pub codes: Vec<String>,
}

impl Submission {
    /// The password with every character replaced by the mask
    pub fn masked_password(&self) -> String {
        self.password.chars().map(|_| MASK).collect()
    }
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("password", &self.masked_password())
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .field("options", &self.options)
            .field("dates", &self.dates)
            .field("codes", &self.codes)
            .finish()
    }
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Password:   {}", self.masked_password())?;
        writeln!(f, "Start date: {}", self.start_date)?;
        writeln!(f, "End date:   {}", self.end_date)?;
        writeln!(f, "Options:    {}", self.options.join(", "))?;
        writeln!(f, "Dates:      {}", self.dates.join(", "))?;
        write!(f, "Codes:      {}", self.codes.join(", "))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn submission() -> Submission {
        Submission {
            password: String::from("secret123"),
            start_date: String::from("6月3日（月）"),
            end_date: String::from("6月4日（火）"),
            options: vec![String::from("FSP")],
            dates: vec![String::from("24/06/03"), String::from("24/06/04")],
            codes: vec![String::from("K11K2"), String::from("K11K4")],
        }
    }

    #[test]
    fn password_never_shown() {
        let submission = submission();
        assert_eq!(submission.masked_password(), "●●●●●●●●●");
        assert!(!submission.to_string().contains("secret123"));
        assert!(!format!("{submission:?}").contains("secret123"));
        assert!(!serde_json::to_string(&submission).unwrap().contains("secret123"));
    }

    #[test]
    fn display() {
        let text = submission().to_string();
        assert!(text.contains("Dates:      24/06/03, 24/06/04"));
        assert!(text.ends_with("Codes:      K11K2, K11K4"));
    }
}
