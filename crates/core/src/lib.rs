// SPDX-License-Identifier: MIT

//!
//! *Part of the wider AutoBC project*
//!
//! This crate holds the rules behind the AutoBC print form, free of any GUI
//! toolkit:
//!
//! - the window of selectable dates and the start/end selection over it
//!   (the end date is never before the start date)
//! - whether the form may be submitted (password length, at least one print
//!   target checked)
//! - the submission lifecycle
//!
//! The presentation layer owns the widgets, feeds user input into the `on_*`
//! entry points and renders whatever comes back.  Nothing here reads the
//! clock, the environment or any other global state; the caller passes it in.
//!

mod date;
mod form;
mod option;
mod selection;
mod session;

pub use date::*;
pub use form::*;
pub use option::*;
pub use selection::*;
pub use session::*;

/// The two broad classes of error.  Both are precondition violations that the
/// presentation layer should make impossible (it only hands back indices from
/// lists it was given), so they are surfaced rather than recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidConfiguration,
    OutOfRange,
}
