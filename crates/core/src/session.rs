// SPDX-License-Identifier: MIT

//!
//! The submission lifecycle (idle, running, confirming a cancel)
//!

use crate::SubmitValidity;
use log::debug;
use thiserror::Error;

/// Where the submission lifecycle is
#[derive(derive_more::Display, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Waiting for input (inputs may change)
    #[default]
    #[display("idle")]
    Idle,

    /// A submission is running (inputs are frozen)
    #[display("running")]
    Running,

    /// The user asked to cancel and hasn't confirmed yet
    #[display("confirming cancel")]
    ConfirmingCancel,
}

/// What can happen to the lifecycle
#[derive(derive_more::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    #[display("submit")]
    Submit,

    #[display("cancel")]
    Cancel,

    #[display("confirm cancel")]
    ConfirmCancel,

    #[display("decline cancel")]
    DeclineCancel,

    #[display("complete")]
    ProcessCompleted,
}

/// Errors that can arise when driving the lifecycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {event} while {from}")]
    InvalidTransition {
        from: SessionState,
        event: SessionEvent,
    },

    #[error("Cannot submit: {0}")]
    CannotSubmit(String),

    #[error("Inputs cannot change while {0}")]
    InputsFrozen(SessionState),
}

impl SessionState {
    /// The state `event` leads to from here, if it is allowed
    pub fn next(self, event: SessionEvent) -> Result<SessionState, SessionError> {
        use SessionEvent::*;
        use SessionState::*;
        match (self, event) {
            (Idle, Submit) => Ok(Running),
            (Running, Cancel) => Ok(ConfirmingCancel),
            (Running, ProcessCompleted) => Ok(Idle),
            (ConfirmingCancel, ConfirmCancel) => Ok(Idle),
            (ConfirmingCancel, DeclineCancel) => Ok(Running),
            (from, event) => Err(SessionError::InvalidTransition { from, event }),
        }
    }
}

/// Tracks the [`SessionState`] of one form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionLifecycle {
    state: SessionState,
}

impl SubmissionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Inputs may only change while idle
    pub fn accepts_input(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Closing the window needs the user to confirm unless idle
    pub fn close_requires_confirmation(&self) -> bool {
        self.state != SessionState::Idle
    }

    /// Error unless inputs may change
    pub fn ensure_accepts_input(&self) -> Result<(), SessionError> {
        if self.accepts_input() {
            Ok(())
        } else {
            Err(SessionError::InputsFrozen(self.state))
        }
    }

    /// Start running, if the form is valid
    pub fn submit(&mut self, validity: &SubmitValidity) -> Result<(), SessionError> {
        if let SubmitValidity::Invalid(reason) = validity {
            return Err(SessionError::CannotSubmit(reason.clone()));
        }
        self.apply(SessionEvent::Submit)
    }

    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.apply(SessionEvent::Cancel)
    }

    pub fn confirm_cancel(&mut self) -> Result<(), SessionError> {
        self.apply(SessionEvent::ConfirmCancel)
    }

    pub fn decline_cancel(&mut self) -> Result<(), SessionError> {
        self.apply(SessionEvent::DeclineCancel)
    }

    pub fn complete(&mut self) -> Result<(), SessionError> {
        self.apply(SessionEvent::ProcessCompleted)
    }

    fn apply(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        let next = self.state.next(event)?;
        debug!("Session state changed: {} -> {next} ({event})", self.state);
        self.state = next;
        Ok(())
    }
}
