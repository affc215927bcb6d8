// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! One open form: its inputs, its date selection and its submission lifecycle
//!

use crate::{AppError, Config, Submission};
use auto_bc_core::{
    Clock, DateRangeSelector, EndDateChoices, FormGate, FormState, FormUpdate, OptionCodeMap,
    OptionKey, Selection, SessionError, SessionState, StartDateChange, SubmissionLifecycle,
    SubmitValidity,
};
use std::collections::BTreeSet;

/// Everything behind one open form.
///
/// The front end calls the `on_*` methods as the user types and clicks, then
/// redraws from the getters.  Inputs are only accepted while idle; once a
/// submission starts its values are frozen in a [`Submission`].
#[derive(Debug)]
pub struct FormSession {
    options: OptionCodeMap,
    gate: FormGate,
    selector: DateRangeSelector,
    form: FormState,
    lifecycle: SubmissionLifecycle,
    submission: Option<Submission>,
}

impl FormSession {
    /// Create the form as configured, with dates counted from `clock`'s today
    pub fn new(config: &Config, clock: &impl Clock) -> Result<Self, AppError> {
        config.validate()?;
        let mut form = FormState::default();
        for key in config.initially_checked() {
            form.set_checked(key, true);
        }
        Ok(Self {
            options: config.option_codes.clone(),
            gate: config.form_gate()?,
            selector: config.date_range_selector(clock)?,
            form,
            lifecycle: SubmissionLifecycle::new(),
            submission: None,
        })
    }

    pub fn options(&self) -> &OptionCodeMap {
        &self.options
    }

    pub fn selector(&self) -> &DateRangeSelector {
        &self.selector
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn state(&self) -> SessionState {
        self.lifecycle.state()
    }

    pub fn can_submit(&self) -> bool {
        self.lifecycle.accepts_input() && self.gate.can_submit(&self.form)
    }

    pub fn validity(&self) -> SubmitValidity {
        self.gate.validity(&self.form)
    }

    /// The frozen values of the running submission
    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    pub fn close_requires_confirmation(&self) -> bool {
        self.lifecycle.close_requires_confirmation()
    }

    //--------------------------------------------------------------------------
    // Inputs
    //--------------------------------------------------------------------------

    /// The password input changed
    pub fn on_password_changed<S: ToString>(&mut self, password: S) -> Result<FormUpdate, AppError> {
        self.lifecycle.ensure_accepts_input()?;
        self.form.set_password(password);
        Ok(self.on_form_state_changed())
    }

    /// A print target checkbox changed
    pub fn on_option_toggled(&mut self, label: &str, checked: bool) -> Result<FormUpdate, AppError> {
        self.lifecycle.ensure_accepts_input()?;
        let key = self.options.key(label)?.clone();
        self.form.set_checked(key, checked);
        Ok(self.on_form_state_changed())
    }

    /// Check exactly the given print targets and uncheck the rest.  Nothing
    /// changes if any label is unknown.
    pub fn on_options_selected<S: AsRef<str>>(
        &mut self,
        labels: &[S],
    ) -> Result<FormUpdate, AppError> {
        self.lifecycle.ensure_accepts_input()?;
        let wanted = labels
            .iter()
            .map(|label| self.options.key(label.as_ref()).cloned())
            .collect::<Result<BTreeSet<OptionKey>, _>>()?;
        for key in self.options.keys() {
            self.form.set_checked(key.clone(), wanted.contains(key));
        }
        Ok(self.on_form_state_changed())
    }

    /// Clamp the password and recompute whether submitting is allowed
    pub fn on_form_state_changed(&mut self) -> FormUpdate {
        self.form.on_form_state_changed(&self.gate)
    }

    /// The start date selection changed
    pub fn on_start_date_changed(
        &self,
        new_start_index: usize,
    ) -> Result<StartDateChange<'_>, AppError> {
        self.on_start_date_changed_with(new_start_index, |_, _| ())
    }

    /// The start date selection changed, `react` redraws the end date list
    /// while the change is still in progress.  Start date changes coming from
    /// inside `react` are suppressed.
    pub fn on_start_date_changed_with<F>(
        &self,
        new_start_index: usize,
        react: F,
    ) -> Result<StartDateChange<'_>, AppError>
    where
        F: FnOnce(&DateRangeSelector, &EndDateChoices<'_>),
    {
        self.lifecycle.ensure_accepts_input()?;
        Ok(self
            .selector
            .on_start_date_changed_with(new_start_index, react)?)
    }

    /// The end date selection changed (index into the end date choices)
    pub fn on_end_date_selected(&self, end_index_in_suffix: usize) -> Result<Selection, AppError> {
        self.lifecycle.ensure_accepts_input()?;
        Ok(self.selector.on_end_date_selected(end_index_in_suffix)?)
    }

    //--------------------------------------------------------------------------
    // Lifecycle
    //--------------------------------------------------------------------------

    /// Freeze the inputs and start running
    pub fn submit(&mut self) -> Result<&Submission, AppError> {
        if let SubmitValidity::Invalid(reason) = self.validity() {
            return Err(SessionError::CannotSubmit(reason).into());
        }
        let submission = self.snapshot()?;
        self.lifecycle.submit(&SubmitValidity::Valid)?;
        info!("Submission started: {submission:?}");
        Ok(self.submission.insert(submission))
    }

    /// The user asked to stop the running submission
    pub fn cancel(&mut self) -> Result<(), AppError> {
        Ok(self.lifecycle.cancel()?)
    }

    /// The user confirmed the cancel, the form becomes editable again
    pub fn confirm_cancel(&mut self) -> Result<(), AppError> {
        self.lifecycle.confirm_cancel()?;
        self.submission = None;
        info!("Submission cancelled");
        Ok(())
    }

    /// The user changed their mind, keep running
    pub fn decline_cancel(&mut self) -> Result<(), AppError> {
        Ok(self.lifecycle.decline_cancel()?)
    }

    /// The submission finished; hands back what was submitted
    pub fn complete(&mut self) -> Result<Submission, AppError> {
        self.lifecycle.complete()?;
        info!("Submission complete");
        self.submission.take().ok_or(AppError::NoSubmission)
    }

    /// Capture the current inputs
    fn snapshot(&self) -> Result<Submission, AppError> {
        let checked = self.form.checked_options();
        Ok(Submission {
            password: self.form.password().to_string(),
            start_date: self.selector.start_option().display().to_string(),
            end_date: self.selector.end_option().display().to_string(),
            options: self
                .options
                .checked_in_order(checked)
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            dates: self.selector.resolve_selected_range(),
            codes: self.options.resolve_codes(checked)?,
        })
    }
}
