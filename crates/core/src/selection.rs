// SPDX-License-Identifier: MIT

//!
//! Start and end date selection over a [`DateWindow`]
//!
//! The end date choices are always a suffix of the window that begins at the
//! selected start date, so "the end is not before the start" is just
//! `start_index <= end_index`.
//!

use crate::{DateOption, DateWindow, ErrorKind};
use log::debug;
use std::cell::Cell;
use thiserror::Error;

/// Errors that can arise when selecting dates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// An index does not point into the list it was meant for
    #[error("Index `{index}` is out of range (there are {len} dates to choose from)")]
    OutOfRange { index: usize, len: usize },
}

impl SelectionError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::OutOfRange
    }
}

/// The selected start and end dates, as indices into the full window.
///
/// Always `start_index <= end_index < window.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    start_index: usize,
    end_index: usize,
}

impl Selection {
    /// Create a new [`Selection`] if it is valid for the window
    pub fn new(
        window: &DateWindow,
        start_index: usize,
        end_index: usize,
    ) -> Result<Self, SelectionError> {
        let len = window.len();
        if start_index >= len {
            return Err(SelectionError::OutOfRange {
                index: start_index,
                len,
            });
        }
        if end_index < start_index || end_index >= len {
            return Err(SelectionError::OutOfRange {
                index: end_index,
                len,
            });
        }
        Ok(Self {
            start_index,
            end_index,
        })
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Index of the end date in the full window
    pub fn end_index(&self) -> usize {
        self.end_index
    }

    /// Index of the end date in the end date choices
    pub fn end_index_in_suffix(&self) -> usize {
        self.end_index - self.start_index
    }
}

/// What the end date list looks like after the start date changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndDateChoices<'a> {
    /// The new start index (full window)
    pub start_index: usize,

    /// The dates the end may now be chosen from, starting at the start date
    pub options: &'a [DateOption],

    /// The end index to use from now on (full window)
    pub adjusted_end_index: usize,

    /// Whether the previous end had to be moved to the first choice
    pub reset: bool,
}

impl EndDateChoices<'_> {
    /// The adjusted end as an index into [`EndDateChoices::options`]
    pub fn end_index_in_suffix(&self) -> usize {
        self.adjusted_end_index - self.start_index
    }
}

impl DateWindow {
    /// The dates from `start_index` (inclusive) to the end of the window
    pub fn suffix(&self, start_index: usize) -> Result<&[DateOption], SelectionError> {
        if start_index >= self.len() {
            return Err(SelectionError::OutOfRange {
                index: start_index,
                len: self.len(),
            });
        }
        Ok(&self.options()[start_index..])
    }

    /// Work out the end date choices for a new start date.
    ///
    /// `current_end_index` is the end the user had selected before, as an index
    /// into the full window.  It is kept if it is still a valid choice,
    /// otherwise the end moves to the new start date.
    pub fn end_date_choices(
        &self,
        new_start_index: usize,
        current_end_index: usize,
    ) -> Result<EndDateChoices<'_>, SelectionError> {
        let options = self.suffix(new_start_index)?;
        let reset = current_end_index < new_start_index || current_end_index >= self.len();
        let adjusted_end_index = if reset {
            new_start_index
        } else {
            current_end_index
        };
        Ok(EndDateChoices {
            start_index: new_start_index,
            options,
            adjusted_end_index,
            reset,
        })
    }

    /// The `value` of every date from `start_index` through
    /// `start_index + end_index_in_suffix` inclusive
    pub fn resolve_selected_range(
        &self,
        start_index: usize,
        end_index_in_suffix: usize,
    ) -> Result<Vec<String>, SelectionError> {
        let suffix = self.suffix(start_index)?;
        let selected = suffix
            .get(..=end_index_in_suffix)
            .ok_or(SelectionError::OutOfRange {
                index: end_index_in_suffix,
                len: suffix.len(),
            })?;
        Ok(selected
            .iter()
            .map(|option| option.value().to_string())
            .collect())
    }
}

/// The result of asking the selector to apply a new start date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDateChange<'a> {
    /// The change was applied
    Applied(EndDateChoices<'a>),

    /// Another start date change was still being applied, nothing was touched
    Suppressed,
}

/// Marks that a start date change is in progress.  Clears the flag on drop.
struct UpdateGuard<'a>(&'a Cell<bool>);

impl<'a> UpdateGuard<'a> {
    fn acquire(updating: &'a Cell<bool>) -> Option<Self> {
        if updating.replace(true) {
            None
        } else {
            Some(Self(updating))
        }
    }
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Owns the date window and the current [`Selection`], and keeps the end date
/// from ever falling before the start date.
///
/// The event handlers take `&self` because the presentation layer reacts to
/// their results (e.g. redrawing the end date list) and that reaction can
/// call straight back into the selector.  A start date change that arrives
/// while another is still being applied is dropped without touching any
/// state.
#[derive(Debug)]
pub struct DateRangeSelector {
    window: DateWindow,
    selection: Cell<Selection>,
    updating: Cell<bool>,
}

impl DateRangeSelector {
    /// Select the first date as both start and end
    pub fn new(window: DateWindow) -> Result<Self, SelectionError> {
        Self::with_selection(window, 0, 0)
    }

    /// Start from the given selection
    pub fn with_selection(
        window: DateWindow,
        start_index: usize,
        end_index: usize,
    ) -> Result<Self, SelectionError> {
        let selection = Selection::new(&window, start_index, end_index)?;
        Ok(Self {
            window,
            selection: Cell::new(selection),
            updating: Cell::new(false),
        })
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    pub fn selection(&self) -> Selection {
        self.selection.get()
    }

    /// The dates the end may currently be chosen from
    pub fn end_options(&self) -> &[DateOption] {
        &self.window.options()[self.selection.get().start_index..]
    }

    pub fn start_option(&self) -> &DateOption {
        &self.window[self.selection.get().start_index]
    }

    pub fn end_option(&self) -> &DateOption {
        &self.window[self.selection.get().end_index]
    }

    /// Whether a start date change is being applied right now
    pub fn is_updating(&self) -> bool {
        self.updating.get()
    }

    /// Apply a new start date
    pub fn on_start_date_changed(
        &self,
        new_start_index: usize,
    ) -> Result<StartDateChange<'_>, SelectionError> {
        self.on_start_date_changed_with(new_start_index, |_, _| ())
    }

    /// Apply a new start date, then run `react` while the change is still in
    /// progress.  Start date changes triggered from inside `react` are
    /// suppressed.
    pub fn on_start_date_changed_with<F>(
        &self,
        new_start_index: usize,
        react: F,
    ) -> Result<StartDateChange<'_>, SelectionError>
    where
        F: FnOnce(&Self, &EndDateChoices<'_>),
    {
        let Some(_guard) = UpdateGuard::acquire(&self.updating) else {
            debug!("Start date change to {new_start_index} suppressed (already updating)");
            return Ok(StartDateChange::Suppressed);
        };

        let current = self.selection.get();
        let choices = self
            .window
            .end_date_choices(new_start_index, current.end_index)?;
        let selection = Selection {
            start_index: choices.start_index,
            end_index: choices.adjusted_end_index,
        };
        if selection != current {
            debug!("Date selection changed: {current:?} -> {selection:?}");
        }
        if choices.reset {
            debug!("End date reset to the new start date");
        }
        self.selection.set(selection);

        react(self, &choices);
        Ok(StartDateChange::Applied(choices))
    }

    /// Apply a new end date, given as an index into [`Self::end_options`]
    pub fn on_end_date_selected(
        &self,
        end_index_in_suffix: usize,
    ) -> Result<Selection, SelectionError> {
        let current = self.selection.get();
        let selection = Selection::new(
            &self.window,
            current.start_index,
            current.start_index.saturating_add(end_index_in_suffix),
        )
        .map_err(|_| SelectionError::OutOfRange {
            index: end_index_in_suffix,
            len: self.end_options().len(),
        })?;
        if selection != current {
            debug!("Date selection changed: {current:?} -> {selection:?}");
        }
        self.selection.set(selection);
        Ok(selection)
    }

    /// The `value` of every selected date, start to end inclusive
    pub fn resolve_selected_range(&self) -> Vec<String> {
        let selection = self.selection.get();
        self.window.options()[selection.start_index..=selection.end_index]
            .iter()
            .map(|option| option.value().to_string())
            .collect()
    }
}
