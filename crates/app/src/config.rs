// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! AutoBC config
//!

use crate::AppError;
use auto_bc_core::{
    Clock, DateRangeSelector, DateWindow, FormGate, LabelStyle, OptionCodeMap, OptionKey,
    SelectionError, WindowSize,
};
use directories_next::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

const PROJECT_QUALIFIER: &str = "jp";
const ORG_NAME: &str = "AutoBC";
const APPLICATION_NAME: &str = "AutoBC";
const CONFIG_FILE_NAME: &str = "config.json";

/// The config that's saved to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Window title and dialog caption
    pub app_name: String,

    /// How many dates can be picked from
    pub window_size: WindowSize,

    /// Days between today and the first date in the window
    pub start_offset_days: i64,

    /// Minimum password length (characters)
    pub min_password_len: usize,

    /// Maximum password length (characters).  Longer input is cut down.
    pub max_password_len: usize,

    /// The print targets and their codes, in display order
    pub option_codes: OptionCodeMap,

    /// Initially selected start date (index into the window)
    pub start_date_default: usize,

    /// Initially selected end date (index into the window).  The start date if
    /// not set.
    pub end_date_default: Option<usize>,

    /// Whether every print target starts checked
    pub options_checked_by_default: bool,

    /// How the dates are labelled
    pub label_style: LabelStyle,
}

impl Default for Config {
    fn default() -> Self {
        default_config()
    }
}

impl Config {
    /// Load the config from the default location
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(&config_file_path()?)
    }

    /// Load and validate the config at `path`
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        info!("Loading config from {path:?}");
        let data = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        info!("Config loaded = {config:?}");
        Ok(config)
    }

    /// Make sure the config at the default location exists (write the defaults
    /// if not), returning its path
    pub fn ensure_setup() -> Result<PathBuf, AppError> {
        let path = config_file_path()?;
        Self::ensure_setup_at(&path)?;
        Ok(path)
    }

    /// Make sure the config at `path` exists (write the defaults if not)
    pub fn ensure_setup_at(path: &Path) -> Result<(), AppError> {
        info!("Ensuring config exists at {path:?}");
        if !path.exists() {
            info!("No config file found");
            let new_config = default_config();
            new_config.save_to(path)?;
            info!("Config created = {new_config:?}");
        };
        info!("Config is setup");
        Ok(())
    }

    /// Save to the default location
    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        self.validate()?;
        ensure_config_file_exists(path)?;
        info!("Saving config to {path:?}");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Config saved");
        Ok(())
    }

    pub fn set_to_default(&mut self) {
        *self = default_config();
    }

    /// Check the settings make sense together
    pub fn validate(&self) -> Result<(), AppError> {
        self.form_gate()?;
        let len = self.window_size.value();
        if self.start_date_default >= len {
            return Err(SelectionError::OutOfRange {
                index: self.start_date_default,
                len,
            }
            .into());
        }
        if let Some(end) = self.end_date_default {
            if end < self.start_date_default || end >= len {
                return Err(SelectionError::OutOfRange { index: end, len }.into());
            }
        }
        Ok(())
    }

    pub fn form_gate(&self) -> Result<FormGate, AppError> {
        Ok(FormGate::new(self.min_password_len, self.max_password_len)?)
    }

    /// Build the date window for today according to `clock`
    pub fn date_window(&self, clock: &impl Clock) -> Result<DateWindow, AppError> {
        Ok(DateWindow::initialize_with(
            clock,
            self.window_size.value() as i64,
            self.start_offset_days,
            self.label_style,
        )?)
    }

    /// Build the selector with the default selection applied
    pub fn date_range_selector(&self, clock: &impl Clock) -> Result<DateRangeSelector, AppError> {
        let window = self.date_window(clock)?;
        let end = self.end_date_default.unwrap_or(self.start_date_default);
        Ok(DateRangeSelector::with_selection(
            window,
            self.start_date_default,
            end,
        )?)
    }

    /// The options that start out checked
    pub fn initially_checked(&self) -> Vec<OptionKey> {
        if self.options_checked_by_default {
            self.option_codes.keys().cloned().collect()
        } else {
            Vec::new()
        }
    }
}

/// Get the default config
fn default_config() -> Config {
    Config {
        app_name: String::from("BC受付自動印刷"),
        window_size: default_window_size(),
        start_offset_days: 0,
        min_password_len: 8,
        max_password_len: 14,
        option_codes: default_option_codes(),
        start_date_default: 0,
        end_date_default: None,
        options_checked_by_default: true,
        label_style: LabelStyle::Japanese,
    }
}

fn default_window_size() -> WindowSize {
    WindowSize::try_from(7).unwrap_or_else(|error| unreachable!("{error}"))
}

/// The print targets used at the BC desk
fn default_option_codes() -> OptionCodeMap {
    OptionCodeMap::from_pairs([
        ("FSP", vec!["K11K2", "K11K4"]),
        ("#7", vec!["K11J2", "K11J5"]),
        ("#8", vec!["K11J8", "K11J9"]),
        ("基材識別票", vec!["K11K2", "K11J2", "K11J5", "K11J8"]),
    ])
    .unwrap_or_else(|error| unreachable!("{error}"))
}

/// Get the project directories (e.g. where the config is stored)
#[cfg(debug_assertions)]
fn project_dirs() -> Result<ProjectDirs, AppError> {
    debug!("Getting project directories (dev build)");
    ProjectDirs::from(
        PROJECT_QUALIFIER,
        ORG_NAME,
        &format!("{APPLICATION_NAME} Dev"),
    )
    .ok_or(AppError::ConfigDir)
}

/// Get the project directories (e.g. where the config is stored)
#[cfg(not(debug_assertions))]
fn project_dirs() -> Result<ProjectDirs, AppError> {
    debug!("Getting project directories");
    ProjectDirs::from(PROJECT_QUALIFIER, ORG_NAME, APPLICATION_NAME).ok_or(AppError::ConfigDir)
}

/// Get the path to the config
pub fn config_file_path() -> Result<PathBuf, AppError> {
    let config_file = project_dirs()?
        .config_dir()
        .to_path_buf()
        .join(CONFIG_FILE_NAME);
    debug!("Config file path = {config_file:?}");
    Ok(config_file)
}

/// Ensure the config file exists (create if it doesn't)
fn ensure_config_file_exists(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        File::create(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use auto_bc_core::FixedClock;
    use chrono::NaiveDate;
    use tempdir::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size.value(), 7);
        assert_eq!(config.option_codes.len(), 4);
        assert_eq!(config.initially_checked().len(), 4);

        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let selector = config.date_range_selector(&clock).unwrap();
        assert_eq!(selector.selection().start_index(), 0);
        assert_eq!(selector.selection().end_index(), 0);
    }

    #[test]
    fn end_date_follows_start_date_unless_set() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let mut config = Config::default();
        config.start_date_default = 2;
        let selector = config.date_range_selector(&clock).unwrap();
        assert_eq!(selector.selection().end_index(), 2);

        config.end_date_default = Some(6);
        let selector = config.date_range_selector(&clock).unwrap();
        assert_eq!(selector.selection().start_index(), 2);
        assert_eq!(selector.selection().end_index(), 6);
    }

    #[test]
    fn validate() {
        let mut config = Config::default();
        config.min_password_len = 20;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.start_date_default = 7;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.start_date_default = 3;
        config.end_date_default = Some(2);
        assert!(config.validate().is_err());
        config.end_date_default = Some(3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ensure_setup_then_load() {
        let dir = TempDir::new("auto_bc_config").unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        Config::ensure_setup_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new("auto_bc_config").unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut config = Config::default();
        config.label_style = LabelStyle::English;
        config.end_date_default = Some(3);
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);

        // Existing files are left alone
        Config::ensure_setup_at(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = TempDir::new("auto_bc_config").unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "window_size": 3, "label_style": "english" }"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.window_size.value(), 3);
        assert_eq!(config.max_password_len, 14);
        assert_eq!(config.label_style, LabelStyle::English);
    }

    #[test]
    fn bad_files_are_rejected() {
        let dir = TempDir::new("auto_bc_config").unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&path, r#"{ "window_size": 0 }"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Json(_))));

        fs::write(&path, r#"{ "min_password_len": 15 }"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Form(_))));

        fs::write(&path, r#"{ "option_codes": [] }"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Json(_))));

        assert!(matches!(
            Config::load_from(&dir.path().join("missing.json")),
            Err(AppError::Io(_))
        ));
    }
}
