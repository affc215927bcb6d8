// SPDX-License-Identifier: MIT

//!
//! Print options (the checkboxes) and the downstream codes they stand for
//!

use crate::ErrorKind;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// Errors that can arise in relation to options and their codes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("Option key cannot be empty")]
    EmptyKey,

    #[error("Option `{0}` is configured more than once")]
    DuplicateKey(String),

    #[error("Option `{0}` has no codes")]
    NoCodes(String),

    #[error("Option code for `{0}` cannot be empty")]
    EmptyCode(String),

    #[error("No options are configured")]
    NoOptions,

    #[error("Option `{0}` is not configured")]
    Unknown(String),
}

impl OptionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OptionError::Unknown(_) => ErrorKind::OutOfRange,
            _ => ErrorKind::InvalidConfiguration,
        }
    }
}

/// The user facing label of an option, e.g. `FSP`.  Any string that is not
/// empty once trimmed.
#[derive(derive_more::Display, Serialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct OptionKey(String);

impl OptionKey {
    /// Create a new key if it will be valid
    pub fn from<S: ToString>(key: S) -> Result<Self, OptionError> {
        let key = key.to_string();
        if key.trim().is_empty() {
            Err(OptionError::EmptyKey)
        } else {
            Ok(OptionKey(key.trim().to_string()))
        }
    }

    /// Get the underlying `&str`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for OptionKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        OptionKey::from(string).map_err(serde::de::Error::custom)
    }
}

/// One row of the option table
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OptionEntry {
    pub key: OptionKey,
    pub codes: Vec<String>,
}

/// The ordered table from option key to one or more downstream codes.
///
/// Order matters: it is the order the options are shown in and the order codes
/// are resolved in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<OptionEntry>", into = "Vec<OptionEntry>")]
pub struct OptionCodeMap(Vec<OptionEntry>);

impl TryFrom<Vec<OptionEntry>> for OptionCodeMap {
    type Error = OptionError;
    fn try_from(entries: Vec<OptionEntry>) -> Result<Self, Self::Error> {
        if entries.is_empty() {
            return Err(OptionError::NoOptions);
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.key.as_str()) {
                return Err(OptionError::DuplicateKey(entry.key.to_string()));
            }
            if entry.codes.is_empty() {
                return Err(OptionError::NoCodes(entry.key.to_string()));
            }
            if entry.codes.iter().any(|code| code.trim().is_empty()) {
                return Err(OptionError::EmptyCode(entry.key.to_string()));
            }
        }
        Ok(OptionCodeMap(entries))
    }
}

impl From<OptionCodeMap> for Vec<OptionEntry> {
    fn from(map: OptionCodeMap) -> Self {
        map.0
    }
}

impl OptionCodeMap {
    /// Build the table from `(key, codes)` pairs, keeping their order
    pub fn from_pairs<K, C, I>(pairs: I) -> Result<Self, OptionError>
    where
        K: ToString,
        C: ToString,
        I: IntoIterator<Item = (K, Vec<C>)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(key, codes)| {
                Ok(OptionEntry {
                    key: OptionKey::from(key)?,
                    codes: codes.iter().map(ToString::to_string).collect(),
                })
            })
            .collect::<Result<Vec<_>, OptionError>>()?;
        Self::try_from(entries)
    }

    pub fn entries(&self) -> &[OptionEntry] {
        &self.0
    }

    /// The keys in table order
    pub fn keys(&self) -> impl Iterator<Item = &OptionKey> {
        self.0.iter().map(|entry| &entry.key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look a key up by its label
    pub fn key(&self, label: &str) -> Result<&OptionKey, OptionError> {
        self.keys()
            .find(|key| key.as_str() == label.trim())
            .ok_or_else(|| OptionError::Unknown(label.to_string()))
    }

    pub fn codes_for(&self, key: &OptionKey) -> Option<&[String]> {
        self.0
            .iter()
            .find(|entry| &entry.key == key)
            .map(|entry| entry.codes.as_slice())
    }

    /// The codes for every checked option, in table order.  A code shared by
    /// several checked options is listed once, where it first appears.
    pub fn resolve_codes(&self, checked: &BTreeSet<OptionKey>) -> Result<Vec<String>, OptionError> {
        if let Some(unknown) = checked.iter().find(|key| self.codes_for(key).is_none()) {
            return Err(OptionError::Unknown(unknown.to_string()));
        }
        let mut seen = HashSet::new();
        Ok(self
            .0
            .iter()
            .filter(|entry| checked.contains(&entry.key))
            .flat_map(|entry| entry.codes.iter())
            .filter(|code| seen.insert(code.as_str()))
            .cloned()
            .collect())
    }

    /// The checked keys in table order
    pub fn checked_in_order<'a>(&'a self, checked: &'a BTreeSet<OptionKey>) -> Vec<&'a OptionKey> {
        self.keys().filter(|key| checked.contains(*key)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table() -> OptionCodeMap {
        OptionCodeMap::from_pairs([
            ("FSP", vec!["K11K2", "K11K4"]),
            ("#7", vec!["K11J2", "K11J5"]),
            ("#8", vec!["K11J8", "K11J9"]),
            ("基材識別票", vec!["K11K2", "K11J2", "K11J5", "K11J8"]),
        ])
        .unwrap()
    }

    fn checked(labels: &[&str]) -> BTreeSet<OptionKey> {
        labels.iter().map(|label| OptionKey::from(label).unwrap()).collect()
    }

    #[test]
    fn option_key_from() {
        assert!(OptionKey::from("").is_err());
        assert!(OptionKey::from("  ").is_err());
        assert_eq!(OptionKey::from(" FSP ").unwrap(), OptionKey::from("FSP").unwrap());
        assert!(serde_json::from_str::<OptionKey>(r#"" ""#).is_err());
    }

    #[test]
    fn table_is_validated() {
        assert_eq!(
            OptionCodeMap::from_pairs([("FSP", vec!["A"]), ("FSP", vec!["B"])]).unwrap_err(),
            OptionError::DuplicateKey(String::from("FSP"))
        );
        assert_eq!(
            OptionCodeMap::from_pairs([("FSP", Vec::<&str>::new())]).unwrap_err(),
            OptionError::NoCodes(String::from("FSP"))
        );
        assert_eq!(
            OptionCodeMap::from_pairs(Vec::<(&str, Vec<&str>)>::new()).unwrap_err(),
            OptionError::NoOptions
        );
        assert_eq!(
            OptionCodeMap::from_pairs([("", vec!["A"])]).unwrap_err().kind(),
            ErrorKind::InvalidConfiguration
        );
    }

    #[test]
    fn resolve_codes_single_option() {
        assert_eq!(table().resolve_codes(&checked(&["FSP"])).unwrap(), ["K11K2", "K11K4"]);
    }

    #[test]
    fn resolve_codes_in_table_order_without_duplicates() {
        let codes = table()
            .resolve_codes(&checked(&["基材識別票", "#7", "FSP"]))
            .unwrap();
        assert_eq!(codes, ["K11K2", "K11K4", "K11J2", "K11J5", "K11J8"]);
        assert!(table().resolve_codes(&BTreeSet::new()).unwrap().is_empty());
    }

    #[test]
    fn resolve_codes_unknown_option() {
        let error = table().resolve_codes(&checked(&["FSP", "#9"])).unwrap_err();
        assert_eq!(error, OptionError::Unknown(String::from("#9")));
        assert_eq!(error.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn key_lookup_and_order() {
        let table = table();
        assert_eq!(table.key("#8").unwrap().as_str(), "#8");
        assert!(table.key("#9").is_err());
        let checked = checked(&["基材識別票", "FSP"]);
        let ordered: Vec<&str> = table
            .checked_in_order(&checked)
            .into_iter()
            .map(OptionKey::as_str)
            .collect();
        assert_eq!(ordered, ["FSP", "基材識別票"]);
    }

    #[test]
    fn serde() {
        let json = serde_json::to_string(&table()).unwrap();
        assert!(json.starts_with(r#"[{"key":"FSP","codes":["K11K2","K11K4"]}"#));
        let back: OptionCodeMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table());
        let duplicate = r#"[{"key":"A","codes":["1"]},{"key":"A","codes":["2"]}]"#;
        assert!(serde_json::from_str::<OptionCodeMap>(duplicate).is_err());
    }
}
