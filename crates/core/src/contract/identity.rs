//! Portable content identity
//!
//! A `ContentIdentity` is an ordered set of named values that identify an
//! item independently of its record id (for example an alias or an
//! external key). Handlers add entries during the metadata stage.
//!
//! Rendered form: `/name=value/name=value`, names in sorted order. Slashes
//! and backslashes inside values are escaped with a backslash.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::FolioError;

/// Ordered name/value identity of a content item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentIdentity {
    entries: BTreeMap<String, String>,
}

impl ContentIdentity {
    /// Create an empty identity
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an entry, replacing any previous value for the name
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Get an entry by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Check if the identity has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('/', "\\/")
}

impl fmt::Display for ContentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            write!(f, "/{}={}", name, escape(value))?;
        }
        Ok(())
    }
}

impl FromStr for ContentIdentity {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut identity = ContentIdentity::new();
        if s.is_empty() {
            return Ok(identity);
        }
        if !s.starts_with('/') {
            return Err(FolioError::invalid_input(format!(
                "Content identity '{}' must start with '/'",
                s
            )));
        }

        // Split on unescaped slashes
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = s[1..].chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                '/' => segments.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        segments.push(current);

        for segment in segments {
            let (name, value) = segment.split_once('=').ok_or_else(|| {
                FolioError::invalid_input(format!("Identity segment '{}' has no '='", segment))
            })?;
            identity.add(name, value);
        }
        Ok(identity)
    }
}
