//! Per-backend generator options
//!
//! Options are passed on the command line after the target id, e.g.
//! `c:guard_prefix=MY_` or `json:compact`.

use std::collections::BTreeMap;

use crate::utils::{Error, Result};

/// Parsed `key[=value],...` option list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    target: String,
    values: BTreeMap<String, Option<String>>,
}

impl GeneratorOptions {
    /// Parse an option string for `target`. Empty items are ignored.
    pub fn parse(target: &str, input: &str) -> Result<Self> {
        let mut values = BTreeMap::new();

        for item in input.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (key, value) = match item.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim().to_string())),
                None => (item, None),
            };
            if key.is_empty() {
                return Err(Error::InvalidOption {
                    target: target.to_string(),
                    message: format!("missing option name in '{}'", item),
                });
            }
            values.insert(key.to_string(), value);
        }

        Ok(Self {
            target: target.to_string(),
            values,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the option was given, with or without a value
    pub fn flag(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Value of a `key=value` option
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_deref())
    }

    /// Reject any option not in `known`
    pub fn ensure_known(&self, known: &[&str]) -> Result<()> {
        match self.values.keys().find(|key| !known.contains(&key.as_str())) {
            Some(key) => Err(Error::InvalidOption {
                target: self.target.clone(),
                message: format!("unknown option '{}'", key),
            }),
            None => Ok(()),
        }
    }
}
