use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{RetrieveError, Value};

/// Default number of documents returned when `top_k` is not supplied.
pub const DEFAULT_TOP_K: usize = 5;
/// Hard upper bound applied to any caller-supplied `top_k`.
pub const MAX_TOP_K: usize = 50;

/// Open named-parameter bag forwarded to backends.
///
/// Recognized keys are backend-specific (`top_k`, `units`, `mode`,
/// `location`, ...). The contract layer validates only the generic keys it
/// owns; everything else passes through untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Params(HashMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable insert, for building a bag in one expression.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Resolve the `top_k` bound: absent means [`DEFAULT_TOP_K`], present
    /// means a positive integer capped at [`MAX_TOP_K`]. Anything else is a
    /// validation failure.
    pub fn top_k(&self) -> Result<usize, RetrieveError> {
        match self.0.get("top_k") {
            None => Ok(DEFAULT_TOP_K),
            Some(value) => match value.as_u64() {
                Some(n) if n > 0 => Ok((n as usize).min(MAX_TOP_K)),
                _ => Err(RetrieveError::validation(
                    "top_k must be a positive integer",
                )),
            },
        }
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Params(iter.into_iter().collect())
    }
}
