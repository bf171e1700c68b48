//! Telegram WebApp init data as the host hands it to the page
//!
//! This is the `initDataUnsafe` object: arbitrary JSON values keyed by
//! field name. Entry order is preserved because the transmitted `tma`
//! payload is emitted in the order the host supplied.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::core::error::{AppError, AppResult};

/// Key of the signature field, never part of the signed data
pub const HASH_KEY: &str = "hash";

/// Transient, immutable init data of one request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InitData(Map<String, Value>);

/// `user.id` as found in init data: Telegram sends a number, but a string
/// is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Numeric(id) => write!(f, "{}", id),
            UserId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId::Numeric(id)
    }
}

impl InitData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses init data from a JSON object
    ///
    /// Anything but an object (array, scalar, null) is rejected.
    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        let map: Map<String, Value> = serde_json::from_str(raw)?;
        Ok(Self(map))
    }

    /// Adds an entry, keeping insertion order
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Entries in host order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Entries in host order, without the `hash` field
    pub fn signed_entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries().filter(|(key, _)| *key != HASH_KEY)
    }

    /// `user.id`, required for submission
    pub fn user_id(&self) -> AppResult<UserId> {
        let id = self
            .0
            .get("user")
            .and_then(Value::as_object)
            .and_then(|user| user.get("id"))
            .ok_or(AppError::MissingUser)?;

        match id {
            // Telegram ids fit in 52 bits; floats and ids past i64 are rejected
            Value::Number(n) => n
                .as_i64()
                .map(UserId::Numeric)
                .ok_or_else(|| AppError::InvalidUserId(n.to_string())),
            Value::String(s) if !s.is_empty() => Ok(UserId::Text(s.clone())),
            _ => Err(AppError::MissingUser),
        }
    }
}

impl From<Map<String, Value>> for InitData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
