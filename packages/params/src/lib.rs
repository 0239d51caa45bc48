//! A dynamically-typed parameter store decoded from JSON request bodies.
//!
//! [`Params`] is a string-keyed map of [`Value`]s that gives request handlers
//! lenient, never-failing access to arbitrary JSON:
//!
//! * [`Params::get`] and the typed getters ([`Params::get_int`],
//!   [`Params::get_float64`], [`Params::get_time`], ...) coerce values and fall
//!   back to the target type's zero value instead of erroring
//! * [`Params::required`] validates presence of dotted paths like `"user.email"`
//! * [`Params::url_values`] flattens the store into query parameters
//!
//! # Example
//!
//! ```rust
//! use jsonparams_params::Params;
//!
//! let params: Params = r#"{"user": {"name": "Jane", "age": "42"}, "tags": ["a", "b"]}"#
//!     .parse()
//!     .unwrap();
//!
//! assert!(params.required(&["user.name"]).is_ok());
//! assert_eq!(params.get_nested("user").get_int("age"), 42);
//! assert_eq!(params.get_slice_strings("tags"), vec!["a", "b"]);
//! assert_eq!(params.url_values("[", "]").get("user[name]"), Some("Jane"));
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::module_name_repetitions)]

use std::{collections::BTreeMap, fmt, io::Read, str::FromStr};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::Serialize;
use thiserror::Error;

pub mod coerce;
pub mod url_values;
pub mod value;

pub use url_values::UrlValues;
pub use value::Value;

use url_values::{KeyStyle, flatten_into};

static EMPTY: Params = Params::new();

/// The time returned by [`Params::get_time`] when a value is absent or does
/// not parse: `0001-01-01T00:00:00Z`.
#[must_use]
pub fn zero_time() -> DateTime<FixedOffset> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
        .unwrap_or_default()
}

/// Errors that can occur when decoding a [`Params`] store.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input was not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The input was valid JSON, but not an object.
    #[error("Expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

/// Error returned by [`Params::required`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequiredError {
    /// The named key was absent, or held an empty string.
    #[error("the parameter {key} is required")]
    Missing { key: String },
}

/// A string-keyed store of dynamically-typed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Decodes a JSON object from `reader`.
    ///
    /// # Errors
    ///
    /// * [`DecodeError::Json`] if the input is not valid JSON
    /// * [`DecodeError::NotAnObject`] if the top-level value is not an object
    pub fn decode(reader: impl Read) -> Result<Self, DecodeError> {
        Self::try_from(serde_json::from_reader::<_, serde_json::Value>(reader)?)
    }

    /// Decodes a JSON object from a byte slice.
    ///
    /// # Errors
    ///
    /// * [`DecodeError::Json`] if the input is not valid JSON
    /// * [`DecodeError::NotAnObject`] if the top-level value is not an object
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::try_from(serde_json::from_slice::<serde_json::Value>(bytes)?)
    }

    /// Inserts `value` under `key`, returning `true` if an existing value was
    /// overwritten.
    ///
    /// Values are moved into the store, so a store can never end up containing
    /// itself. Adding a clone inserts a snapshot taken before the insertion.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        self.0.insert(key.into(), value.into()).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the value stored at `key` exactly as decoded.
    ///
    /// Dotted keys are not interpreted.
    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the nested store at `key`.
    ///
    /// Falls back to an empty store when the key is absent or does not hold an
    /// object, so lookups can always be chained.
    #[must_use]
    pub fn get_nested(&self, key: &str) -> &Self {
        self.get_raw(key).and_then(Value::as_params).unwrap_or(&EMPTY)
    }

    pub fn get_nested_mut(&mut self, key: &str) -> Option<&mut Self> {
        match self.0.get_mut(key) {
            Some(Value::Object(params)) => Some(params),
            _ => None,
        }
    }

    /// Returns the value at `key` rendered as text, or an empty string when
    /// absent.
    ///
    /// An absent key and a key holding `""` look the same here. Use
    /// [`Params::lookup`] to tell them apart.
    #[must_use]
    pub fn get(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_default()
    }

    /// Returns the value at `key` rendered as text, or `None` when absent.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get_raw(key).map(Value::stringify)
    }

    /// Returns the value at `key` only if it is natively a string.
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.get_raw(key)
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn get_int(&self, key: &str) -> isize {
        self.coerce(key, coerce::parse_int_as)
    }

    #[must_use]
    pub fn get_int8(&self, key: &str) -> i8 {
        self.coerce(key, coerce::parse_int_as)
    }

    #[must_use]
    pub fn get_int64(&self, key: &str) -> i64 {
        self.coerce(key, coerce::parse_int_as)
    }

    #[must_use]
    pub fn get_float32(&self, key: &str) -> f32 {
        self.coerce(key, coerce::parse_f32)
    }

    /// Alias of [`Params::get_float32`].
    #[must_use]
    pub fn get_float(&self, key: &str) -> f32 {
        self.get_float32(key)
    }

    #[must_use]
    pub fn get_float64(&self, key: &str) -> f64 {
        self.coerce(key, coerce::parse_f64)
    }

    /// Parses the value at `key` as an RFC 3339 timestamp.
    ///
    /// Returns [`zero_time`] when the key is absent or does not parse.
    #[must_use]
    pub fn get_time(&self, key: &str) -> DateTime<FixedOffset> {
        self.coerce_or(key, coerce::parse_rfc3339, zero_time)
    }

    /// Returns the array at `key`, or an empty slice.
    #[must_use]
    pub fn get_slice(&self, key: &str) -> &[Value] {
        self.get_raw(key).and_then(Value::as_array).unwrap_or_default()
    }

    /// Returns the native string elements of the array at `key`.
    ///
    /// Elements of any other type are skipped.
    #[must_use]
    pub fn get_slice_strings(&self, key: &str) -> Vec<String> {
        self.get_slice(key)
            .iter()
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect()
    }

    /// Returns the elements of the array at `key` that parse as integers.
    ///
    /// Elements that do not parse are skipped.
    #[must_use]
    pub fn get_slice_ints(&self, key: &str) -> Vec<isize> {
        self.get_slice(key)
            .iter()
            .filter_map(|x| coerce::parse_int_as(&x.stringify()))
            .collect()
    }

    fn coerce<T: Default>(&self, key: &str, parse: impl FnOnce(&str) -> Option<T>) -> T {
        self.coerce_or(key, parse, T::default)
    }

    fn coerce_or<T>(
        &self,
        key: &str,
        parse: impl FnOnce(&str) -> Option<T>,
        zero: impl FnOnce() -> T,
    ) -> T {
        let Some(value) = self.get_raw(key) else {
            return zero();
        };

        let text = value.stringify();

        parse(&text).unwrap_or_else(|| {
            log::trace!(
                "Could not convert '{key}' ({}) to {}",
                value.type_name(),
                std::any::type_name::<T>(),
            );
            zero()
        })
    }

    /// Checks that every key in `keys` is present.
    ///
    /// Keys may be dotted paths (`"user.address.city"`). A key counts as
    /// missing when any segment is absent, an intermediate segment is not an
    /// object, or the final value is an empty string.
    ///
    /// # Errors
    ///
    /// * [`RequiredError::Missing`] naming the first missing key
    pub fn required(&self, keys: &[&str]) -> Result<(), RequiredError> {
        keys.iter().find(|key| !self.exists(key)).map_or(Ok(()), |key| {
            log::debug!("Missing required parameter '{key}'");
            Err(RequiredError::Missing {
                key: (*key).to_string(),
            })
        })
    }

    /// Returns whether the dotted `path` resolves to a present, non-empty
    /// value.
    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        match path.split_once('.') {
            Some((head, tail)) => self
                .get_raw(head)
                .and_then(Value::as_params)
                .is_some_and(|nested| nested.exists(tail)),
            None => match self.get_raw(path) {
                Some(Value::String(x)) => !x.is_empty(),
                Some(_) => true,
                None => false,
            },
        }
    }

    /// Flattens the store into query parameters.
    ///
    /// Nested keys are joined as `parent.child` when `prefix` and `suffix` are
    /// both empty, and as `parent{prefix}child{suffix}` otherwise, so
    /// `url_values("[", "]")` produces `parent[child][grandchild]`. Arrays
    /// become repeated values under the same key.
    #[must_use]
    pub fn url_values(&self, prefix: &str, suffix: &str) -> UrlValues {
        let mut result = UrlValues::new();
        flatten_into(&mut result, self, None, KeyStyle::new(prefix, suffix));
        result
    }

    /// Same as `url_values("", "")`.
    #[must_use]
    pub fn get_url_values(&self) -> UrlValues {
        self.url_values("", "")
    }
}

impl TryFrom<serde_json::Value> for Params {
    type Error = DecodeError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match Value::from(value) {
            Value::Object(params) => Ok(params),
            other => Err(DecodeError::NotAnObject {
                found: other.type_name(),
            }),
        }
    }
}

impl From<Params> for serde_json::Value {
    fn from(value: Params) -> Self {
        Value::Object(value).into()
    }
}

impl FromStr for Params {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.as_bytes())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Params {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}:{value}")?;
        }
        f.write_str("}")
    }
}
