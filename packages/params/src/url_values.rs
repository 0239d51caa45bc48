//! Flattening a [`Params`] store into multi-valued query parameters.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::{Params, Value};

/// A multi-valued, string-keyed mapping suitable for URL query encoding.
///
/// Each key holds its values in insertion order, so repeated parameters such
/// as `tags=a&tags=b` survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlValues(BTreeMap<String, Vec<String>>);

impl UrlValues {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the first value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value stored under `key`, or an empty slice.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Appends `value` to the values stored under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Encodes the values as an `application/x-www-form-urlencoded` string.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        for (key, values) in &self.0 {
            for value in values {
                serializer.append_pair(key, value);
            }
        }

        serializer.finish()
    }
}

impl From<UrlValues> for BTreeMap<String, Vec<String>> {
    fn from(value: UrlValues) -> Self {
        value.0
    }
}

impl IntoIterator for UrlValues {
    type Item = (String, Vec<String>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Key decoration used when descending into nested stores.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeyStyle<'a> {
    prefix: &'a str,
    suffix: &'a str,
}

impl<'a> KeyStyle<'a> {
    pub(crate) const fn new(prefix: &'a str, suffix: &'a str) -> Self {
        Self { prefix, suffix }
    }

    fn join(self, parent: &str, child: &str) -> String {
        if self.prefix.is_empty() && self.suffix.is_empty() {
            format!("{parent}.{child}")
        } else {
            format!("{parent}{}{child}{}", self.prefix, self.suffix)
        }
    }
}

pub(crate) fn flatten_into(
    result: &mut UrlValues,
    params: &Params,
    parent: Option<&str>,
    style: KeyStyle<'_>,
) {
    for (key, value) in params.iter() {
        let composite = match parent {
            Some(parent) => style.join(parent, key),
            None => key.to_string(),
        };

        match value {
            Value::Object(nested) => flatten_into(result, nested, Some(&composite), style),
            Value::Array(values) => {
                for value in values {
                    result.add(composite.as_str(), value.stringify());
                }
            }
            scalar => result.add(composite, scalar.stringify()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test_log::test]
    fn test_add_keeps_repeated_values_in_order() {
        let mut values = UrlValues::new();
        values.add("tags", "a");
        values.add("tags", "b");

        assert_eq!(values.get("tags"), Some("a"));
        assert_eq!(values.get_all("tags"), ["a".to_string(), "b".to_string()]);
        assert_eq!(values.len(), 1);
    }

    #[test_log::test]
    fn test_missing_key() {
        let values = UrlValues::new();

        assert!(values.is_empty());
        assert_eq!(values.get("missing"), None);
        assert!(values.get_all("missing").is_empty());
    }

    #[test_log::test]
    fn test_encode_escapes_brackets_and_spaces() {
        let mut values = UrlValues::new();
        values.add("user[name]", "Jane Doe");
        values.add("tags", "a&b");

        assert_eq!(values.encode(), "tags=a%26b&user%5Bname%5D=Jane+Doe");
    }

    #[test_log::test]
    fn test_iteration_is_sorted_by_key() {
        let mut values = UrlValues::new();
        values.add("b", "2");
        values.add("a", "1");
        values.add("b", "3");

        let borrowed: Vec<_> = values.iter().collect();
        assert_eq!(
            borrowed,
            vec![
                ("a", ["1".to_string()].as_slice()),
                ("b", ["2".to_string(), "3".to_string()].as_slice()),
            ]
        );

        let owned: Vec<_> = values.clone().into_iter().collect();
        assert_eq!(
            owned,
            vec![
                ("a".to_string(), vec!["1".to_string()]),
                ("b".to_string(), vec!["2".to_string(), "3".to_string()]),
            ]
        );

        let map = BTreeMap::from(values);
        assert_eq!(map.get("b").map(Vec::len), Some(2));
    }

    #[test_log::test]
    fn test_key_style_join() {
        assert_eq!(KeyStyle::new("", "").join("a", "b"), "a.b");
        assert_eq!(KeyStyle::new("[", "]").join("a", "b"), "a[b]");
        assert_eq!(
            KeyStyle::new("[", "]").join(&KeyStyle::new("[", "]").join("a", "b"), "c"),
            "a[b][c]"
        );
    }
}
