//! Ordered multi-valued query parameters and their URL query-string form.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;


/// Ordered sequence of `(key, value)` pairs. Keys may repeat and the order is
/// kept through every transformation that does not touch a given key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamMultiMap(Vec<(String, String)>);

impl ParamMultiMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Decodes an `application/x-www-form-urlencoded` query string.
    ///
    /// Malformed percent escapes are kept literally; decoding never fails.
    /// A leading `?` is ignored.
    pub fn decode(query_string: &str) -> Self {
        let query_string = query_string.strip_prefix('?').unwrap_or(query_string);
        Self(
            form_urlencoded::parse(query_string.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    /// Renders the pairs in sequence order, percent-encoding UTF-8 bytes.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// First value stored under `key`.
    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0.iter().filter(move |(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn contains_pair(&self, key: &str, value: &str) -> bool {
        self.0.iter().any(|(k, v)| k == key && v == value)
    }

    /// Drops every occurrence of `key`, keeping the order of the survivors.
    pub fn remove_key(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    pub fn retain(&mut self, f: impl FnMut(&(String, String)) -> bool) {
        self.0.retain(f);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    pub(crate) fn pairs_mut(&mut self) -> &mut Vec<(String, String)> {
        &mut self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamMultiMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for ParamMultiMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::fmt::Display for ParamMultiMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}
