//! Engine definitions: which extensions are enabled and which rule groups
//! apply to which pages.
//!
//! Both mappings keep the order in which keys appear in the source document.
//! Page order decides evaluation order, and extension order breaks priority
//! ties, so a hash map would change behavior.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DefinitionError;
use crate::rule::RuleGroup;

/// String-keyed map that preserves insertion order.
///
/// Inserting an existing key replaces its value in place, the same way a
/// duplicate key in a JSON object overrides the earlier one.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`OrderedMap::insert`].
    pub fn with(mut self, key: impl Into<String>, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map with string keys")
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Page pattern → rule groups, in definition order.
pub type PageDefinition = OrderedMap<Vec<RuleGroup>>;

/// Extension name → enabled flag, in definition order.
pub type ExtensionToggles = OrderedMap<bool>;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definitions {
    #[serde(default)]
    pub extensions: ExtensionToggles,
    #[serde(default)]
    pub pages: PageDefinition,
}

impl Definitions {
    pub fn new(extensions: ExtensionToggles, pages: PageDefinition) -> Self {
        Self { extensions, pages }
    }

    /// Parse definitions from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON definitions file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Names marked as enabled, in definition order.
    pub fn enabled_extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name)
    }

    /// Compile every page pattern, in definition order.
    pub fn compile_pages(&self) -> Result<Vec<CompiledPage>, DefinitionError> {
        self.pages
            .iter()
            .map(|(pattern, groups)| CompiledPage::new(pattern, groups.clone()))
            .collect()
    }

    /// Check that every page pattern is a valid regular expression.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        for pattern in self.pages.keys() {
            compile_pattern(pattern)?;
        }
        Ok(())
    }
}

/// A page pattern ready to be tested against locations.
#[derive(Debug, Clone)]
pub struct CompiledPage {
    pattern: String,
    regex: Regex,
    groups: Vec<RuleGroup>,
}

impl CompiledPage {
    pub fn new(pattern: &str, groups: Vec<RuleGroup>) -> Result<Self, DefinitionError> {
        Ok(Self {
            pattern: pattern.to_string(),
            regex: compile_pattern(pattern)?,
            groups,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// Substring match: the pattern is never anchored, so `page` matches
    /// `/homepage`. Authors who need anchoring write `^`/`$` themselves.
    pub fn is_match(&self, location: &str) -> bool {
        self.regex.is_match(location)
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, DefinitionError> {
    Regex::new(pattern).map_err(|source| DefinitionError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
