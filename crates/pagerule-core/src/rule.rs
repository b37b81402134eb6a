//! Rule and rule group types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque rule properties, forwarded verbatim to extensions.
pub type RuleProperties = serde_json::Map<String, serde_json::Value>;

/// A named, configuration-supplied rule.
///
/// The engine only uses `name` for logging; `properties` belong to whichever
/// extension applies the rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default)]
    pub properties: RuleProperties,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: RuleProperties::new(),
        }
    }

    /// Set a single property.
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Look up a property by key.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// Deserialize the whole property map into an extension-specific type.
    pub fn properties_as<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_value(serde_json::Value::Object(self.properties.clone()))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered candidates of which at most one is applied per sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleGroup {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RuleGroup {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl From<Vec<Rule>> for RuleGroup {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl<'a> IntoIterator for &'a RuleGroup {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Banner {
        slot: String,
        #[serde(default)]
        priority: u8,
    }

    #[test]
    fn test_rule_without_properties() {
        let rule: Rule = serde_json::from_str(r#"{"name": "welcome"}"#).unwrap();
        assert_eq!(rule.name, "welcome");
        assert!(rule.properties.is_empty());
    }

    #[test]
    fn test_properties_are_kept_verbatim() {
        let rule: Rule = serde_json::from_value(json!({
            "name": "hero",
            "properties": {"slot": "home-hero", "nested": {"a": [1, 2]}}
        }))
        .unwrap();

        assert_eq!(rule.property("nested"), Some(&json!({"a": [1, 2]})));

        let banner: Banner = rule.properties_as().unwrap();
        assert_eq!(banner.slot, "home-hero");
        assert_eq!(banner.priority, 0);
    }

    #[test]
    fn test_properties_as_reports_mismatch() {
        let rule = Rule::new("hero").with_property("slot", json!(42));
        assert!(rule.properties_as::<Banner>().is_err());
    }

    #[test]
    fn test_group_shape() {
        let group: RuleGroup =
            serde_json::from_str(r#"{"rules": [{"name": "a"}, {"name": "b"}]}"#).unwrap();
        let names: Vec<&str> = group.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(group.len(), 2);
        assert!(RuleGroup::default().is_empty());
    }
}
