use crate::error::{Result, SchemaError};

/// What a schema does with one internal param name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRule {
    /// Keep the param under its own name.
    Allow,
    /// Never add the param and never emit it.
    Disallow,
    /// Read and write the param under a different body name.
    Rename(String),
}

/// Per-schema name rules keyed by internal param name.
///
/// At most one internal name holds a given alias; setting an alias that is
/// already taken moves it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaOptions {
    rules: Vec<(String, NameRule)>,
}

impl SchemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.set(name, NameRule::Rename(alias.into()));
        self
    }

    pub fn disallow(mut self, name: impl Into<String>) -> Self {
        self.set(name, NameRule::Disallow);
        self
    }

    pub fn get(&self, name: &str) -> Option<&NameRule> {
        self.rules
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, rule)| rule)
    }

    pub fn set(&mut self, name: impl Into<String>, rule: NameRule) {
        let name = name.into();
        if let NameRule::Rename(alias) = &rule {
            self.rules
                .retain(|(key, existing)| *key == name || !matches!(existing, NameRule::Rename(a) if a == alias));
        }
        match self.rules.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = rule,
            None => self.rules.push((name, rule)),
        }
    }

    pub fn is_disallowed(&self, name: &str) -> bool {
        matches!(self.get(name), Some(NameRule::Disallow))
    }

    /// The internal name whose alias is `name`, or `name` itself.
    pub fn to_internal_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.rules
            .iter()
            .find(|(_, rule)| matches!(rule, NameRule::Rename(alias) if alias == name))
            .map_or(name, |(key, _)| key.as_str())
    }

    /// The alias of `name`, or `name` itself.
    pub fn to_external_name<'a>(&'a self, name: &'a str) -> &'a str {
        match self.get(name) {
            Some(NameRule::Rename(alias)) => alias,
            _ => name,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NameRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Load from a JSON object: `false` disallows, `true` allows, a string renames.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let map = match value {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => return Ok(Self::new()),
            other => {
                return Err(SchemaError::InvalidOptions(format!(
                    "expected an object of name rules, found {other}"
                )))
            }
        };

        let mut options = Self::new();
        for (name, rule) in map {
            let rule = match rule {
                serde_json::Value::Bool(false) => NameRule::Disallow,
                serde_json::Value::Bool(true) => NameRule::Allow,
                serde_json::Value::String(alias) => NameRule::Rename(alias),
                other => {
                    return Err(SchemaError::InvalidOptions(format!(
                        "rule for {name:?} must be a boolean or a string, found {other}"
                    )))
                }
            };
            options.set(name, rule);
        }
        Ok(options)
    }
}
