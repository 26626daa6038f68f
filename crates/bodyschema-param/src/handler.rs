use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::param::Param;
use crate::value::Value;

/// Transforms a value. Receives the param's option of the same name (if set)
/// and the current value.
#[derive(Clone)]
pub struct Formatter(Arc<dyn Fn(Option<&Value>, Value) -> Value + Send + Sync>);

impl Formatter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, Value) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, option: Option<&Value>, value: Value) -> Value {
        (self.0)(option, value)
    }

    /// True when both handles refer to the same function.
    pub fn same_as(&self, other: &Formatter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatter(..)")
    }
}

/// Checks a value. Receives the param's option of the same name (if set),
/// the current value and the param itself.
#[derive(Clone)]
pub struct Validator(Arc<dyn Fn(Option<&Value>, &Value, &Param) -> Verdict + Send + Sync>);

impl Validator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &Value, &Param) -> Verdict + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, option: Option<&Value>, value: &Value, param: &Param) -> Verdict {
        (self.0)(option, value, param)
    }

    /// True when both handles refer to the same function.
    pub fn same_as(&self, other: &Validator) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Either kind of handler, for kind-generic attachment.
#[derive(Debug, Clone)]
pub enum Handler {
    Formatter(Formatter),
    Validator(Validator),
}

impl From<Formatter> for Handler {
    fn from(value: Formatter) -> Self {
        Handler::Formatter(value)
    }
}

impl From<Validator> for Handler {
    fn from(value: Validator) -> Self {
        Handler::Validator(value)
    }
}

/// Result of a single validator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub message: String,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }

    /// `pass()` when `valid`, otherwise `fail(message())`.
    pub fn check(valid: bool, message: impl FnOnce() -> String) -> Self {
        if valid {
            Self::pass()
        } else {
            Self::fail(message())
        }
    }
}

/// The first failing validator of a param.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Param name.
    pub param: String,
    /// Validator name.
    pub name: String,
    /// Value that failed.
    pub value: Value,
    pub valid: bool,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Ordered name → handler list. Re-attaching a name replaces it in place.
#[derive(Debug, Clone)]
pub struct HandlerSet<T> {
    entries: Vec<(String, T)>,
}

impl<T> HandlerSet<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, handler)| handler)
    }

    pub fn insert(&mut self, name: impl Into<String>, handler: T) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = handler,
            None => self.entries.push((name, handler)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, handler)| (name.as_str(), handler))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for HandlerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinsert_replaces_in_place() {
        let mut set = HandlerSet::new();
        set.insert("a", 1);
        set.insert("b", 2);
        set.insert("a", 3);
        let names: Vec<_> = set.iter().map(|(name, v)| (name, *v)).collect();
        assert_eq!(names, vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn validation_error_serializes_public_shape() {
        let error = ValidationError {
            param: "name".to_string(),
            name: "required".to_string(),
            value: Value::Null,
            valid: false,
            message: "name is required".to_string(),
        };
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["param"], "name");
        assert_eq!(json["valid"], false);
        assert_eq!(json["message"], "name is required");
    }
}
