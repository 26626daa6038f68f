use crate::error::{ParamError, Result};
use crate::kind::{ParamType, TypeSpec};
use crate::value::Value;

/// Option key holding the declared type.
pub const TYPE_OPTION: &str = "type";
/// Option key holding the default value.
pub const DEFAULT_OPTION: &str = "default";

/// Normalized options of a single param.
///
/// `type` and `default` are typed; every other key lands in an open bag that
/// formatters and validators read by their own name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamOptions {
    pub type_spec: Option<TypeSpec>,
    pub default: Option<Value>,
    custom: Vec<(String, Value)>,
}

impl ParamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single value of `param_type`.
    pub fn scalar(param_type: ParamType, default: Option<Value>) -> Self {
        Self {
            type_spec: Some(TypeSpec::Scalar(param_type)),
            default,
            custom: Vec::new(),
        }
    }

    /// An array whose elements are `param_type`.
    pub fn array_of(param_type: ParamType, default: Option<Value>) -> Self {
        Self {
            type_spec: Some(TypeSpec::ArrayOf(param_type)),
            default,
            custom: Vec::new(),
        }
    }

    /// A sub-document: type `Object`, every supplied key kept verbatim.
    pub fn nested<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut options = Self::scalar(ParamType::Object, None);
        for (key, value) in fields {
            options.put(key, value);
        }
        options
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(name.into(), value.into());
        self
    }

    /// Read `default` or a custom key.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if name == DEFAULT_OPTION {
            return self.default.as_ref();
        }
        self.custom
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Write `type`, `default` or a custom key.
    ///
    /// A string written to `type` is parsed as a type name; anything else
    /// there is rejected.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            TYPE_OPTION => match &value {
                Value::String(type_name) => {
                    self.type_spec = Some(TypeSpec::from_name(type_name)?);
                    Ok(())
                }
                other => Err(ParamError::UnknownType(other.to_string())),
            },
            _ => {
                self.put(name.to_string(), value);
                Ok(())
            }
        }
    }

    /// Custom keys in insertion order.
    pub fn custom(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.custom.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Write `default` or a custom key. A `type` key is stored as a plain
    /// custom key here; use [`ParamOptions::set`] to change the type.
    pub fn put(&mut self, name: String, value: Value) {
        if name == DEFAULT_OPTION {
            self.default = (!value.is_null()).then_some(value);
            return;
        }
        match self.custom.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.custom.push((name, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn nested_forces_object_and_keeps_keys() {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), Value::from("String"));
        let options = ParamOptions::nested(fields);
        assert_eq!(options.type_spec, Some(TypeSpec::Scalar(ParamType::Object)));
        assert_eq!(options.get("name"), Some(&Value::from("String")));
    }

    #[test]
    fn set_routes_reserved_keys() {
        let mut options = ParamOptions::new();
        options.set("type", Value::from("[Number]")).unwrap();
        options.set("default", Value::from(3)).unwrap();
        options.set("uppercase", Value::from(true)).unwrap();
        options.set("uppercase", Value::from(false)).unwrap();

        assert_eq!(options.type_spec, Some(TypeSpec::ArrayOf(ParamType::Number)));
        assert_eq!(options.get("default"), Some(&Value::from(3)));
        assert_eq!(options.get("uppercase"), Some(&Value::from(false)));
        assert_eq!(options.custom().count(), 1);
        assert!(options.set("type", Value::from(1)).is_err());
    }
}
