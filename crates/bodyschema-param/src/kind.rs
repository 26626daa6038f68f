use std::fmt;
use std::sync::Arc;

use crate::error::{ParamError, Result};
use crate::value::Value;

/// Coercion function backing a [`CustomType`].
pub type CoerceFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// A user-supplied param type: a name plus a coercion function.
#[derive(Clone)]
pub struct CustomType {
    name: String,
    coerce: CoerceFn,
}

impl CustomType {
    pub fn new<F>(name: impl Into<String>, coerce: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            coerce: Arc::new(coerce),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coerce(&self, value: Value) -> Value {
        (self.coerce)(value)
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.coerce, &other.coerce)
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomType").field(&self.name).finish()
    }
}

/// Element type a param coerces its value into.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Date,
    RegExp,
    /// Sub-document or anything else passed through unchanged.
    Object,
    Custom(CustomType),
}

impl ParamType {
    /// Parse a built-in type name such as `"Number"`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "String" => Ok(ParamType::String),
            "Number" => Ok(ParamType::Number),
            "Boolean" => Ok(ParamType::Boolean),
            "Date" => Ok(ParamType::Date),
            "RegExp" => Ok(ParamType::RegExp),
            "Object" => Ok(ParamType::Object),
            other => Err(ParamError::UnknownType(other.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ParamType::String => "String",
            ParamType::Number => "Number",
            ParamType::Boolean => "Boolean",
            ParamType::Date => "Date",
            ParamType::RegExp => "RegExp",
            ParamType::Object => "Object",
            ParamType::Custom(custom) => custom.name(),
        }
    }
}

/// Declared shape of a param: a single value or an array of values.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    Scalar(ParamType),
    ArrayOf(ParamType),
}

impl TypeSpec {
    /// Parse `"Number"` or `"[Number]"`.
    pub fn from_name(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        match trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            Some(inner) => Ok(TypeSpec::ArrayOf(ParamType::from_name(inner.trim())?)),
            None => Ok(TypeSpec::Scalar(ParamType::from_name(trimmed)?)),
        }
    }

    /// The element type, regardless of arity.
    pub fn element(&self) -> &ParamType {
        match self {
            TypeSpec::Scalar(t) | TypeSpec::ArrayOf(t) => t,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeSpec::ArrayOf(_))
    }
}

impl From<ParamType> for TypeSpec {
    fn from(value: ParamType) -> Self {
        TypeSpec::Scalar(value)
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Scalar(t) => f.write_str(t.name()),
            TypeSpec::ArrayOf(t) => write!(f, "[{}]", t.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalar_and_array_names() {
        assert_eq!(
            TypeSpec::from_name("Number").unwrap(),
            TypeSpec::Scalar(ParamType::Number)
        );
        assert_eq!(
            TypeSpec::from_name("[ Date ]").unwrap(),
            TypeSpec::ArrayOf(ParamType::Date)
        );
        assert!(matches!(
            TypeSpec::from_name("Decimal"),
            Err(ParamError::UnknownType(name)) if name == "Decimal"
        ));
    }

    #[test]
    fn display_round_trips_through_from_name() {
        let spec = TypeSpec::ArrayOf(ParamType::RegExp);
        assert_eq!(spec.to_string(), "[RegExp]");
        assert_eq!(TypeSpec::from_name(&spec.to_string()).unwrap(), spec);
    }

    #[test]
    fn custom_types_compare_by_identity() {
        let upper = CustomType::new("Upper", |v| v);
        let same = upper.clone();
        let other = CustomType::new("Upper", |v| v);
        assert_eq!(upper, same);
        assert_ne!(upper, other);
    }
}
