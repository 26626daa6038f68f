use chrono::{DateTime, Utc};
use tracing::debug;

use bodyschema_param::{ParamOptions, ParamType, Pattern, TypeSpec, Value, TYPE_OPTION};

use crate::error::{Result, SchemaError};

/// Options for a single param as written by the user, before normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawOptions {
    #[default]
    Absent,
    /// `[T]`: an array of whatever the first element declares.
    Sequence(Vec<RawOptions>),
    String(String),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    RegExp(Pattern),
    Type(TypeSpec),
    Bag(OptionBag),
}

/// An explicit option bag. `type_spec` is `None` when the bag has no type or
/// one that is not a recognized type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionBag {
    pub type_spec: Option<TypeSpec>,
    pub entries: Vec<(String, Value)>,
}

impl OptionBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn typed(type_spec: impl Into<TypeSpec>) -> Self {
        Self {
            type_spec: Some(type_spec.into()),
            entries: Vec::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }
}

/// Normalize raw options, in priority order: sequence, string, number,
/// boolean, date, pattern, type, bag, absent.
pub fn normalize(raw: RawOptions) -> ParamOptions {
    match raw {
        RawOptions::Sequence(items) if !items.is_empty() => from_sequence(items),
        RawOptions::Sequence(_) => ParamOptions::nested(Vec::new()),
        RawOptions::String(default) => ParamOptions::new().with_default(default),
        RawOptions::Number(n) => ParamOptions::scalar(ParamType::Number, Some(Value::Number(n))),
        RawOptions::Boolean(b) => ParamOptions::scalar(ParamType::Boolean, Some(Value::Bool(b))),
        RawOptions::Date(d) => ParamOptions::scalar(ParamType::Date, Some(Value::Date(d))),
        RawOptions::RegExp(p) => ParamOptions::scalar(ParamType::RegExp, Some(Value::RegExp(p))),
        RawOptions::Type(spec) => from_type(spec),
        RawOptions::Bag(bag) => from_bag(bag),
        RawOptions::Absent => ParamOptions::new(),
    }
}

fn from_sequence(mut items: Vec<RawOptions>) -> ParamOptions {
    let inner = normalize(items.swap_remove(0));
    let mut options = ParamOptions::new();
    if let Some(spec) = inner.type_spec {
        options.type_spec = Some(TypeSpec::ArrayOf(spec.element().clone()));
    }
    options.default = inner.default.filter(Value::is_truthy);
    options
}

fn from_type(spec: TypeSpec) -> ParamOptions {
    let mut options = ParamOptions::new();
    options.type_spec = Some(spec);
    options
}

fn from_bag(bag: OptionBag) -> ParamOptions {
    let fields = bag.entries.into_iter().filter(|(key, _)| key != TYPE_OPTION);
    match bag.type_spec {
        Some(spec) => fields.fold(from_type(spec), |options, (key, value)| {
            options.with_option(key, value)
        }),
        None => ParamOptions::nested(fields),
    }
}

impl From<&str> for RawOptions {
    fn from(value: &str) -> Self {
        RawOptions::String(value.to_string())
    }
}

impl From<String> for RawOptions {
    fn from(value: String) -> Self {
        RawOptions::String(value)
    }
}

impl From<f64> for RawOptions {
    fn from(value: f64) -> Self {
        RawOptions::Number(value)
    }
}

impl From<i32> for RawOptions {
    fn from(value: i32) -> Self {
        RawOptions::Number(f64::from(value))
    }
}

impl From<bool> for RawOptions {
    fn from(value: bool) -> Self {
        RawOptions::Boolean(value)
    }
}

impl From<DateTime<Utc>> for RawOptions {
    fn from(value: DateTime<Utc>) -> Self {
        RawOptions::Date(value)
    }
}

impl From<Pattern> for RawOptions {
    fn from(value: Pattern) -> Self {
        RawOptions::RegExp(value)
    }
}

impl From<ParamType> for RawOptions {
    fn from(value: ParamType) -> Self {
        RawOptions::Type(TypeSpec::Scalar(value))
    }
}

impl From<TypeSpec> for RawOptions {
    fn from(value: TypeSpec) -> Self {
        RawOptions::Type(value)
    }
}

impl From<OptionBag> for RawOptions {
    fn from(value: OptionBag) -> Self {
        RawOptions::Bag(value)
    }
}

impl<T: Into<RawOptions>> From<Vec<T>> for RawOptions {
    fn from(value: Vec<T>) -> Self {
        RawOptions::Sequence(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawOptions>> From<Option<T>> for RawOptions {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawOptions::Absent, Into::into)
    }
}

/// JSON declarations cannot hold type constructors, so an object's `type`
/// key carries a type name (`"Number"`) or a one-element array of one
/// (`["Number"]`). Bare strings remain defaults.
impl From<serde_json::Value> for RawOptions {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawOptions::Absent,
            serde_json::Value::Bool(b) => RawOptions::Boolean(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(RawOptions::Absent, RawOptions::Number),
            serde_json::Value::String(s) => RawOptions::String(s),
            serde_json::Value::Array(items) => {
                RawOptions::Sequence(items.into_iter().map(RawOptions::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut bag = OptionBag::new();
                for (key, value) in map {
                    if key == TYPE_OPTION {
                        bag.type_spec = json_type(&value);
                    } else {
                        bag.entries.push((key, Value::from(value)));
                    }
                }
                RawOptions::Bag(bag)
            }
        }
    }
}

fn json_type(value: &serde_json::Value) -> Option<TypeSpec> {
    let parsed = match value {
        serde_json::Value::String(name) => TypeSpec::from_name(name).ok(),
        serde_json::Value::Array(items) => match items.as_slice() {
            [serde_json::Value::String(name)] => ParamType::from_name(name)
                .ok()
                .map(TypeSpec::ArrayOf),
            _ => None,
        },
        _ => None,
    };
    if parsed.is_none() {
        debug!(%value, "unrecognized type in declaration, treating as Object");
    }
    parsed
}

/// Ordered field name → raw options list fed to a schema at construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Declaration {
    entries: Vec<(String, RawOptions)>,
}

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. A repeated name replaces the earlier options in place.
    pub fn field(mut self, name: impl Into<String>, options: impl Into<RawOptions>) -> Self {
        self.push(name.into(), options.into());
        self
    }

    /// Load a declaration from a JSON object, keeping its field order.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            serde_json::Value::Null => Ok(Self::new()),
            other => Err(SchemaError::InvalidDeclaration(format!(
                "expected an object of fields, found {other}"
            ))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawOptions)> {
        self.entries.iter().map(|(name, raw)| (name.as_str(), raw))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, name: String, options: RawOptions) {
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = options,
            None => self.entries.push((name, options)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Declaration
where
    K: Into<String>,
    V: Into<RawOptions>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut declaration = Self::new();
        for (name, options) in iter {
            declaration.push(name.into(), options.into());
        }
        declaration
    }
}

impl IntoIterator for Declaration {
    type Item = (String, RawOptions);
    type IntoIter = std::vec::IntoIter<(String, RawOptions)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
