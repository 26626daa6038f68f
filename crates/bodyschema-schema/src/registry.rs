use std::fmt;
use std::str::FromStr;

use bodyschema_param::{Formatter, Handler, HandlerSet, Validator};
use tracing::debug;

/// Keys that must never name a handler kind or a handler.
pub const DENYLISTED_KEYS: [&str; 2] = ["__proto__", "constructor"];

/// The two handler families a registry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Formatters,
    Validators,
}

impl HandlerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HandlerKind::Formatters => "formatters",
            HandlerKind::Validators => "validators",
        }
    }

    /// The kind a handler belongs to.
    pub fn of(handler: &Handler) -> Self {
        match handler {
            Handler::Formatter(_) => HandlerKind::Formatters,
            Handler::Validator(_) => HandlerKind::Validators,
        }
    }
}

impl FromStr for HandlerKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "formatters" => Ok(HandlerKind::Formatters),
            "validators" => Ok(HandlerKind::Validators),
            _ => Err(()),
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handler name that is guaranteed not to be empty or denylisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerName(String);

impl HandlerName {
    pub fn new(name: &str) -> Option<Self> {
        if name.is_empty() || DENYLISTED_KEYS.contains(&name) {
            debug!(handler = name, "rejected handler name");
            return None;
        }
        Some(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse an untrusted `(kind, name)` pair. Returns `None` for anything that
/// is not exactly a known kind plus an acceptable name.
pub fn resolve_key(kind: &str, name: &str) -> Option<(HandlerKind, HandlerName)> {
    let Ok(kind) = kind.parse::<HandlerKind>() else {
        debug!(kind, "rejected handler kind");
        return None;
    };
    Some((kind, HandlerName::new(name)?))
}

/// Named formatters and validators, each in registration order.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    formatters: HandlerSet<Formatter>,
    validators: HandlerSet<Validator>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: HandlerKind, name: &HandlerName) -> Option<Handler> {
        match kind {
            HandlerKind::Formatters => self
                .formatters
                .get(name.as_str())
                .cloned()
                .map(Handler::Formatter),
            HandlerKind::Validators => self
                .validators
                .get(name.as_str())
                .cloned()
                .map(Handler::Validator),
        }
    }

    /// Store `handler` under its own kind.
    pub fn insert(&mut self, name: &HandlerName, handler: Handler) {
        match handler {
            Handler::Formatter(f) => self.formatters.insert(name.as_str(), f),
            Handler::Validator(v) => self.validators.insert(name.as_str(), v),
        }
    }

    /// String-keyed lookup for untrusted keys.
    pub fn handler(&self, kind: &str, name: &str) -> Option<Handler> {
        let (kind, name) = resolve_key(kind, name)?;
        self.get(kind, &name)
    }

    /// String-keyed registration for untrusted keys. Returns the stored
    /// handler, or `None` when the key is rejected or `handler` is not of
    /// `kind`; nothing is stored in that case.
    pub fn set_handler(&mut self, kind: &str, name: &str, handler: Handler) -> Option<Handler> {
        let (kind, name) = resolve_key(kind, name)?;
        if HandlerKind::of(&handler) != kind {
            debug!(%kind, handler = %name, "handler does not match requested kind");
            return None;
        }
        self.insert(&name, handler.clone());
        Some(handler)
    }

    pub fn formatter(&self, name: &str) -> Option<&Formatter> {
        let name = HandlerName::new(name)?;
        self.formatters.get(name.as_str())
    }

    pub fn set_formatter(&mut self, name: &str, formatter: Formatter) -> Option<Formatter> {
        let name = HandlerName::new(name)?;
        self.formatters.insert(name.as_str(), formatter.clone());
        Some(formatter)
    }

    pub fn validator(&self, name: &str) -> Option<&Validator> {
        let name = HandlerName::new(name)?;
        self.validators.get(name.as_str())
    }

    pub fn set_validator(&mut self, name: &str, validator: Validator) -> Option<Validator> {
        let name = HandlerName::new(name)?;
        self.validators.insert(name.as_str(), validator.clone());
        Some(validator)
    }

    /// Every entry, formatters first, each in registration order.
    pub fn entries(&self) -> Vec<(HandlerName, Handler)> {
        let formatters = self
            .formatters
            .iter()
            .map(|(name, f)| (HandlerName(name.to_string()), Handler::Formatter(f.clone())));
        let validators = self
            .validators
            .iter()
            .map(|(name, v)| (HandlerName(name.to_string()), Handler::Validator(v.clone())));
        formatters.chain(validators).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty() && self.validators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use bodyschema_param::{Value, Verdict};

    use super::*;

    fn identity() -> Formatter {
        Formatter::new(|_, value| value)
    }

    #[test]
    fn kind_parses_only_known_names() {
        assert_eq!("formatters".parse(), Ok(HandlerKind::Formatters));
        assert_eq!("validators".parse(), Ok(HandlerKind::Validators));
        assert!("__proto__".parse::<HandlerKind>().is_err());
        assert!("constructor".parse::<HandlerKind>().is_err());
        assert!("Formatters".parse::<HandlerKind>().is_err());
    }

    #[test]
    fn denylisted_names_are_unrepresentable() {
        assert!(HandlerName::new("__proto__").is_none());
        assert!(HandlerName::new("constructor").is_none());
        assert!(HandlerName::new("").is_none());
        assert_eq!(HandlerName::new("toString").unwrap().as_str(), "toString");
    }

    #[test]
    fn denylisted_keys_store_nothing() {
        let mut registry = HandlerRegistry::new();
        assert!(registry
            .set_handler("__proto__", "toString", identity().into())
            .is_none());
        assert!(registry
            .set_handler("formatters", "__proto__", identity().into())
            .is_none());
        assert!(registry
            .set_handler("validators", "constructor", identity().into())
            .is_none());
        assert!(registry.set_formatter("__proto__", identity()).is_none());
        assert!(registry.is_empty());
        assert!(registry.handler("formatters", "__proto__").is_none());
        assert!(registry.formatter("toString").is_none());
    }

    #[test]
    fn kind_mismatch_stores_nothing() {
        let mut registry = HandlerRegistry::new();
        assert!(registry
            .set_handler("validators", "trimmed", identity().into())
            .is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn typed_and_string_keyed_access_agree() {
        let mut registry = HandlerRegistry::new();
        let formatter = registry.set_formatter("scream", identity()).unwrap();
        registry.set_validator("never", Validator::new(|_, _, _| Verdict::fail("no")));

        match registry.handler("formatters", "scream") {
            Some(Handler::Formatter(found)) => assert!(found.same_as(&formatter)),
            other => panic!("unexpected handler: {other:?}"),
        }
        assert!(registry.handler("validators", "never").is_some());
        assert!(registry.handler("validators", "scream").is_none());

        let names: Vec<_> = registry
            .entries()
            .into_iter()
            .map(|(name, handler)| (name.to_string(), HandlerKind::of(&handler)))
            .collect();
        assert_eq!(
            names,
            vec![
                ("scream".to_string(), HandlerKind::Formatters),
                ("never".to_string(), HandlerKind::Validators),
            ]
        );
        assert_eq!(
            registry.formatter("scream").unwrap().call(None, Value::from(1)),
            Value::from(1)
        );
    }
}
