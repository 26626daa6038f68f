use bodyschema_param::{Body, Formatter, Handler, Param, ValidationError, Validator, Value};
use tracing::{debug, trace};

use crate::config::{NameRule, SchemaOptions};
use crate::declaration::{normalize, Declaration, RawOptions};
use crate::global;
use crate::registry::{resolve_key, HandlerKind, HandlerName, HandlerRegistry};

/// What happened to a param addressed by name.
#[derive(Debug)]
pub enum ParamOutcome<'a> {
    /// A new param was stored (or replaced one of the same name).
    Created(&'a mut Param),
    /// An existing param received a new value.
    Updated(&'a mut Param),
    /// The schema options forbid this name.
    Disallowed,
    /// No param has this name.
    NotFound,
}

impl<'a> ParamOutcome<'a> {
    /// The stored or updated param, if any.
    pub fn param(&self) -> Option<&Param> {
        match self {
            ParamOutcome::Created(param) | ParamOutcome::Updated(param) => Some(&**param),
            ParamOutcome::Disallowed | ParamOutcome::NotFound => None,
        }
    }

    /// Like [`ParamOutcome::param`], keeping the mutable borrow.
    pub fn into_param(self) -> Option<&'a mut Param> {
        match self {
            ParamOutcome::Created(param) | ParamOutcome::Updated(param) => Some(param),
            ParamOutcome::Disallowed | ParamOutcome::NotFound => None,
        }
    }

    /// True when the schema options forbid the name.
    pub fn is_disallowed(&self) -> bool {
        matches!(self, ParamOutcome::Disallowed)
    }

    /// True when `set` found no param to update.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ParamOutcome::NotFound)
    }
}

/// A set of declared params that parses and validates request bodies.
///
/// Params are stored under their internal names, in insertion order. Body
/// keys are translated through [`SchemaOptions`] on the way in and out.
/// Cloning a schema yields independent param values and options, which is
/// how the middleware isolates concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    params: Vec<Param>,
    options: SchemaOptions,
    handlers: HandlerRegistry,
}

impl Schema {
    /// Build a schema whose handlers start as a copy of the process-wide
    /// registry (see [`global`]).
    pub fn new(declaration: Declaration, options: SchemaOptions) -> Self {
        Self::with_registry(declaration, options, &global::snapshot())
    }

    /// Build a schema whose handlers start as a copy of `registry`.
    pub fn with_registry(
        declaration: Declaration,
        options: SchemaOptions,
        registry: &HandlerRegistry,
    ) -> Self {
        let mut schema = Self {
            params: Vec::new(),
            options,
            handlers: HandlerRegistry::new(),
        };

        for (name, raw) in declaration {
            schema.add(&name, Value::Null, raw);
        }
        for (name, handler) in registry.entries() {
            schema.install(&name, handler);
        }
        schema
    }

    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&NameRule> {
        self.options.get(name)
    }

    /// Change a name rule. Existing params are kept; a `Disallow` only stops
    /// future adds and hides the param from `parse` output.
    pub fn set_option(&mut self, name: &str, rule: NameRule) -> Option<&NameRule> {
        self.options.set(name, rule);
        self.options.get(name)
    }

    pub fn to_internal_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.options.to_internal_name(name)
    }

    pub fn to_external_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.options.to_external_name(name)
    }

    /// Declare a param. `name` may be internal or external.
    pub fn add(
        &mut self,
        name: &str,
        value: impl Into<Value>,
        options: impl Into<RawOptions>,
    ) -> ParamOutcome<'_> {
        let name = self.options.to_internal_name(name).to_string();
        if self.options.is_disallowed(&name) {
            debug!(param = %name, "param is disallowed by schema options");
            return ParamOutcome::Disallowed;
        }
        let param = Param::new(name, value, normalize(options.into()));
        self.store(param)
    }

    /// Declare a param from an existing one, taking its name, value and
    /// options. Handlers attached to `param` itself are not carried over.
    pub fn add_param(&mut self, param: Param) -> ParamOutcome<'_> {
        let name = self.options.to_internal_name(param.name()).to_string();
        if self.options.is_disallowed(&name) {
            debug!(param = %name, "param is disallowed by schema options");
            return ParamOutcome::Disallowed;
        }
        let rebuilt = Param::new(name, param.value().clone(), param.options().clone());
        self.store(rebuilt)
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        let name = self.options.to_internal_name(name);
        self.params.iter().find(|param| param.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Param> {
        let index = self.position(name)?;
        self.params.get_mut(index)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set an existing param's value, then apply the keys of an option bag
    /// as per-param overrides. Never creates a param.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<Value>,
        options: impl Into<RawOptions>,
    ) -> ParamOutcome<'_> {
        let Some(index) = self.position(name) else {
            return ParamOutcome::NotFound;
        };
        let param = &mut self.params[index];
        param.set_value(value);
        if let RawOptions::Bag(bag) = options.into() {
            if let Some(spec) = bag.type_spec {
                param.options_mut().type_spec = Some(spec);
            }
            for (key, value) in bag.entries {
                param.options_mut().put(key, value);
            }
        }
        ParamOutcome::Updated(param)
    }

    /// Update the param if it exists, otherwise declare it.
    pub fn param(
        &mut self,
        name: &str,
        value: impl Into<Value>,
        options: impl Into<RawOptions>,
    ) -> ParamOutcome<'_> {
        if self.contains(name) {
            self.set(name, value, options)
        } else {
            self.add(name, value, options)
        }
    }

    /// Params in insertion order.
    pub fn params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Look up a handler by untrusted kind and name.
    pub fn handler(&self, kind: &str, name: &str) -> Option<Handler> {
        self.handlers.handler(kind, name)
    }

    /// Register a handler by untrusted kind and name and attach it to every
    /// param. Rejected keys and kind mismatches change nothing.
    pub fn set_handler(&mut self, kind: &str, name: &str, handler: Handler) -> Option<Handler> {
        let (kind, name) = resolve_key(kind, name)?;
        if HandlerKind::of(&handler) != kind {
            return None;
        }
        self.install(&name, handler.clone());
        Some(handler)
    }

    pub fn formatter(&self, name: &str) -> Option<&Formatter> {
        self.handlers.formatter(name)
    }

    pub fn set_formatter(&mut self, name: &str, formatter: Formatter) -> Option<Formatter> {
        let name = HandlerName::new(name)?;
        self.install(&name, Handler::Formatter(formatter.clone()));
        Some(formatter)
    }

    pub fn validator(&self, name: &str) -> Option<&Validator> {
        self.handlers.validator(name)
    }

    pub fn set_validator(&mut self, name: &str, validator: Validator) -> Option<Validator> {
        let name = HandlerName::new(name)?;
        self.install(&name, Handler::Validator(validator.clone()));
        Some(validator)
    }

    /// Apply `payload` (if any) and project every allowed param into a new
    /// body keyed by external names. Undeclared payload keys are dropped.
    pub fn parse(&mut self, payload: Option<&Body>) -> Body {
        if let Some(payload) = payload {
            self.apply(payload);
        }

        let mut body = Body::new();
        for param in &self.params {
            if self.options.is_disallowed(param.name()) {
                continue;
            }
            let key = self.options.to_external_name(param.name()).to_string();
            body.insert(key, param.value().clone());
        }
        trace!(fields = body.len(), "parsed body");
        body
    }

    /// Apply `payload` (if any), validate params in insertion order stopping
    /// at the first failure, and return whatever `next` makes of it.
    pub fn validate_with<F, R>(&mut self, payload: Option<&Body>, next: F) -> R
    where
        F: FnOnce(Option<&ValidationError>) -> R,
    {
        if let Some(payload) = payload {
            self.apply(payload);
        }

        let error = self.params.iter().find_map(|param| param.validate().err());
        if let Some(error) = &error {
            debug!(
                param = %error.param,
                validator = %error.name,
                "body failed validation"
            );
        }
        next(error.as_ref())
    }

    /// True when every param validates.
    pub fn validate(&mut self, payload: Option<&Body>) -> bool {
        self.validate_with(payload, |error| error.is_none())
    }

    fn apply(&mut self, payload: &Body) {
        for param in &mut self.params {
            let value = payload
                .get(self.options.to_external_name(param.name()))
                .filter(|value| !value.is_null())
                .cloned();
            if let Some(value) = value {
                param.set_value(value);
            }
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = self.options.to_internal_name(name);
        self.params.iter().position(|param| param.name() == name)
    }

    fn store(&mut self, mut param: Param) -> ParamOutcome<'_> {
        for (name, handler) in self.handlers.entries() {
            param.attach(name.as_str(), handler);
        }

        let existing = self.params.iter().position(|p| p.name() == param.name());
        let index = match existing {
            Some(index) => {
                self.params[index] = param;
                index
            }
            None => {
                self.params.push(param);
                self.params.len() - 1
            }
        };
        ParamOutcome::Created(&mut self.params[index])
    }

    /// Store a handler and fan it out to every existing param.
    fn install(&mut self, name: &HandlerName, handler: Handler) {
        for param in &mut self.params {
            param.attach(name.as_str(), handler.clone());
        }
        self.handlers.insert(name, handler);
    }
}
