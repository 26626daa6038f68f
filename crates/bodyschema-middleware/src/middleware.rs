use bodyschema_param::{Body, ValidationError, Value};
use bodyschema_schema::{Declaration, HandlerRegistry, Schema, SchemaOptions};
use tracing::debug;

use crate::config::MiddlewareConfig;
use crate::error::Result;

/// Where each request's schema comes from.
#[derive(Debug, Clone)]
enum Source {
    /// Cloned for every request; handlers are the template's own.
    Template(Schema),
    /// Built fresh for every request, against `registry` when one is
    /// attached and the process-wide handlers otherwise.
    Declaration {
        declaration: Declaration,
        options: SchemaOptions,
        registry: Option<HandlerRegistry>,
    },
}

/// Validates and parses request bodies, one schema per request.
#[derive(Debug, Clone)]
pub struct Middleware {
    source: Source,
    config: MiddlewareConfig,
}

/// A body that passed validation.
#[derive(Debug, Clone)]
pub struct Accepted {
    /// Parsed output keyed by external names.
    pub body: Body,
    /// The request's schema after the body was applied.
    pub schema: Schema,
}

impl Accepted {
    pub fn to_json(&self) -> serde_json::Value {
        Value::Object(self.body.clone()).to_json()
    }
}

/// A body that failed validation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", .error.message)]
pub struct Rejection {
    /// Response status the caller should answer with.
    pub status: u16,
    pub error: ValidationError,
    expose_value: bool,
}

impl Rejection {
    pub fn message(&self) -> &str {
        &self.error.message
    }

    /// The error response body: `{param, name, value, valid, message}`, with
    /// `value` omitted when the middleware hides values.
    pub fn to_json(&self) -> serde_json::Value {
        let mut json = serde_json::json!({
            "param": self.error.param,
            "name": self.error.name,
            "valid": self.error.valid,
            "message": self.error.message,
        });
        if self.expose_value {
            json["value"] = self.error.value.to_json();
        }
        json
    }
}

impl Middleware {
    /// Use `template` for every request. Each request works on a clone.
    pub fn from_schema(template: Schema) -> Self {
        Self {
            source: Source::Template(template),
            config: MiddlewareConfig::default(),
        }
    }

    /// Build a new schema from `declaration` and `options` for every request.
    pub fn from_declaration(declaration: Declaration, options: SchemaOptions) -> Self {
        Self {
            source: Source::Declaration {
                declaration,
                options,
                registry: None,
            },
            config: MiddlewareConfig::default(),
        }
    }

    /// Load the declaration and the name options from JSON text.
    pub fn from_json(declaration: &str, options: Option<&str>) -> Result<Self> {
        let declaration = Declaration::from_json(declaration)?;
        let options = match options {
            Some(options) => SchemaOptions::from_json(options)?,
            None => SchemaOptions::new(),
        };
        Ok(Self::from_declaration(declaration, options))
    }

    /// Override the rejection config.
    pub fn with_config(mut self, config: MiddlewareConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Build declared schemas against `registry` instead of the process-wide
    /// handlers. A template schema keeps its own handlers.
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        if let Source::Declaration { registry: slot, .. } = &mut self.source {
            *slot = Some(registry);
        }
        self
    }

    pub fn config(&self) -> &MiddlewareConfig {
        &self.config
    }

    /// A fresh schema as a request would see it.
    pub fn schema(&self) -> Schema {
        match &self.source {
            Source::Template(template) => template.clone(),
            Source::Declaration {
                declaration,
                options,
                registry: Some(registry),
            } => Schema::with_registry(declaration.clone(), options.clone(), registry),
            Source::Declaration {
                declaration,
                options,
                registry: None,
            } => Schema::new(declaration.clone(), options.clone()),
        }
    }

    /// Validate `body` and, only when it passes, parse it.
    ///
    /// A missing body or one that is not a JSON object is handled as an
    /// empty payload, so declared defaults and `required` still apply.
    pub fn handle(
        &self,
        body: Option<&serde_json::Value>,
    ) -> std::result::Result<Accepted, Rejection> {
        let payload = body.and_then(payload_of);
        let mut schema = self.schema();

        let failure = schema.validate_with(payload.as_ref(), |error| error.cloned());
        if let Some(error) = failure {
            debug!(
                param = %error.param,
                status = self.config.rejection_status,
                "rejected request body"
            );
            return Err(Rejection {
                status: self.config.rejection_status,
                error,
                expose_value: self.config.expose_value,
            });
        }

        let body = schema.parse(None);
        Ok(Accepted { body, schema })
    }
}

impl Default for Middleware {
    fn default() -> Self {
        Self::from_declaration(Declaration::new(), SchemaOptions::new())
    }
}

fn payload_of(body: &serde_json::Value) -> Option<Body> {
    match Value::from(body.clone()) {
        Value::Object(map) => Some(map),
        other => {
            debug!(kind = other.kind_name(), "ignoring non-object request body");
            None
        }
    }
}
