//! Declarative request-body parsing and validation.
//!
//! A schema declares the fields a body may carry, how each is coerced
//! (`String`, `Number`, `Boolean`, `Date`, `RegExp`, `Object` or an array of
//! one), and which formatters and validators run on it. Parsing drops
//! undeclared keys and can rename or hide fields on the way out.
//!
//! # Crate Structure
//!
//! - [`param`]: the value model and the per-field collaborator
//! - [`schema`]: the schema engine, name rules and handler registry
//! - [`middleware`]: per-request adapter returning an accepted body or a rejection
//!
//! The process-wide handler registry is re-exported at the top level:
//! handlers registered with [`set_formatter`] or [`set_validator`] are picked
//! up by every schema built afterwards.

/// Re-export value and field types.
pub mod param {
    pub use bodyschema_param::*;
}

/// Re-export schema engine types.
pub mod schema {
    pub use bodyschema_schema::*;
}

/// Re-export the request adapter.
pub mod middleware {
    pub use bodyschema_middleware::*;
}

pub use bodyschema_middleware::{Accepted, Middleware, MiddlewareConfig, Rejection};
pub use bodyschema_param::{Body, Param, ParamType, TypeSpec, ValidationError, Value};
pub use bodyschema_schema::global::{
    formatter, handler, set_formatter, set_handler, set_validator, validator,
};
pub use bodyschema_schema::{Declaration, OptionBag, Schema, SchemaOptions};
