//! Schema engine that parses and validates request bodies.
//!
//! A [`Schema`] owns an ordered set of [`Param`](bodyschema_param::Param)s
//! built from a [`Declaration`], a [`SchemaOptions`] table that renames or
//! disallows params, and a [`HandlerRegistry`] of named formatters and
//! validators that is fanned out to every param.
//!
//! ```
//! use bodyschema_schema::{Declaration, OptionBag, Schema, SchemaOptions};
//! use bodyschema_param::{ParamType, Value};
//!
//! let declaration = Declaration::new()
//!     .field("name", OptionBag::typed(ParamType::String).with("required", true))
//!     .field("page", ParamType::Number);
//! let mut schema = Schema::new(declaration, SchemaOptions::new().rename("page", "p"));
//!
//! let body = Value::from(serde_json::json!({"name": "docs", "p": "2"}));
//! let Value::Object(body) = body else { unreachable!() };
//!
//! assert!(schema.validate(Some(&body)));
//! let parsed = schema.parse(None);
//! assert_eq!(parsed.get("p"), Some(&Value::from(2)));
//! ```

pub mod config;
pub mod declaration;
pub mod error;
pub mod global;
pub mod registry;
pub mod schema;

pub use config::{NameRule, SchemaOptions};
pub use declaration::{normalize, Declaration, OptionBag, RawOptions};
pub use error::{Result, SchemaError};
pub use registry::{HandlerKind, HandlerName, HandlerRegistry, DENYLISTED_KEYS};
pub use schema::{ParamOutcome, Schema};
