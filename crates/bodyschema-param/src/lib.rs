//! Typed, formattable and validatable value slots.
//!
//! A [`Param`] holds one named value together with its options. Setting the
//! value coerces it to the declared [`TypeSpec`] and runs every attached
//! [`Formatter`]; [`Param::validate`] runs every attached [`Validator`] and
//! reports the first failure.

pub mod builtin;
pub mod coerce;
pub mod error;
pub mod handler;
pub mod kind;
pub mod options;
pub mod param;
pub mod value;

pub use error::{ParamError, Result};
pub use handler::{Formatter, Handler, HandlerSet, ValidationError, Validator, Verdict};
pub use kind::{CustomType, ParamType, TypeSpec};
pub use options::{ParamOptions, DEFAULT_OPTION, TYPE_OPTION};
pub use param::Param;
pub use value::{Body, Pattern, Value};
