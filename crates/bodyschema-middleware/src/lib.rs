//! Request-body adapter.
//!
//! A [`Middleware`] holds either a template [`Schema`](bodyschema_schema::Schema)
//! or a declaration, and gives every request its own engine. A body that
//! validates comes back as [`Accepted`]; one that does not comes back as a
//! [`Rejection`] carrying the first validation error and a response status.

pub mod config;
pub mod error;
pub mod middleware;

pub use config::{MiddlewareConfig, DEFAULT_REJECTION_STATUS};
pub use error::{MiddlewareError, Result};
pub use middleware::{Accepted, Middleware, Rejection};
