//! The process-wide handler registry.
//!
//! [`Schema::new`](crate::Schema::new) snapshots this registry; handlers
//! registered here afterwards do not reach schemas that already exist. Use
//! [`Schema::with_registry`](crate::Schema::with_registry) to opt out of it.

use std::sync::{LazyLock, PoisonError, RwLock};

use bodyschema_param::{Formatter, Handler, Validator};

use crate::registry::HandlerRegistry;

static REGISTRY: LazyLock<RwLock<HandlerRegistry>> =
    LazyLock::new(|| RwLock::new(HandlerRegistry::new()));

/// A copy of the current process-wide handlers.
pub fn snapshot() -> HandlerRegistry {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub fn handler(kind: &str, name: &str) -> Option<Handler> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .handler(kind, name)
}

pub fn set_handler(kind: &str, name: &str, handler: Handler) -> Option<Handler> {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .set_handler(kind, name, handler)
}

pub fn formatter(name: &str) -> Option<Formatter> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .formatter(name)
        .cloned()
}

pub fn set_formatter(name: &str, formatter: Formatter) -> Option<Formatter> {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .set_formatter(name, formatter)
}

pub fn validator(name: &str) -> Option<Validator> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .validator(name)
        .cloned()
}

pub fn set_validator(name: &str, validator: Validator) -> Option<Validator> {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .set_validator(name, validator)
}
