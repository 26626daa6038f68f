/// Errors raised while building a middleware.
#[derive(Debug, thiserror::Error)]
pub enum MiddlewareError {
    /// The declaration or the name options could not be loaded.
    #[error("schema error: {0}")]
    Schema(#[from] bodyschema_schema::SchemaError),

    /// The rejection status is not a client or server error status.
    #[error("invalid rejection status {0}, expected 400-599")]
    InvalidStatus(u16),
}

pub type Result<T> = std::result::Result<T, MiddlewareError>;
