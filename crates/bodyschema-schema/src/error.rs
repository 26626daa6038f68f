/// Errors that can occur while loading declarations or schema options.
///
/// Absent params, disallowed params, denylisted handler keys and validation
/// failures are ordinary return values, never one of these.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The declaration is not a JSON object of field definitions.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),

    /// The schema options are not a JSON object of name rules.
    #[error("invalid schema options: {0}")]
    InvalidOptions(String),

    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A param option could not be applied.
    #[error("param error: {0}")]
    Param(#[from] bodyschema_param::ParamError),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
