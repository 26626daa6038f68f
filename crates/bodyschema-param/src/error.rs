/// Errors that can occur while declaring or configuring a param.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    /// A type name did not match any known param type.
    #[error("unknown param type: {0}")]
    UnknownType(String),

    /// A regular expression could not be compiled.
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

pub type Result<T> = std::result::Result<T, ParamError>;
