use std::fmt;
use std::io;

use bodyschema_middleware::MiddlewareError;
use bodyschema_schema::SchemaError;

// Exit codes follow sysexits where one fits.
pub const SUCCESS: i32 = 0;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const NO_INPUT: i32 = 66;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => NO_INPUT,
        io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

/// A declaration or options file that does not load is a usage problem, not a
/// rejected body.
pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    CliError::new(USAGE, format!("{context}: {err}"))
}

pub fn middleware_error(context: &str, err: MiddlewareError) -> CliError {
    match err {
        MiddlewareError::Schema(err) => schema_error(context, err),
        MiddlewareError::InvalidStatus(_) => CliError::new(USAGE, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_exit_codes() {
        let missing = io_error("read", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(missing.code, NO_INPUT);
        assert!(missing.message.starts_with("read: "));

        let denied = io_error("read", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(denied.code, PERMISSION_DENIED);

        let other = io_error("read", io::Error::other("boom"));
        assert_eq!(other.code, INTERNAL);
    }

    #[test]
    fn load_errors_are_usage_errors() {
        let err = schema_error(
            "load schema",
            SchemaError::InvalidDeclaration("expected an object".to_string()),
        );
        assert_eq!(err.code, USAGE);

        let err = middleware_error("config", MiddlewareError::InvalidStatus(200));
        assert_eq!(err.code, USAGE);
        assert!(err.to_string().contains("200"));
    }
}
