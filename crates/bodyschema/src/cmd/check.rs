use std::io::Read;
use std::path::Path;

use bodyschema_middleware::{Middleware, MiddlewareConfig};
use tracing::debug;

use crate::cmd::{read_text, CheckArgs};
use crate::exit::{io_error, middleware_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_body, print_rejection, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let (declaration, options) = args.source.load()?;
    let middleware = Middleware::from_declaration(declaration, options)
        .with_config(MiddlewareConfig {
            rejection_status: args.rejection_status,
            expose_value: !args.hide_value,
        })
        .map_err(|err| middleware_error("invalid --rejection-status", err))?;

    let body = resolve_body(&args)?;
    match middleware.handle(body.as_ref()) {
        Ok(accepted) => {
            debug!(fields = accepted.body.len(), "body accepted");
            print_body(&accepted.body, format);
            Ok(SUCCESS)
        }
        Err(rejection) => {
            print_rejection(&rejection, format);
            Ok(DATA_INVALID)
        }
    }
}

fn resolve_body(args: &CheckArgs) -> CliResult<Option<serde_json::Value>> {
    if let Some(json) = &args.json {
        let body = serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")))?;
        return Ok(Some(body));
    }
    let Some(path) = &args.body else {
        return Ok(None);
    };

    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|err| io_error("failed reading stdin", err))?;
        text
    } else {
        read_text(path)?
    };
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|err| CliError::new(DATA_INVALID, format!("body is not valid JSON: {err}")))
}
