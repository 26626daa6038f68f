use std::fs;
use std::path::{Path, PathBuf};

use bodyschema_schema::{Declaration, SchemaOptions};
use clap::{Args, Subcommand};

use crate::exit::{io_error, schema_error, CliResult};
use crate::output::OutputFormat;

pub mod check;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a body against a schema and print the parsed result.
    Check(CheckArgs),
    /// List the fields a schema declares.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// JSON declaration file: field name to options.
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,
    /// JSON name rules: `false` hides a field, a string renames it.
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SchemaArgs,
    /// Body file, or `-` for stdin.
    #[arg(long, value_name = "FILE", conflicts_with = "json")]
    pub body: Option<PathBuf>,
    /// Inline JSON body.
    #[arg(long, conflicts_with = "body")]
    pub json: Option<String>,
    /// Status reported for a rejected body.
    #[arg(long, default_value = "400")]
    pub rejection_status: u16,
    /// Leave the offending value out of rejections.
    #[arg(long)]
    pub hide_value: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SchemaArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

impl SchemaArgs {
    pub fn load(&self) -> CliResult<(Declaration, SchemaOptions)> {
        let text = read_text(&self.schema)?;
        let declaration = Declaration::from_json(&text).map_err(|err| {
            schema_error(&format!("invalid schema {}", self.schema.display()), err)
        })?;

        let options = match &self.options {
            Some(path) => {
                let text = read_text(path)?;
                SchemaOptions::from_json(&text).map_err(|err| {
                    schema_error(&format!("invalid options {}", path.display()), err)
                })?
            }
            None => SchemaOptions::new(),
        };
        Ok((declaration, options))
    }
}

pub(crate) fn read_text(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}
