use bodyschema_param::Param;
use bodyschema_schema::{NameRule, Schema};

use crate::cmd::InspectArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_inspect, FieldRow, InspectOutput, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let (declaration, options) = args.source.load()?;
    let schema = Schema::new(declaration, options);

    let out = InspectOutput {
        fields: schema.params().map(|param| field_row(&schema, param)).collect(),
        disallowed: schema
            .options()
            .iter()
            .filter(|(_, rule)| matches!(rule, NameRule::Disallow))
            .map(|(name, _)| name.to_string())
            .collect(),
    };

    print_inspect(&out, format);
    Ok(SUCCESS)
}

fn field_row(schema: &Schema, param: &Param) -> FieldRow {
    let options = param.options();
    FieldRow {
        name: param.name().to_string(),
        external: schema.to_external_name(param.name()).to_string(),
        type_name: options.type_spec.as_ref().map(ToString::to_string),
        default: options
            .default
            .as_ref()
            .map_or(serde_json::Value::Null, |value| value.to_json()),
        options: options
            .custom()
            .map(|(key, value)| (key.to_string(), value.to_json()))
            .collect(),
    }
}
