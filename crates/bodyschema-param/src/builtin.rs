//! Handlers every param starts with.
//!
//! Each handler is inert unless the param carries an option of the same name.

use crate::handler::{Formatter, HandlerSet, Validator, Verdict};
use crate::param::Param;
use crate::value::{Pattern, Value};

pub const TRIM: &str = "trim";
pub const LOWERCASE: &str = "lowercase";
pub const UPPERCASE: &str = "uppercase";

pub const REQUIRED: &str = "required";
pub const MIN: &str = "min";
pub const MAX: &str = "max";
pub const MINLENGTH: &str = "minlength";
pub const MAXLENGTH: &str = "maxlength";
pub const ENUM: &str = "enum";
pub const MATCH: &str = "match";

pub fn formatters() -> HandlerSet<Formatter> {
    let mut set = HandlerSet::new();
    set.insert(TRIM, string_formatter(|s| s.trim().to_string()));
    set.insert(LOWERCASE, string_formatter(|s| s.to_lowercase()));
    set.insert(UPPERCASE, string_formatter(|s| s.to_uppercase()));
    set
}

pub fn validators() -> HandlerSet<Validator> {
    let mut set = HandlerSet::new();
    set.insert(REQUIRED, Validator::new(required));
    set.insert(MIN, Validator::new(min));
    set.insert(MAX, Validator::new(max));
    set.insert(MINLENGTH, Validator::new(minlength));
    set.insert(MAXLENGTH, Validator::new(maxlength));
    set.insert(ENUM, Validator::new(one_of));
    set.insert(MATCH, Validator::new(matches_pattern));
    set
}

fn string_formatter(f: fn(&str) -> String) -> Formatter {
    Formatter::new(move |option, value| {
        if !option.is_some_and(Value::is_truthy) {
            return value;
        }
        map_strings(value, f)
    })
}

fn map_strings(value: Value, f: fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| map_strings(v, f)).collect()),
        other => other,
    }
}

/// Applies `check` to the value, or to every element of an array value.
/// Null values pass; `required` is responsible for them.
fn each<F>(value: &Value, mut check: F) -> bool
where
    F: FnMut(&Value) -> bool,
{
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().all(|item| item.is_null() || check(item)),
        other => check(other),
    }
}

fn required(option: Option<&Value>, value: &Value, param: &Param) -> Verdict {
    let required = option.is_some_and(Value::is_truthy);
    let present = !matches!(value, Value::Null) && value.as_str() != Some("");
    Verdict::check(!required || present, || format!("{} is required", param.name()))
}

fn min(option: Option<&Value>, value: &Value, param: &Param) -> Verdict {
    let Some(bound) = option.and_then(Value::as_f64) else {
        return Verdict::pass();
    };
    let valid = each(value, |v| v.as_f64().is_none_or(|n| n >= bound));
    Verdict::check(valid, || {
        format!("{} must be greater than or equal to {}", param.name(), Value::Number(bound))
    })
}

fn max(option: Option<&Value>, value: &Value, param: &Param) -> Verdict {
    let Some(bound) = option.and_then(Value::as_f64) else {
        return Verdict::pass();
    };
    let valid = each(value, |v| v.as_f64().is_none_or(|n| n <= bound));
    Verdict::check(valid, || {
        format!("{} must be less than or equal to {}", param.name(), Value::Number(bound))
    })
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn minlength(option: Option<&Value>, value: &Value, param: &Param) -> Verdict {
    let Some(bound) = option.and_then(Value::as_f64) else {
        return Verdict::pass();
    };
    let valid = length_of(value).is_none_or(|len| len as f64 >= bound);
    Verdict::check(valid, || {
        format!(
            "{} must have length greater than or equal to {}",
            param.name(),
            Value::Number(bound)
        )
    })
}

fn maxlength(option: Option<&Value>, value: &Value, param: &Param) -> Verdict {
    let Some(bound) = option.and_then(Value::as_f64) else {
        return Verdict::pass();
    };
    let valid = length_of(value).is_none_or(|len| len as f64 <= bound);
    Verdict::check(valid, || {
        format!(
            "{} must have length less than or equal to {}",
            param.name(),
            Value::Number(bound)
        )
    })
}

fn one_of(option: Option<&Value>, value: &Value, param: &Param) -> Verdict {
    let Some(allowed) = option.and_then(Value::as_array) else {
        return Verdict::pass();
    };
    let valid = each(value, |v| allowed.contains(v));
    Verdict::check(valid, || {
        let list: Vec<String> = allowed.iter().map(ToString::to_string).collect();
        format!("{} must be one of: {}", param.name(), list.join(", "))
    })
}

fn matches_pattern(option: Option<&Value>, value: &Value, param: &Param) -> Verdict {
    let pattern = match option {
        Some(Value::RegExp(pattern)) => pattern.clone(),
        Some(Value::String(source)) => match Pattern::new(source) {
            Ok(pattern) => pattern,
            Err(_) => return Verdict::pass(),
        },
        _ => return Verdict::pass(),
    };
    let valid = each(value, |v| v.as_str().is_none_or(|s| pattern.is_match(s)));
    Verdict::check(valid, || {
        format!(
            "{} must match regular expression /{}/i",
            param.name(),
            pattern.source()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ParamType;
    use crate::options::ParamOptions;

    fn param(value: impl Into<Value>, options: ParamOptions) -> Param {
        Param::new("field", value, options)
    }

    #[test]
    fn case_formatters_apply_only_when_enabled() {
        let options = ParamOptions::scalar(ParamType::String, None).with_option(UPPERCASE, true);
        assert_eq!(param("test", options).value(), &Value::from("TEST"));

        let options = ParamOptions::scalar(ParamType::String, None).with_option(UPPERCASE, false);
        assert_eq!(param("test", options).value(), &Value::from("test"));

        let options = ParamOptions::array_of(ParamType::String, None)
            .with_option(TRIM, true)
            .with_option(LOWERCASE, true);
        assert_eq!(
            param(" A , B", options).value(),
            &Value::from(vec!["a", "b"])
        );
    }

    #[test]
    fn required_rejects_null_and_empty_string() {
        let options = ParamOptions::scalar(ParamType::String, None).with_option(REQUIRED, true);
        let err = param(Value::Null, options.clone()).validate().unwrap_err();
        assert_eq!(err.param, "field");
        assert_eq!(err.name, REQUIRED);
        assert_eq!(err.message, "field is required");
        assert!(param("", options.clone()).validate().is_err());
        assert!(param("x", options).validate().is_ok());
    }

    #[test]
    fn numeric_bounds() {
        let options = ParamOptions::scalar(ParamType::Number, None)
            .with_option(MIN, 1)
            .with_option(MAX, 10);
        assert!(param(5, options.clone()).validate().is_ok());
        let err = param(0, options.clone()).validate().unwrap_err();
        assert_eq!(err.message, "field must be greater than or equal to 1");
        let err = param(11, options).validate().unwrap_err();
        assert_eq!(err.name, MAX);
    }

    #[test]
    fn length_bounds() {
        let options = ParamOptions::scalar(ParamType::String, None)
            .with_option(MINLENGTH, 2)
            .with_option(MAXLENGTH, 4);
        assert!(param("abc", options.clone()).validate().is_ok());
        assert_eq!(
            param("a", options.clone()).validate().unwrap_err().name,
            MINLENGTH
        );
        assert_eq!(param("abcde", options).validate().unwrap_err().name, MAXLENGTH);
    }

    #[test]
    fn enum_and_match() {
        let options = ParamOptions::scalar(ParamType::String, None)
            .with_option(ENUM, vec!["red", "blue"]);
        assert!(param("red", options.clone()).validate().is_ok());
        let err = param("green", options).validate().unwrap_err();
        assert_eq!(err.message, "field must be one of: red, blue");

        let options = ParamOptions::scalar(ParamType::String, None)
            .with_option(MATCH, Pattern::new("^[a-z]+$").unwrap());
        assert!(param("Abc", options.clone()).validate().is_ok());
        assert_eq!(param("a1", options).validate().unwrap_err().name, MATCH);
    }
}
