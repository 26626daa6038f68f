use crate::builtin;
use crate::coerce::coerce;
use crate::error::Result;
use crate::handler::{Formatter, Handler, HandlerSet, ValidationError, Validator};
use crate::options::ParamOptions;
use crate::value::Value;

/// A named, typed value slot with attached formatters and validators.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    value: Value,
    options: ParamOptions,
    formatters: HandlerSet<Formatter>,
    validators: HandlerSet<Validator>,
}

impl Param {
    /// Create a param carrying the built-in handlers, then set `value`.
    pub fn new(name: impl Into<String>, value: impl Into<Value>, options: ParamOptions) -> Self {
        let mut param = Self {
            name: name.into(),
            value: Value::Null,
            options,
            formatters: builtin::formatters(),
            validators: builtin::validators(),
        };
        param.set_value(value);
        param
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Set the value: `Null` falls back to the `default` option, the result is
    /// coerced to the declared type and then run through every formatter in
    /// attachment order.
    pub fn set_value(&mut self, value: impl Into<Value>) -> &Value {
        let mut value = value.into();
        if value.is_null() {
            if let Some(default) = &self.options.default {
                value = default.clone();
            }
        }
        value = coerce(value, self.options.type_spec.as_ref());
        for (name, formatter) in self.formatters.iter() {
            value = formatter.call(self.options.get(name), value);
        }
        self.value = value;
        &self.value
    }

    pub fn options(&self) -> &ParamOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ParamOptions {
        &mut self.options
    }

    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Set an option. Takes effect on the next `set_value` or `validate`.
    pub fn set_option(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<&Value>> {
        self.options.set(name, value.into())?;
        Ok(self.options.get(name))
    }

    pub fn formatter(&self, name: &str) -> Option<&Formatter> {
        self.formatters.get(name)
    }

    pub fn set_formatter(&mut self, name: &str, formatter: Formatter) {
        self.attach(name, Handler::Formatter(formatter));
    }

    pub fn validator(&self, name: &str) -> Option<&Validator> {
        self.validators.get(name)
    }

    pub fn set_validator(&mut self, name: &str, validator: Validator) {
        self.attach(name, Handler::Validator(validator));
    }

    /// Attach a handler of either kind, replacing one of the same name.
    pub fn attach(&mut self, name: &str, handler: Handler) {
        match handler {
            Handler::Formatter(formatter) => self.formatters.insert(name, formatter),
            Handler::Validator(validator) => self.validators.insert(name, validator),
        }
    }

    pub fn formatters(&self) -> &HandlerSet<Formatter> {
        &self.formatters
    }

    pub fn validators(&self) -> &HandlerSet<Validator> {
        &self.validators
    }

    /// Run validators in attachment order and report the first failure.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (name, validator) in self.validators.iter() {
            let verdict = validator.call(self.options.get(name), &self.value, self);
            if !verdict.valid {
                return Err(ValidationError {
                    param: self.name.clone(),
                    name: name.to_string(),
                    value: self.value.clone(),
                    valid: false,
                    message: verdict.message,
                });
            }
        }
        Ok(())
    }

    /// Callback form of [`Param::validate`]: `next` receives the error, if any.
    pub fn validate_with<F, R>(&self, next: F) -> R
    where
        F: FnOnce(Option<&ValidationError>) -> R,
    {
        let result = self.validate();
        next(result.as_ref().err())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::handler::Verdict;
    use crate::kind::ParamType;
    use crate::value::Pattern;

    fn add(value: impl Into<Value>, options: ParamOptions) -> Value {
        Param::new("test", value, options).value().clone()
    }

    #[test]
    fn value_falls_back_to_default() {
        assert_eq!(
            add(Value::Null, ParamOptions::new().with_default("123")),
            Value::from("123")
        );
        assert_eq!(
            add(Value::Null, ParamOptions::scalar(ParamType::Number, Some(Value::from(123)))),
            Value::from(123)
        );
        assert_eq!(
            add("given", ParamOptions::new().with_default("123")),
            Value::from("given")
        );
    }

    #[test]
    fn value_is_coerced_to_type() {
        assert_eq!(add(123, ParamOptions::scalar(ParamType::String, None)), Value::from("123"));
        assert_eq!(add("123", ParamOptions::scalar(ParamType::Number, None)), Value::from(123));
        assert_eq!(add("123", ParamOptions::scalar(ParamType::Boolean, None)), Value::from(true));
        assert_eq!(
            add("2016", ParamOptions::scalar(ParamType::Date, None)),
            Value::Date(Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            add("123", ParamOptions::scalar(ParamType::RegExp, None)),
            Value::RegExp(Pattern::new("123").unwrap())
        );
        assert_eq!(
            add("2016,2017", ParamOptions::array_of(ParamType::Date, None)),
            Value::Array(vec![
                Value::Date(Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap()),
                Value::Date(Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap()),
            ])
        );
    }

    #[test]
    fn formatter_runs_on_next_set_only() {
        let mut param = Param::new("test", "123", ParamOptions::new());
        param.set_formatter(
            "scream",
            Formatter::new(|scream, value| match (scream.is_some_and(Value::is_truthy), value) {
                (true, Value::String(s)) => Value::String(s.to_uppercase()),
                (_, value) => value,
            }),
        );
        assert!(param.formatter("scream").is_some());
        assert_eq!(param.value(), &Value::from("123"));

        param.set_option("scream", true).unwrap();
        assert_eq!(param.value(), &Value::from("123"));
        assert_eq!(param.set_value("help"), &Value::from("HELP"));
    }

    #[test]
    fn validators_short_circuit_in_attachment_order() {
        let mut param = Param::new("test", "help", ParamOptions::new());
        param.set_validator(
            "isPlural",
            Validator::new(|plural, value, param| {
                let plural = plural.is_some_and(Value::is_truthy);
                let ends_in_s = value.as_str().is_some_and(|s| s.to_lowercase().ends_with('s'));
                Verdict::check(!plural || ends_in_s, || {
                    format!("{} must be in plural form.", param.name())
                })
            }),
        );
        param.set_validator("never", Validator::new(|_, _, _| Verdict::fail("unreachable")));

        param.set_option("never", true).unwrap();
        param.set_option("isPlural", true).unwrap();
        let err = param.validate().unwrap_err();
        assert_eq!(err.name, "isPlural");
        assert_eq!(err.message, "test must be in plural form.");
        assert!(!err.valid);

        param.set_value("helps");
        assert_eq!(param.validate().unwrap_err().name, "never");
    }

    #[test]
    fn validate_with_passes_error_to_callback() {
        let options = ParamOptions::scalar(ParamType::String, None).with_option("required", true);
        let param = Param::new("name", Value::Null, options);
        let param_name = param.validate_with(|err| err.map(|e| e.param.clone()));
        assert_eq!(param_name.as_deref(), Some("name"));
    }
}
