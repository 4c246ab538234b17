use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::types::{ParamSet, ParamType, ParamValidator, Params, ValidationMode};
use crate::error::ParamError;

#[allow(clippy::expect_used)]
static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?[0-9]+$").expect("valid integer regex"));
#[allow(clippy::expect_used)]
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][-+]?[0-9]+)?$").expect("valid number regex")
});

/// JSON kind of a value, as reported in type mismatch errors
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "hash",
    }
}

impl ParamType {
    /// Whether `value` is of this type
    ///
    /// Scalars also accept their string form since path and query
    /// parameters always arrive as strings.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (ParamType::Any, _) => true,
            (ParamType::String, Value::String(_)) => true,
            (ParamType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (ParamType::Integer, Value::String(s)) => INTEGER_RE.is_match(s),
            (ParamType::Number, Value::Number(_)) => true,
            (ParamType::Number, Value::String(s)) => NUMBER_RE.is_match(s),
            (ParamType::Boolean, Value::Bool(_)) => true,
            (ParamType::Boolean, Value::String(s)) => s == "true" || s == "false",
            (ParamType::Array, Value::Array(_)) => true,
            (ParamType::Hash, Value::Object(_)) => true,
            _ => false,
        }
    }
}

fn same_value(allowed: &Value, value: &Value) -> bool {
    if allowed == value {
        return true;
    }
    match (allowed, value) {
        (Value::String(_), _) => false,
        (other, Value::String(s)) => other.to_string() == *s,
        _ => false,
    }
}

impl ParamValidator {
    /// Validate a present value; `param` is the full parameter name used in errors
    ///
    /// # Errors
    ///
    /// Returns the first [`ParamError`] found, depth first.
    pub fn validate(&self, value: &Value, param: &str, mode: ValidationMode) -> Result<(), ParamError> {
        match self {
            ParamValidator::Type(ty) => {
                if ty.matches(value) {
                    Ok(())
                } else {
                    Err(ParamError::TypeMismatch {
                        param: param.to_string(),
                        expected: *ty,
                        found: json_kind(value),
                    })
                }
            }
            ParamValidator::OneOf(allowed) => {
                if allowed.iter().any(|a| same_value(a, value)) {
                    Ok(())
                } else {
                    Err(ParamError::InvalidValue {
                        param: param.to_string(),
                        value: value.clone(),
                        allowed: allowed.clone(),
                    })
                }
            }
            ParamValidator::Nested(set) => match value {
                Value::Object(entries) => set.validate_scoped(entries, mode, Some(param)),
                other => Err(ParamError::TypeMismatch {
                    param: param.to_string(),
                    expected: ParamType::Hash,
                    found: json_kind(other),
                }),
            },
            ParamValidator::Pattern(re) => match value {
                Value::String(s) if re.is_match(s) => Ok(()),
                Value::String(_) => Err(ParamError::Validation {
                    param: param.to_string(),
                    message: format!("must match /{}/", re.as_str()),
                }),
                other => Err(ParamError::TypeMismatch {
                    param: param.to_string(),
                    expected: ParamType::String,
                    found: json_kind(other),
                }),
            },
            ParamValidator::Predicate(predicate) => {
                if (predicate.check)(value) {
                    Ok(())
                } else {
                    Err(ParamError::Validation {
                        param: param.to_string(),
                        message: predicate.message().to_string(),
                    })
                }
            }
        }
    }
}

impl ParamSet {
    /// Validate an incoming parameter set against these declarations
    ///
    /// Required params are checked for presence first, then present values
    /// are validated in declaration order; the first failure is returned.
    /// Keys that were never declared are ignored at the top level.
    ///
    /// # Errors
    ///
    /// [`ParamError::Missing`] for an absent required param, otherwise
    /// whatever the param's validator reports.
    pub fn validate(&self, params: &Params, mode: ValidationMode) -> Result<(), ParamError> {
        self.validate_scoped(params, mode, None)
    }

    pub(crate) fn validate_scoped(
        &self,
        entries: &Params,
        mode: ValidationMode,
        parent: Option<&str>,
    ) -> Result<(), ParamError> {
        // a missing required param is reported before any invalid value
        if let Some(missing) = self
            .iter()
            .find(|p| p.required && !entries.contains_key(&p.name))
        {
            return Err(ParamError::Missing {
                param: missing.full_name(parent),
            });
        }
        for param in self.iter() {
            match entries.get(&param.name) {
                None => {}
                Some(Value::Null) if param.allow_nil => {}
                Some(value) => param
                    .validator
                    .validate(value, &param.full_name(parent), mode)?,
            }
        }
        // strict mode only applies inside nested containers
        if let (ValidationMode::Strict, Some(parent)) = (mode, parent) {
            if let Some(unknown) = entries.keys().find(|k| self.get(k).is_none()) {
                return Err(ParamError::Validation {
                    param: format!("{}[{}]", parent, unknown),
                    message: "is not a declared parameter".to_string(),
                });
            }
        }
        Ok(())
    }
}
