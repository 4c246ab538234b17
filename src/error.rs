use serde_json::{json, Value};
use std::fmt;

use crate::validator::ParamType;

/// Registration-time error
///
/// Raised while declarations are staged or committed. These are not
/// recoverable by the registry itself: they propagate to whatever drives
/// controller loading, which may decide to skip the offending controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Resource name or version cannot be resolved for a controller
    ///
    /// The sentinel base controller has no resource name, so anything
    /// registered directly against it ends up here.
    Configuration {
        /// Type name of the controller being registered
        controller: String,
        /// What could not be resolved
        reason: String,
    },
    /// A description was declared twice for the same pending method
    DuplicateDeclaration {
        /// The description that was already staged
        existing: String,
    },
    /// A shorthand key (`"v1#users#show"`) does not have a valid shape
    MalformedKey {
        /// The key as given by the caller
        key: String,
        /// Why it was rejected
        reason: &'static str,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Configuration { controller, reason } => {
                write!(f, "configuration error for controller '{}': {}", controller, reason)
            }
            RegistryError::DuplicateDeclaration { existing } => {
                write!(
                    f,
                    "double method description: '{}' is already staged for the next method",
                    existing
                )
            }
            RegistryError::MalformedKey { key, reason } => {
                write!(f, "malformed description key '{}': {}", key, reason)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Call-time parameter validation error
///
/// Returned synchronously by a [`ValidatedHandler`](crate::dsl::ValidatedHandler)
/// before the original handler runs. The host framework is expected to turn
/// these into client-facing 4xx responses; the registry never retries or logs
/// them.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// A required parameter is absent from the incoming parameter set
    Missing {
        /// Full parameter name (`user[name]` for nested params)
        param: String,
    },
    /// The value is not of the declared type
    TypeMismatch {
        /// Full parameter name
        param: String,
        /// Declared type
        expected: ParamType,
        /// JSON kind of the offending value
        found: &'static str,
    },
    /// The value is not one of the allowed values
    InvalidValue {
        /// Full parameter name
        param: String,
        /// Offending value
        value: Value,
        /// The declared set of allowed values
        allowed: Vec<Value>,
    },
    /// A custom predicate, pattern or strict-mode check rejected the value
    Validation {
        /// Full parameter name
        param: String,
        /// Message supplied by the predicate, or a generic default
        message: String,
    },
}

impl ParamError {
    /// Name of the parameter that failed
    #[must_use]
    pub fn param(&self) -> &str {
        match self {
            ParamError::Missing { param }
            | ParamError::TypeMismatch { param, .. }
            | ParamError::InvalidValue { param, .. }
            | ParamError::Validation { param, .. } => param,
        }
    }

    /// Short machine-readable kind, used in JSON error bodies
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ParamError::Missing { .. } => "missing_parameter",
            ParamError::TypeMismatch { .. } => "type_mismatch",
            ParamError::InvalidValue { .. } => "invalid_value",
            ParamError::Validation { .. } => "validation_failed",
        }
    }

    /// HTTP status the host framework should answer with
    #[must_use]
    pub fn status_code(&self) -> u16 {
        400
    }

    /// JSON error body in the `{ "error": ... }` shape used by handler responses
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": self.kind(),
            "param": self.param(),
            "message": self.to_string(),
        })
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::Missing { param } => write!(f, "Expecting {} parameter.", param),
            ParamError::TypeMismatch {
                param,
                expected,
                found,
            } => write!(
                f,
                "Parameter {} expecting to be {}, got {}.",
                param, expected, found
            ),
            ParamError::InvalidValue {
                param,
                value,
                allowed,
            } => {
                let allowed: Vec<String> = allowed.iter().map(Value::to_string).collect();
                write!(
                    f,
                    "Parameter {} has invalid value ({}). Expecting one of: {}.",
                    param,
                    value,
                    allowed.join(", ")
                )
            }
            ParamError::Validation { param, message } => {
                write!(f, "Parameter {}: {}", param, message)
            }
        }
    }
}

impl std::error::Error for ParamError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_error_accessors() {
        let err = ParamError::Missing {
            param: "id".to_string(),
        };
        assert_eq!(err.param(), "id");
        assert_eq!(err.kind(), "missing_parameter");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Expecting id parameter.");
    }

    #[test]
    fn test_param_error_json_body() {
        let err = ParamError::TypeMismatch {
            param: "id".to_string(),
            expected: ParamType::Integer,
            found: "string",
        };
        let body = err.to_json();
        assert_eq!(body["error"], "type_mismatch");
        assert_eq!(body["param"], "id");
        assert_eq!(
            body["message"],
            "Parameter id expecting to be Integer, got string."
        );
    }

    #[test]
    fn test_invalid_value_lists_allowed() {
        let err = ParamError::InvalidValue {
            param: "state".to_string(),
            value: json!("gone"),
            allowed: vec![json!("open"), json!("closed")],
        };
        assert!(err.to_string().contains(r#""open", "closed""#));
    }

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::MalformedKey {
            key: "a#b#c#d".to_string(),
            reason: "too many segments",
        };
        assert_eq!(
            err.to_string(),
            "malformed description key 'a#b#c#d': too many segments"
        );
    }
}
