use http::Method;
use serde::Serialize;

use crate::dsl::StagedMethod;
use crate::error::ParamError;
use crate::validator::{ParamSet, Params, ValidationMode};

/// One route a handler method is reachable through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub http_method: Method,
    pub path: String,
    pub description: String,
}

impl Endpoint {
    pub fn new(http_method: Method, path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            http_method,
            path: path.into(),
            description: description.into(),
        }
    }

    /// Placeholder names in the path pattern, for both `:id` and `{id}` styles
    #[must_use]
    pub fn path_params(&self) -> Vec<&str> {
        self.path
            .split('/')
            .filter_map(|segment| {
                if let Some(name) = segment.strip_prefix(':') {
                    Some(name)
                } else {
                    segment
                        .strip_prefix('{')
                        .and_then(|s| s.strip_suffix('}'))
                }
            })
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// A documented error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDescription {
    pub code: u16,
    pub description: String,
}

/// Documentation of one handler method within one resource and version
#[derive(Debug, Clone)]
pub struct MethodDescription {
    pub name: String,
    pub resource: String,
    pub version: String,
    pub endpoints: Vec<Endpoint>,
    pub description: Option<String>,
    pub params: ParamSet,
    pub errors: Vec<ErrorDescription>,
    pub examples: Vec<String>,
    pub see: Option<String>,
    pub formats: Option<Vec<String>>,
}

impl MethodDescription {
    /// Build from a staging snapshot
    pub fn from_staged(
        name: impl Into<String>,
        resource: impl Into<String>,
        version: impl Into<String>,
        staged: StagedMethod,
    ) -> Self {
        Self {
            name: name.into(),
            resource: resource.into(),
            version: version.into(),
            endpoints: staged.endpoints,
            description: staged.description,
            params: staged.params,
            errors: staged.errors,
            examples: staged.examples,
            see: staged.see,
            formats: staged.formats,
        }
    }

    /// Fully qualified key, `version#resource#method`
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}#{}#{}", self.version, self.resource, self.name)
    }

    /// Check an incoming parameter set against the declared params
    ///
    /// # Errors
    ///
    /// The first [`ParamError`] found.
    pub fn validate_params(&self, params: &Params, mode: ValidationMode) -> Result<(), ParamError> {
        self.params.validate(params, mode)
    }
}
