use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Incoming parameter set handed to a validated handler
pub type Params = serde_json::Map<String, Value>;

/// Primitive and composite types a parameter can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Hash,
    Any,
}

impl ParamType {
    /// Coarse type name rendered in documentation
    #[must_use]
    pub fn expected_type(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer | ParamType::Number => "numeric",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Hash => "hash",
            ParamType::Any => "any",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamType::String => "String",
            ParamType::Integer => "Integer",
            ParamType::Number => "Number",
            ParamType::Boolean => "Boolean",
            ParamType::Array => "Array",
            ParamType::Hash => "Hash",
            ParamType::Any => "Any",
        };
        write!(f, "{}", s)
    }
}

/// Caller-supplied check for a single value
#[derive(Clone)]
pub struct Predicate {
    pub(crate) check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    pub(crate) message: Option<String>,
}

impl Predicate {
    /// Message reported when the check fails
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("is invalid")
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Validation rule attached to one parameter
#[derive(Debug, Clone)]
pub enum ParamValidator {
    Type(ParamType),
    OneOf(Vec<Value>),
    Nested(ParamSet),
    Pattern(Regex),
    Predicate(Predicate),
}

impl ParamValidator {
    /// Value must equal one of `values`
    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        ParamValidator::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Value must be a keyed container whose entries satisfy the params
    /// declared by `block`
    pub fn nested<F>(block: F) -> Self
    where
        F: FnOnce(&mut ParamSet),
    {
        let mut set = ParamSet::new();
        block(&mut set);
        ParamValidator::Nested(set)
    }

    /// Value must be a string matching `pattern`
    ///
    /// # Errors
    ///
    /// Returns the regex compile error if `pattern` is not a valid expression.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(ParamValidator::Pattern(Regex::new(pattern)?))
    }

    /// Value must satisfy `check`; failures report a generic message
    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        ParamValidator::Predicate(Predicate {
            check: Arc::new(check),
            message: None,
        })
    }

    /// Value must satisfy `check`; failures report `message`
    pub fn predicate_with_message<F>(message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        ParamValidator::Predicate(Predicate {
            check: Arc::new(check),
            message: Some(message.into()),
        })
    }

    /// Nested params, when this is a nested validator
    #[must_use]
    pub fn nested_params(&self) -> Option<&ParamSet> {
        match self {
            ParamValidator::Nested(set) => Some(set),
            _ => None,
        }
    }

    /// Coarse type name rendered in documentation
    #[must_use]
    pub fn expected_type(&self) -> &'static str {
        match self {
            ParamValidator::Type(ty) => ty.expected_type(),
            ParamValidator::OneOf(_) | ParamValidator::Pattern(_) => "string",
            ParamValidator::Nested(_) => "hash",
            ParamValidator::Predicate(_) => "any",
        }
    }

    /// Human readable rule rendered in documentation
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            ParamValidator::Type(ParamType::Any) => "Any value".to_string(),
            ParamValidator::Type(ty @ (ParamType::Integer | ParamType::Array)) => {
                format!("Must be an {}", ty)
            }
            ParamValidator::Type(ty) => format!("Must be a {}", ty),
            ParamValidator::OneOf(values) => {
                let values: Vec<String> = values
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                format!("Must be one of: {}.", values.join(", "))
            }
            ParamValidator::Nested(_) => "Must be a Hash".to_string(),
            ParamValidator::Pattern(re) => {
                format!("Must match regular expression /{}/.", re.as_str())
            }
            ParamValidator::Predicate(p) => match &p.message {
                Some(message) => format!("Must pass check: {}", message),
                None => "Must pass a custom check.".to_string(),
            },
        }
    }
}

impl From<ParamType> for ParamValidator {
    fn from(ty: ParamType) -> Self {
        ParamValidator::Type(ty)
    }
}

impl From<Regex> for ParamValidator {
    fn from(re: Regex) -> Self {
        ParamValidator::Pattern(re)
    }
}

/// Options accepted by `param(...)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamOptions {
    pub required: bool,
    pub allow_nil: bool,
    pub description: String,
}

impl ParamOptions {
    #[must_use]
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn optional() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn desc(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Accept an explicit `null` for this parameter
    #[must_use]
    pub fn allow_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }
}

/// A single declared parameter
#[derive(Debug, Clone)]
pub struct ParamDescription {
    pub name: String,
    pub validator: ParamValidator,
    pub required: bool,
    pub allow_nil: bool,
    pub description: String,
}

impl ParamDescription {
    pub fn new(name: impl Into<String>, validator: impl Into<ParamValidator>, options: ParamOptions) -> Self {
        Self {
            name: name.into(),
            validator: validator.into(),
            required: options.required,
            allow_nil: options.allow_nil,
            description: options.description,
        }
    }

    /// Name including the enclosing params, e.g. `user[address][city]`
    #[must_use]
    pub fn full_name(&self, parent: Option<&str>) -> String {
        match parent {
            Some(parent) => format!("{}[{}]", parent, self.name),
            None => self.name.clone(),
        }
    }
}

/// How nested containers treat keys that were never declared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Undeclared keys are ignored
    #[default]
    Lenient,
    /// Undeclared keys are rejected
    Strict,
}

/// Ordered parameter declarations keyed by name
///
/// Declaring a name twice overwrites the earlier declaration in place, so
/// iteration order is always first-declaration order.
#[derive(Debug, Clone, Default)]
pub struct ParamSet {
    params: IndexMap<String, ParamDescription>,
}

impl ParamSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a parameter
    pub fn param(
        &mut self,
        name: impl Into<String>,
        validator: impl Into<ParamValidator>,
        options: ParamOptions,
    ) -> &mut Self {
        self.insert(ParamDescription::new(name, validator, options));
        self
    }

    pub fn insert(&mut self, param: ParamDescription) {
        self.params.insert(param.name.clone(), param);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamDescription> {
        self.params.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamDescription> {
        self.params.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParamSet {
    type Item = &'a ParamDescription;
    type IntoIter = indexmap::map::Values<'a, String, ParamDescription>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.values()
    }
}
