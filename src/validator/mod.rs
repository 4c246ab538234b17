//! # Validator Module
//!
//! Parameter rules declared with `param(...)` and checked on every call of a
//! validated handler.
//!
//! ## Overview
//!
//! A [`ParamDescription`] pairs a parameter name with a [`ParamValidator`]
//! and a few options (required, nil allowed, description). Validators are a
//! small, fixed and composable set:
//!
//! - **Type** - the value must be a [`ParamType`]; HTTP string forms are
//!   accepted for scalars (`"5"` is an `Integer`)
//! - **OneOf** - the value must equal one of a fixed set
//! - **Nested** - the value must be a keyed container whose entries are
//!   validated against a nested [`ParamSet`]
//! - **Pattern** - the value must be a string matching a regular expression
//! - **Predicate** - a caller-supplied boolean check
//!
//! Validation is pure: neither the value nor the declaration is modified.
//!
//! ## Usage
//!
//! ```rust
//! use brrtdoc::validator::{ParamOptions, ParamSet, ParamType, ParamValidator, ValidationMode};
//! use serde_json::json;
//!
//! let mut params = ParamSet::new();
//! params.param("id", ParamType::Integer, ParamOptions::required());
//! params.param(
//!     "user",
//!     ParamValidator::nested(|user| {
//!         user.param("name", ParamType::String, ParamOptions::required());
//!     }),
//!     ParamOptions::optional(),
//! );
//!
//! let input = json!({"id": "42", "user": {"name": "ann"}});
//! assert!(params
//!     .validate(input.as_object().unwrap(), ValidationMode::Lenient)
//!     .is_ok());
//! ```

mod check;
mod types;

pub use check::json_kind;
pub use types::{
    ParamDescription, ParamOptions, ParamSet, ParamType, ParamValidator, Params, Predicate,
    ValidationMode,
};
