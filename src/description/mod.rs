//! Documentation records produced by committing staged declarations.
//!
//! A [`MethodDescription`] is built once from a staging snapshot and never
//! edited afterwards; redefining a method replaces it wholesale. Every
//! method belongs to exactly one [`ResourceDescription`], which groups the
//! methods of one controller for one API version.

mod method;
mod resource;

pub use method::{Endpoint, ErrorDescription, MethodDescription};
pub use resource::ResourceDescription;
