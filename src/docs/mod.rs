//! # Docs Module
//!
//! Read-only assembly of the registry into a serializable documentation
//! tree:
//!
//! ```text
//! { docs: { name, info, copyright, doc_url, api_url,
//!           resources: { <name>: <resource> } | [<resource>] } }
//! ```
//!
//! Without a resource filter, `resources` is a map of every resource of the
//! version that has at least one method. With a filter it is a one-element
//! array, optionally narrowed to a single method.

mod render;

pub use render::{
    document_tree, DocTree, Docs, EndpointDoc, MethodDoc, ParamDoc, ResourceDoc, Resources, SeeDoc,
};
