//! # Registry Module
//!
//! The documentation registry: controllers, their resources per API version,
//! and the methods committed into them.
//!
//! ## Overview
//!
//! - [`Controllers`] - arena of handler groups with explicit parent links,
//!   rooted in the [`ControllerId::BASE`] sentinel
//! - [`Application`] - versioned map of resource name to
//!   [`ResourceDescription`](crate::description::ResourceDescription), plus
//!   per-controller resource-id and version overrides
//! - [`MethodKey`] / [`ResourceKey`] - `"v2#users#show"` style lookup keys
//!
//! ## Version resolution
//!
//! A method is committed into its explicitly declared versions, else into
//! the versions of the nearest controller in its ancestor chain that
//! declares any, else into the configured default version.
//!
//! ## Rebuilds
//!
//! [`Application::reset`] is the only way to forget registrations. Long
//! running processes share the registry as a [`SharedApplication`] and
//! rebuild it with [`rebuild_shared`], which holds the write lock for the
//! reset and the repopulation together.

mod application;
mod controller;
mod key;

pub use application::{rebuild_shared, Application, SharedApplication};
pub use controller::{controller_name, ControllerId, Controllers};
pub use key::{MethodKey, ResourceKey};
