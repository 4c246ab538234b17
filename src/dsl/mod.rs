//! # DSL Module
//!
//! Declaring documentation next to handlers.
//!
//! A declaration phase is opened per controller with
//! [`Application::dsl`](crate::registry::Application::dsl). Calls such as
//! `api`, `desc`, `param`, `error`, `example` and `see` accumulate in a
//! [`StagingBuffer`]; [`Dsl::define`] then commits the buffer as the
//! description of the named handler and wraps the handler in a
//! [`ValidatedHandler`].
//!
//! ## Lifecycle of one method
//!
//! ```text
//! Undeclared -> Staged -> Committed -> Staged (redeclared) -> Committed (replaced)
//! ```
//!
//! [`Application::reset`](crate::registry::Application::reset) returns every
//! method to `Undeclared`.
//!
//! ## Ordering
//!
//! Declarations must directly precede the `define` they describe, on one
//! thread. The buffer is emptied on every `define`, including for ignored
//! and undocumented methods, so stale declarations never reach a later
//! method.

mod context;
mod handler;
mod staging;

pub use context::{Dsl, ResourceDecl};
pub use handler::ValidatedHandler;
pub use staging::{strip_indent, StagedMethod, StagingBuffer};
