//! # brrtdoc
//!
//! **brrtdoc** is a declarative documentation and parameter-validation layer
//! for HTTP API handlers. Documentation is declared next to each handler,
//! incoming parameters are checked against it before the handler runs, and
//! the collected metadata is assembled into a versioned documentation tree
//! for JSON export.
//!
//! ## Architecture
//!
//! - **[`validator`]** - composable parameter rules (type, allowed values,
//!   nested params, pattern, predicate)
//! - **[`description`]** - method and resource documentation records
//! - **[`dsl`]** - the declaration context, its staging buffer and the
//!   validating handler wrapper
//! - **[`registry`]** - the versioned [`Application`] store, controller
//!   hierarchy and version resolution
//! - **[`docs`]** - documentation tree assembly
//! - **[`examples`]** - recorded request/response examples
//! - **[`discovery`]** - declaration manifests and rebuilds from them
//! - **[`hot_reload`]** - rebuilds on manifest changes
//! - **[`linter`]** - documentation consistency checks
//! - **[`config`]**, **[`logging`]**, **[`error`]**, **[`cli`]**
//!
//! ### Declaration Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Code as Controller code
//!     participant Dsl as Dsl
//!     participant Buffer as StagingBuffer
//!     participant App as Application
//!
//!     Code->>Dsl: api / desc / param / error
//!     Dsl->>Buffer: declare_*
//!     Code->>Dsl: define("show", handler)
//!     Dsl->>Buffer: snapshot_and_clear()
//!     Dsl->>App: define_method_description(controller, "show", staged)
//!     App->>App: resolve versions and resource name
//!     App->>App: replace or insert per version
//!     App-->>Dsl: Arc<MethodDescription>
//!     Dsl-->>Code: ValidatedHandler
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtdoc::error::ParamError;
//! use brrtdoc::registry::{Application, ControllerId};
//! use brrtdoc::validator::{ParamOptions, ParamType};
//! use http::Method;
//! use serde_json::json;
//!
//! let mut app = Application::default();
//! let users = app.declare_controller("UsersController", ControllerId::BASE);
//! app.set_controller_versions(users, ["v1"]);
//!
//! let mut dsl = app.dsl(users);
//! dsl.api(Method::GET, "/users/:id", "")
//!     .desc("show a user")?
//!     .param("id", ParamType::Integer, ParamOptions::required());
//! let show = dsl.define("show", |params| format!("user {}", params["id"]))?;
//! drop(dsl);
//!
//! let params = json!({"id": 5});
//! assert_eq!(show.call(params.as_object().unwrap()).unwrap(), "user 5");
//! let missing = show.call(&serde_json::Map::new()).unwrap_err();
//! assert!(matches!(missing, ParamError::Missing { .. }));
//!
//! let tree = app.to_document_tree("v1", None, None).unwrap();
//! println!("{}", serde_json::to_string_pretty(&tree).unwrap());
//! # Ok::<(), brrtdoc::error::RegistryError>(())
//! ```

pub mod cli;
pub mod config;
pub mod description;
pub mod discovery;
pub mod docs;
pub mod dsl;
pub mod error;
pub mod examples;
pub mod hot_reload;
pub mod linter;
pub mod logging;
pub mod registry;
pub mod validator;

pub use config::DocsConfig;
pub use error::{ParamError, RegistryError};
pub use registry::{Application, ControllerId, SharedApplication};
