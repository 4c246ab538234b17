//! # CLI Module
//!
//! Command-line access to the documentation registry, available as the
//! `brrtdoc` binary.
//!
//! ## Commands
//!
//! ### `export`
//!
//! Build the registry from manifests and print the JSON documentation tree:
//!
//! ```bash
//! brrtdoc export --declarations declarations --version v1
//! brrtdoc export -d declarations --resource users --method show -o users_show.json
//! ```
//!
//! ### `versions`
//!
//! ```bash
//! brrtdoc versions --declarations declarations
//! ```
//!
//! ### `lint`
//!
//! ```bash
//! brrtdoc lint --declarations declarations --fail-on-error
//! ```
//!
//! ### `watch`
//!
//! Rebuild on every manifest change, logging the documentation checksum:
//!
//! ```bash
//! brrtdoc watch --declarations declarations --config brrtdoc.yaml
//! ```
//!
//! Every command accepts `--config <FILE>`; without `--declarations` the
//! config's `declarations_dir` is used.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{build_application, run_cli, Cli, Commands, SourceArgs};
