//! # Configuration Module
//!
//! Settings read by the registry and the documentation assembly.
//!
//! ## Sources
//!
//! [`DocsConfig`] deserializes from YAML (`.yaml`/`.yml`), TOML (`.toml`)
//! or JSON, chosen by file extension. Every field has a default so an empty
//! file is a valid configuration. A few settings can then be overridden from
//! the environment with [`DocsConfig::apply_env`]:
//!
//! | Variable                    | Field             |
//! |-----------------------------|-------------------|
//! | `BRRTDOC_DEFAULT_VERSION`   | `default_version` |
//! | `BRRTDOC_VALIDATE`          | `validate`        |
//! | `BRRTDOC_USE_CACHE`         | `use_cache`       |
//! | `BRRTDOC_DOC_BASE_URL`      | `doc_base_url`    |
//!
//! ## Example
//!
//! ```yaml
//! app_name: Pet Store
//! default_version: v1
//! copyright: "&copy; 2026 Microscaler"
//! api_base_url:
//!   v1: /api/v1
//!   v2: /api/v2
//! ignored:
//!   - HealthController
//!   - UsersController#internal_sync
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::validator::ValidationMode;

const DEFAULT_API_BASE_URL: &str = "/api";

/// Documentation and validation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub app_name: String,
    /// Per-version application description
    pub app_info: HashMap<String, String>,
    pub copyright: Option<String>,
    pub doc_base_url: String,
    /// Per-version prefix of the documented API
    pub api_base_url: HashMap<String, String>,
    /// Whether documentation URLs carry the version
    pub version_in_url: bool,
    pub default_version: String,
    /// `"Controller"` or `"Controller#method"` entries that are never documented
    pub ignored: Vec<String>,
    /// Install validating wrappers around handlers
    pub validate: bool,
    /// Reject undeclared keys inside nested params
    pub strict_params: bool,
    pub use_cache: bool,
    pub force_dsl: bool,
    /// Recorded request/response examples (YAML)
    pub examples_file: Option<PathBuf>,
    /// Directory scanned for declaration manifests
    pub declarations_dir: Option<PathBuf>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            app_name: "Another API".to_string(),
            app_info: HashMap::new(),
            copyright: None,
            doc_base_url: "/apidoc".to_string(),
            api_base_url: HashMap::new(),
            version_in_url: true,
            default_version: "1.0".to_string(),
            ignored: Vec::new(),
            validate: true,
            strict_params: false,
            use_cache: false,
            force_dsl: false,
            examples_file: None,
            declarations_dir: None,
        }
    }
}

fn env_bool(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    })
}

impl DocsConfig {
    /// Load a configuration file, choosing the format by extension
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let config = match ext.as_str() {
            "yaml" | "yml" => {
                if content.trim().is_empty() {
                    Self::default()
                } else {
                    serde_yaml::from_str(&content)?
                }
            }
            "toml" => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        Ok(config)
    }

    /// Override selected fields from `BRRTDOC_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(version) = env::var("BRRTDOC_DEFAULT_VERSION") {
            if !version.trim().is_empty() {
                self.default_version = version;
            }
        }
        if let Some(validate) = env_bool("BRRTDOC_VALIDATE") {
            self.validate = validate;
        }
        if let Some(use_cache) = env_bool("BRRTDOC_USE_CACHE") {
            self.use_cache = use_cache;
        }
        if let Ok(url) = env::var("BRRTDOC_DOC_BASE_URL") {
            self.doc_base_url = url;
        }
    }

    /// Whether declarations have to be interpreted at all
    ///
    /// With validation off and documentation served from cache there is
    /// nothing to do, unless explicitly forced.
    #[must_use]
    pub fn active_dsl(&self) -> bool {
        self.validate || !self.use_cache || self.force_dsl
    }

    #[must_use]
    pub fn validation_mode(&self) -> ValidationMode {
        if self.strict_params {
            ValidationMode::Strict
        } else {
            ValidationMode::Lenient
        }
    }

    #[must_use]
    pub fn api_base_url(&self, version: &str) -> &str {
        self.api_base_url
            .get(version)
            .map(String::as_str)
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    #[must_use]
    pub fn app_info(&self, version: &str) -> Option<&str> {
        self.app_info.get(version).map(String::as_str)
    }

    /// Join `path` onto the documentation base URL with a single `/`
    #[must_use]
    pub fn full_url(&self, path: &str) -> String {
        let base = self.doc_base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Documentation URL of a version, or of the unversioned root
    #[must_use]
    pub fn doc_url(&self, version: &str) -> String {
        if self.version_in_url {
            self.full_url(version)
        } else {
            self.full_url("")
        }
    }

    /// Whether a controller (or one of its methods) is excluded from documentation
    #[must_use]
    pub fn is_ignored(&self, controller: &str, method: Option<&str>) -> bool {
        self.ignored.iter().any(|entry| {
            entry == controller
                || method
                    .map(|m| entry.split_once('#') == Some((controller, m)))
                    .unwrap_or(false)
        })
    }
}
