//! Recorded request/response examples.
//!
//! Examples recorded from real traffic live in a YAML file keyed by
//! `"resource#method"`. They are loaded lazily, held as an opaque mapping,
//! and merged into the rendered documentation of the matching method.
//!
//! ```yaml
//! users#show:
//!   - verb: GET
//!     path: /api/users/1
//!     code: 200
//!     response_data: { id: 1, name: ann }
//! ```

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

fn default_show_in_doc() -> bool {
    true
}

/// One recorded request/response pair
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecordedExample {
    pub verb: String,
    pub path: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub request_data: Option<Value>,
    #[serde(default)]
    pub response_data: Option<Value>,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default = "default_show_in_doc")]
    pub show_in_doc: bool,
}

impl RecordedExample {
    /// Plain text rendering used in documentation
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(4);
        match &self.query {
            Some(q) if !q.is_empty() => lines.push(format!("{} {}?{}", self.verb, self.path, q)),
            _ => lines.push(format!("{} {}", self.verb, self.path)),
        }
        if let Some(data) = &self.request_data {
            lines.push(pretty(data));
        }
        if let Some(code) = self.code {
            lines.push(code.to_string());
        }
        if let Some(data) = &self.response_data {
            lines.push(pretty(data));
        }
        lines.join("\n")
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Lazily loaded store of recorded examples
#[derive(Debug, Default)]
pub struct RecordedExamples {
    source: Option<PathBuf>,
    loaded: Option<HashMap<String, Vec<RecordedExample>>>,
}

impl RecordedExamples {
    #[must_use]
    pub fn new(source: Option<PathBuf>) -> Self {
        Self {
            source,
            loaded: None,
        }
    }

    /// The recorded examples, loading them on first use
    ///
    /// A missing file yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn get(&mut self) -> anyhow::Result<&HashMap<String, Vec<RecordedExample>>> {
        if self.loaded.is_none() {
            let examples = match &self.source {
                Some(path) if path.exists() => load_examples(path)?,
                _ => HashMap::new(),
            };
            debug!(keys = examples.len(), "recorded examples loaded");
            self.loaded = Some(examples);
        }
        Ok(self.loaded.get_or_insert_with(HashMap::new))
    }

    /// What is currently held in memory, without loading
    #[must_use]
    pub fn cached(&self) -> Option<&HashMap<String, Vec<RecordedExample>>> {
        self.loaded.as_ref()
    }

    /// Discard the in-memory copy; the next access reloads
    pub fn reload(&mut self) {
        self.loaded = None;
    }

    /// Rendered examples to show for `resource#method`
    #[must_use]
    pub fn rendered_for(&self, resource: &str, method: &str) -> Vec<String> {
        let key = format!("{}#{}", resource, method);
        self.loaded
            .as_ref()
            .and_then(|m| m.get(&key))
            .map(|examples| {
                examples
                    .iter()
                    .filter(|e| e.show_in_doc)
                    .map(RecordedExample::render)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn load_examples(path: &Path) -> anyhow::Result<HashMap<String, Vec<RecordedExample>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read recorded examples {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse recorded examples {}", path.display()))
}
