//! # Discovery Module
//!
//! Declaration manifests: controllers and their documented methods
//! described in YAML or JSON files instead of code.
//!
//! A rebuild replays every manifest of a directory through the same
//! [`Dsl`](crate::dsl::Dsl) code declarations use, so both paths produce
//! identical registry state. Handlers registered this way are
//! documentation-only.
//!
//! ## Format
//!
//! ```yaml
//! controllers:
//!   - name: Api::UsersController
//!     parent: Api::BaseController
//!     api_versions: [v1]
//!     short_description: Users
//!     methods:
//!       - name: show
//!         api:
//!           - { method: GET, path: "/users/:id" }
//!         desc: show a user
//!         params:
//!           - { name: id, type: integer, required: true }
//!           - name: filter
//!             params:
//!               - { name: status, one_of: [active, banned] }
//!         errors:
//!           - { code: 404, description: not found }
//! ```
//!
//! Controllers named as `parent` but not declared themselves are created
//! below the base controller. A rebuild declares the controllers of every
//! manifest before replaying any method, so a parent may live in a manifest
//! that sorts after its children.

use anyhow::{anyhow, Context};
use http::Method;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::registry::{Application, ControllerId};
use crate::validator::{ParamDescription, ParamOptions, ParamSet, ParamType, ParamValidator, Params};

/// One declaration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub controllers: Vec<ControllerManifest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ControllerManifest {
    /// Type name, e.g. `Api::V1::UsersController`
    pub name: String,
    pub parent: Option<String>,
    pub resource_id: Option<String>,
    pub api_versions: Vec<String>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub formats: Option<Vec<String>>,
    pub methods: Vec<MethodManifest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MethodManifest {
    pub name: String,
    pub api: Vec<EndpointManifest>,
    pub desc: Option<String>,
    pub params: Vec<ParamManifest>,
    pub errors: Vec<ErrorManifest>,
    pub examples: Vec<String>,
    pub see: Option<String>,
    pub formats: Option<Vec<String>>,
    pub api_versions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointManifest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorManifest {
    pub code: u16,
    #[serde(default)]
    pub description: String,
}

/// A param; the validator is the first of `params`, `one_of`, `pattern`,
/// `type` that is present, defaulting to any value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParamManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: Option<ParamType>,
    pub one_of: Option<Vec<Value>>,
    pub pattern: Option<String>,
    pub params: Vec<ParamManifest>,
    pub required: bool,
    pub allow_nil: bool,
    pub desc: String,
}

impl ParamManifest {
    fn options(&self) -> ParamOptions {
        ParamOptions {
            required: self.required,
            allow_nil: self.allow_nil,
            description: self.desc.clone(),
        }
    }

    /// Build the declared validator
    ///
    /// # Errors
    ///
    /// Fails on an invalid regular expression, here or in a nested param.
    pub fn validator(&self) -> anyhow::Result<ParamValidator> {
        if !self.params.is_empty() {
            let mut set = ParamSet::new();
            for nested in &self.params {
                set.insert(ParamDescription::new(
                    nested.name.clone(),
                    nested.validator()?,
                    nested.options(),
                ));
            }
            return Ok(ParamValidator::Nested(set));
        }
        if let Some(values) = &self.one_of {
            return Ok(ParamValidator::OneOf(values.clone()));
        }
        if let Some(pattern) = &self.pattern {
            return ParamValidator::pattern(pattern)
                .with_context(|| format!("invalid pattern for param '{}'", self.name));
        }
        Ok(ParamValidator::Type(self.param_type.unwrap_or(ParamType::Any)))
    }
}

fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

/// Manifest files below `dir`, in sorted order
///
/// # Errors
///
/// Fails if the directory cannot be walked.
pub fn discover_manifests(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to scan {}", dir.display()))?;
        if entry.file_type().is_file() && is_manifest(entry.path()) {
            found.push(entry.into_path());
        }
    }
    debug!(dir = %dir.display(), manifests = found.len(), "declaration manifests discovered");
    Ok(found)
}

/// Parse one manifest, YAML or JSON by extension
///
/// # Errors
///
/// Fails if the file cannot be read or does not parse.
pub fn load_manifest(path: &Path) -> anyhow::Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let manifest = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?,
        _ if content.trim().is_empty() => Manifest::default(),
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?,
    };
    Ok(manifest)
}

fn parse_method(method: &str) -> anyhow::Result<Method> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| anyhow!("invalid HTTP method '{}'", method))
}

impl ControllerManifest {
    fn has_resource_docs(&self) -> bool {
        self.short_description.is_some()
            || self.full_description.is_some()
            || self.formats.is_some()
    }
}

/// Declare the controllers of `manifest` with their parent links, versions
/// and resource ids, without documenting anything
///
/// Running this for every manifest before any is applied makes version
/// inheritance independent of manifest order. Returns the controller ids
/// in manifest order.
pub fn declare_controllers(app: &mut Application, manifest: &Manifest) -> Vec<ControllerId> {
    let mut ids = Vec::with_capacity(manifest.controllers.len());
    for controller in &manifest.controllers {
        let parent = match &controller.parent {
            Some(parent) => app
                .controllers()
                .lookup(parent)
                .unwrap_or_else(|| app.declare_controller(parent, ControllerId::BASE)),
            None => ControllerId::BASE,
        };
        let id = app.declare_controller(&controller.name, parent);
        ids.push(id);

        if app.config().is_ignored(&controller.name, None) {
            continue;
        }
        if !controller.api_versions.is_empty() {
            app.set_controller_versions(id, controller.api_versions.iter().cloned());
        }
        if let Some(resource_id) = &controller.resource_id {
            app.set_resource_id(id, resource_id.clone());
        }
    }
    ids
}

/// Replay a manifest's declarations into `app`
///
/// Controllers are declared first (see [`declare_controllers`]). A
/// resource is only created for controllers that carry resource
/// documentation (short or full description, formats), so a parent
/// listed just to be inherited from documents nothing. Returns the number of methods documented.
///
/// # Errors
///
/// Fails on invalid HTTP methods or patterns, and on registration errors.
pub fn apply_manifest(app: &mut Application, manifest: &Manifest) -> anyhow::Result<usize> {
    let ids = declare_controllers(app, manifest);
    let mut documented = 0;
    for (controller, id) in manifest.controllers.iter().zip(ids) {
        let mut dsl = app.dsl(id);
        if controller.has_resource_docs() {
            dsl.resource(|r| {
                if let Some(text) = &controller.short_description {
                    r.short(text.clone());
                }
                if let Some(text) = &controller.full_description {
                    r.full_description(text.clone());
                }
                if let Some(formats) = &controller.formats {
                    r.formats(formats.iter().cloned());
                }
            })
            .with_context(|| format!("controller {}", controller.name))?;
        }

        for method in &controller.methods {
            for endpoint in &method.api {
                dsl.api(
                    parse_method(&endpoint.method)?,
                    endpoint.path.clone(),
                    endpoint.description.clone(),
                );
            }
            if let Some(desc) = &method.desc {
                dsl.desc(desc.clone())?;
            }
            for param in &method.params {
                dsl.param(param.name.clone(), param.validator()?, param.options());
            }
            for error in &method.errors {
                dsl.error(error.code, error.description.clone());
            }
            for example in &method.examples {
                dsl.example(example);
            }
            if let Some(see) = &method.see {
                dsl.see(see.clone());
            }
            if let Some(formats) = &method.formats {
                dsl.formats(formats.iter().cloned());
            }
            if !method.api_versions.is_empty() {
                dsl.api_versions(method.api_versions.iter().cloned());
            }
            let handler = dsl
                .define(&method.name, |_: &Params| ())
                .with_context(|| format!("method {}#{}", controller.name, method.name))?;
            if handler.description().is_some() {
                documented += 1;
            }
        }
    }
    Ok(documented)
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: &str = r#"
controllers:
  - name: Api::BaseController
    api_versions: [v1]
  - name: Api::UsersController
    parent: Api::BaseController
    short_description: Users
    methods:
      - name: show
        api:
          - { method: get, path: "/users/:id" }
        desc: show a user
        params:
          - { name: id, type: integer, required: true }
          - name: filter
            params:
              - { name: status, one_of: [active, banned] }
              - { name: email, pattern: "^.+@.+$" }
        errors:
          - { code: 404, description: not found }
      - name: helper
"#;

    #[test]
    fn test_apply_yaml_manifest() {
        let manifest: Manifest = serde_yaml::from_str(USERS).unwrap();
        let mut app = Application::default();
        assert_eq!(apply_manifest(&mut app, &manifest).unwrap(), 1);

        let show = app.get_method_description("v1#users#show").unwrap().unwrap();
        assert_eq!(show.endpoints[0].http_method, Method::GET);
        assert_eq!(show.description.as_deref(), Some("show a user"));
        let filter = show.params.get("filter").unwrap();
        let nested = filter.validator.nested_params().unwrap();
        assert_eq!(nested.names().collect::<Vec<_>>(), vec!["status", "email"]);
        assert_eq!(show.errors[0].code, 404);
        assert!(app.get_method_description("v1#users#helper").unwrap().is_none());

        let resource = app.get_resource_description("v1#users").unwrap().unwrap();
        assert_eq!(resource.short_description.as_deref(), Some("Users"));
    }

    #[test]
    fn test_parent_only_controller_adds_no_version() {
        let manifest: Manifest = serde_yaml::from_str(
            r#"
controllers:
  - name: Api::BaseController
  - name: Api::UsersController
    parent: Api::BaseController
    api_versions: [v1]
    methods:
      - name: index
        api: [{ method: GET, path: "/users" }]
"#,
        )
        .unwrap();
        let mut app = Application::default();
        assert_eq!(apply_manifest(&mut app, &manifest).unwrap(), 1);
        assert_eq!(app.available_versions(), vec!["v1"]);
        assert_eq!(app.resource_count(), 1);
    }

    #[test]
    fn test_versions_and_resource_id_without_resource_docs() {
        let manifest: Manifest = serde_yaml::from_str(
            r#"
controllers:
  - name: Api::BaseController
    api_versions: [v2]
    resource_id: base
  - name: Api::UsersController
    parent: Api::BaseController
"#,
        )
        .unwrap();
        let mut app = Application::default();
        apply_manifest(&mut app, &manifest).unwrap();
        assert!(app.available_versions().is_empty());
        let users = app.controllers().lookup("Api::UsersController").unwrap();
        assert_eq!(app.controller_versions(users), vec!["v2"]);
    }

    #[test]
    fn test_invalid_method_and_pattern() {
        let bad_verb: Manifest = serde_yaml::from_str(
            "controllers:\n  - name: AController\n    methods:\n      - name: x\n        api: [{ method: 'GE T', path: / }]\n",
        )
        .unwrap();
        assert!(apply_manifest(&mut Application::default(), &bad_verb).is_err());

        let param = ParamManifest {
            name: "p".to_string(),
            pattern: Some("(".to_string()),
            ..ParamManifest::default()
        };
        assert!(param.validator().is_err());
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.yaml"), "").unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("nested/c.yml"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let found = discover_manifests(dir.path()).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.yaml", "nested/c.yml"]);
        assert!(load_manifest(&found[0]).unwrap().controllers.is_empty());
        assert!(load_manifest(&found[1]).unwrap().controllers.is_empty());
    }
}
