use anyhow::anyhow;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use super::controller::{ControllerId, Controllers};
use super::key::{MethodKey, ResourceKey};
use crate::config::DocsConfig;
use crate::description::{MethodDescription, ResourceDescription};
use crate::docs::{self, DocTree};
use crate::dsl::{Dsl, StagedMethod, StagingBuffer};
use crate::error::RegistryError;
use crate::examples::{RecordedExample, RecordedExamples};

/// Registry shared between a rebuild driver and concurrent readers
///
/// Reset and repopulation happen under one write lock, so a reader never
/// sees a half-rebuilt registry.
pub type SharedApplication = Arc<RwLock<Application>>;

/// Versioned store of resource and method documentation
///
/// Holds, per API version, the resources keyed by name, plus the per
/// controller overrides (resource id, declared versions) that decide where
/// a committed method lands. Declarations reach it through [`Dsl`].
#[derive(Debug)]
pub struct Application {
    config: DocsConfig,
    controllers: Controllers,
    resources: BTreeMap<String, BTreeMap<String, ResourceDescription>>,
    controller_resource_id: HashMap<ControllerId, String>,
    controller_versions: HashMap<ControllerId, Vec<String>>,
    examples: RecordedExamples,
    pub(crate) staging: StagingBuffer,
}

impl Default for Application {
    fn default() -> Self {
        Self::new(DocsConfig::default())
    }
}

impl Application {
    #[must_use]
    pub fn new(config: DocsConfig) -> Self {
        let examples = RecordedExamples::new(config.examples_file.clone());
        Self {
            config,
            controllers: Controllers::new(),
            resources: BTreeMap::new(),
            controller_resource_id: HashMap::new(),
            controller_versions: HashMap::new(),
            examples,
            staging: StagingBuffer::new(),
        }
    }

    /// Wrap into a [`SharedApplication`]
    #[must_use]
    pub fn into_shared(self) -> SharedApplication {
        Arc::new(RwLock::new(self))
    }

    #[must_use]
    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    #[must_use]
    pub fn controllers(&self) -> &Controllers {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut Controllers {
        &mut self.controllers
    }

    /// Declare a controller type below `parent` (see [`Controllers::declare`])
    pub fn declare_controller(&mut self, type_name: &str, parent: ControllerId) -> ControllerId {
        self.controllers.declare(type_name, parent)
    }

    /// Start a declaration phase for one controller
    pub fn dsl(&mut self, controller: ControllerId) -> Dsl<'_> {
        Dsl::new(self, controller)
    }

    /// Forget every registration
    ///
    /// Resources, resource-id overrides, declared versions and anything
    /// staged are cleared together. Controller handles stay valid so that
    /// discovery can be replayed.
    pub fn reset(&mut self) {
        let resources = self.resource_count();
        self.resources.clear();
        self.controller_resource_id.clear();
        self.controller_versions.clear();
        self.staging.snapshot_and_clear();
        info!(resources_dropped = resources, "documentation registry reset");
    }

    /// Alias of [`Application::reset`]
    pub fn init(&mut self) {
        self.reset();
    }

    /// Versions that have at least one resource, sorted
    #[must_use]
    pub fn available_versions(&self) -> Vec<String> {
        self.resources.keys().cloned().collect()
    }

    pub fn set_resource_id(&mut self, controller: ControllerId, resource_id: impl Into<String>) {
        self.controller_resource_id
            .insert(controller, resource_id.into());
    }

    /// Record the versions declared for a controller
    ///
    /// Duplicates are dropped keeping first occurrence. An empty list means
    /// "inherit from the parent controller".
    pub fn set_controller_versions<I, S>(&mut self, controller: ControllerId, versions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for version in versions.into_iter().map(Into::into) {
            if !unique.contains(&version) {
                unique.push(version);
            }
        }
        self.controller_versions.insert(controller, unique);
    }

    /// Versions a controller documents into
    ///
    /// The nearest controller in the ancestor chain with a non-empty
    /// declaration wins; the base controller answers the default version.
    #[must_use]
    pub fn controller_versions(&self, controller: ControllerId) -> Vec<String> {
        for ancestor in self.controllers.ancestors(controller) {
            if ancestor.is_base() {
                break;
            }
            if let Some(versions) = self.controller_versions.get(&ancestor) {
                if !versions.is_empty() {
                    return versions.clone();
                }
            }
        }
        vec![self.config.default_version.clone()]
    }

    /// Resource name of a controller: its override, else its derived name
    ///
    /// # Errors
    ///
    /// [`RegistryError::Configuration`] for the base controller, or for a
    /// handle this registry never issued.
    pub fn resource_name(&self, controller: ControllerId) -> Result<String, RegistryError> {
        if let Some(id) = self.controller_resource_id.get(&controller) {
            return Ok(id.clone());
        }
        self.controllers
            .controller_name(controller)
            .map(str::to_string)
            .ok_or_else(|| RegistryError::Configuration {
                controller: self.controllers.type_name(controller).to_string(),
                reason: "controller has no resource name".to_string(),
            })
    }

    /// Resource of `controller` in `version`, created on first use
    ///
    /// Ignore rules are not consulted here; [`Dsl::resource`] applies them.
    ///
    /// # Errors
    ///
    /// See [`Application::resource_name`].
    pub fn define_resource(
        &mut self,
        controller: ControllerId,
        version: &str,
    ) -> Result<&mut ResourceDescription, RegistryError> {
        let name = self.resource_name(controller)?;
        let by_name = self.resources.entry(version.to_string()).or_default();
        let resource = by_name.entry(name.clone()).or_insert_with(|| {
            debug!(resource = %name, version = %version, "resource created");
            ResourceDescription::new(controller, name.clone(), version)
        });
        Ok(resource)
    }

    /// Commit a staged method into every version it belongs to
    ///
    /// The versions are the staged `api_versions` if any, else the
    /// controller's resolved versions. An existing description of the same
    /// method is replaced wholesale. Returns the description committed into
    /// the first version. Ignore rules and `active_dsl` are checked by
    /// [`Dsl::define`] before this runs.
    ///
    /// # Errors
    ///
    /// See [`Application::resource_name`]. Nothing is committed on error.
    pub(crate) fn define_method_description(
        &mut self,
        controller: ControllerId,
        method: &str,
        staged: StagedMethod,
    ) -> Result<Arc<MethodDescription>, RegistryError> {
        let resource_name = self.resource_name(controller)?;
        let versions = if staged.api_versions.is_empty() {
            self.controller_versions(controller)
        } else {
            staged.api_versions.clone()
        };

        let mut first: Option<Arc<MethodDescription>> = None;
        for version in &versions {
            let description = Arc::new(MethodDescription::from_staged(
                method,
                resource_name.clone(),
                version.clone(),
                staged.clone(),
            ));
            let resource = self.define_resource(controller, version)?;
            if resource.add_method(Arc::clone(&description)).is_some() {
                warn!(
                    resource = %resource_name,
                    version = %version,
                    method = %method,
                    "Replaced existing method description"
                );
            } else {
                debug!(
                    resource = %resource_name,
                    version = %version,
                    method = %method,
                    endpoints = description.endpoints.len(),
                    params = description.params.len(),
                    "method description committed"
                );
            }
            first.get_or_insert(description);
        }

        first.ok_or_else(|| RegistryError::Configuration {
            controller: self.controllers.type_name(controller).to_string(),
            reason: "no version to document into".to_string(),
        })
    }

    /// Remove a method of `controller` from the given versions
    ///
    /// Returns how many descriptions were removed. Versions or resources
    /// that do not exist are skipped.
    pub fn remove_method_description(
        &mut self,
        controller: ControllerId,
        versions: &[String],
        method: &str,
    ) -> usize {
        let Ok(name) = self.resource_name(controller) else {
            return 0;
        };
        let mut removed = 0;
        for version in versions {
            if let Some(resource) = self.resources.get_mut(version).and_then(|r| r.get_mut(&name)) {
                if resource.remove_method(method).is_some() {
                    debug!(resource = %name, version = %version, method = %method, "method description removed");
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Look a method up by `resource#method` or `version#resource#method`
    ///
    /// # Errors
    ///
    /// [`RegistryError::MalformedKey`] if the key has the wrong shape. A
    /// well-formed key naming nothing yields `Ok(None)`.
    pub fn get_method_description(
        &self,
        key: &str,
    ) -> Result<Option<Arc<MethodDescription>>, RegistryError> {
        let key = MethodKey::parse(key)?;
        let version = key.version.as_deref().unwrap_or(&self.config.default_version);
        Ok(self
            .resource(version, &key.resource)
            .and_then(|r| r.method(&key.method))
            .cloned())
    }

    /// Look a resource up by `resource` or `version#resource`
    ///
    /// # Errors
    ///
    /// [`RegistryError::MalformedKey`] if the key has the wrong shape.
    pub fn get_resource_description(
        &self,
        key: &str,
    ) -> Result<Option<&ResourceDescription>, RegistryError> {
        let key = ResourceKey::parse(key)?;
        let version = key.version.as_deref().unwrap_or(&self.config.default_version);
        Ok(self.resource(version, &key.resource))
    }

    #[must_use]
    pub fn resource(&self, version: &str, name: &str) -> Option<&ResourceDescription> {
        self.resources.get(version).and_then(|r| r.get(name))
    }

    /// All resources of a version, ordered by name
    pub fn resources(&self, version: &str) -> impl Iterator<Item = &ResourceDescription> {
        self.resources.get(version).into_iter().flat_map(BTreeMap::values)
    }

    #[must_use]
    pub fn resource_for_controller(
        &self,
        controller: ControllerId,
        version: &str,
    ) -> Option<&ResourceDescription> {
        let name = self.resource_name(controller).ok()?;
        self.resource(version, &name)
    }

    #[must_use]
    pub fn method_for_controller(
        &self,
        controller: ControllerId,
        version: &str,
        method: &str,
    ) -> Option<Arc<MethodDescription>> {
        self.resource_for_controller(controller, version)
            .and_then(|r| r.method(method))
            .cloned()
    }

    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn method_count(&self) -> usize {
        self.resources
            .values()
            .flat_map(BTreeMap::values)
            .map(ResourceDescription::method_count)
            .sum()
    }

    /// Assemble the documentation tree of one version
    ///
    /// See [`docs::document_tree`].
    #[must_use]
    pub fn to_document_tree(
        &self,
        version: &str,
        resource: Option<&str>,
        method: Option<&str>,
    ) -> Option<DocTree> {
        docs::document_tree(self, version, resource, method)
    }

    /// Short content hash of the documentation of every version
    ///
    /// Identical declarations produce an identical checksum.
    #[must_use]
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        for version in self.available_versions() {
            hasher.update(version.as_bytes());
            if let Some(tree) = self.to_document_tree(&version, None, None) {
                match serde_json::to_vec(&tree) {
                    Ok(bytes) => hasher.update(&bytes),
                    Err(e) => warn!(version = %version, error = %e, "failed to serialize documentation for checksum"),
                }
            }
        }
        let digest = hasher.finalize();
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        hex[..16].to_string()
    }

    /// Recorded examples, loaded on first use
    ///
    /// # Errors
    ///
    /// Fails if the examples file exists but cannot be read or parsed.
    pub fn recorded_examples(&mut self) -> anyhow::Result<&HashMap<String, Vec<RecordedExample>>> {
        self.examples.get()
    }

    /// Discard the in-memory recorded examples
    pub fn reload_examples(&mut self) {
        self.examples.reload();
    }

    #[must_use]
    pub fn examples(&self) -> &RecordedExamples {
        &self.examples
    }

    /// Rebuild all documentation from declaration manifests
    ///
    /// Resets the registry, reloads recorded examples, declares the
    /// controllers of every manifest and then replays each manifest in
    /// order. A manifest that fails to load or apply is logged
    /// and skipped. Returns the number of manifests applied.
    pub fn reload_documentation(&mut self, manifests: &[PathBuf]) -> usize {
        self.reset();
        self.reload_examples();
        if let Err(e) = self.examples.get() {
            warn!(error = %e, "recorded examples unavailable");
        }

        let mut loaded = Vec::with_capacity(manifests.len());
        for path in manifests {
            match crate::discovery::load_manifest(path) {
                Ok(manifest) => loaded.push((path, manifest)),
                Err(e) => {
                    warn!(manifest = %path.display(), error = %e, "skipping declaration manifest");
                }
            }
        }
        for (_, manifest) in &loaded {
            crate::discovery::declare_controllers(self, manifest);
        }

        let mut applied = 0;
        for (path, manifest) in &loaded {
            match crate::discovery::apply_manifest(self, manifest) {
                Ok(methods) => {
                    applied += 1;
                    debug!(manifest = %path.display(), methods, "manifest applied");
                }
                Err(e) => {
                    warn!(manifest = %path.display(), error = %e, "skipping declaration manifest");
                }
            }
        }

        info!(
            manifests = applied,
            resources = self.resource_count(),
            methods = self.method_count(),
            versions = ?self.available_versions(),
            "documentation rebuilt"
        );
        applied
    }
}

/// [`Application::reload_documentation`] under the write lock of `shared`
///
/// # Errors
///
/// Fails only if the lock is poisoned.
pub fn rebuild_shared(shared: &SharedApplication, manifests: &[PathBuf]) -> anyhow::Result<usize> {
    let mut app = shared
        .write()
        .map_err(|_| anyhow!("documentation registry lock poisoned"))?;
    Ok(app.reload_documentation(manifests))
}
