use indexmap::IndexMap;
use std::sync::Arc;

use super::MethodDescription;
use crate::registry::ControllerId;

/// The methods of one controller, for one API version
#[derive(Debug, Clone)]
pub struct ResourceDescription {
    pub version: String,
    pub name: String,
    pub controller: ControllerId,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub formats: Option<Vec<String>>,
    methods: IndexMap<String, Arc<MethodDescription>>,
}

impl ResourceDescription {
    pub fn new(controller: ControllerId, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            name: name.into(),
            controller,
            short_description: None,
            full_description: None,
            formats: None,
            methods: IndexMap::new(),
        }
    }

    /// Store a method, returning the description it replaced
    ///
    /// A replaced method is dropped from its old position; the new one is
    /// appended, matching "remove then define" on redefinition.
    pub fn add_method(&mut self, method: Arc<MethodDescription>) -> Option<Arc<MethodDescription>> {
        let previous = self.methods.shift_remove(&method.name);
        self.methods.insert(method.name.clone(), method);
        previous
    }

    pub fn remove_method(&mut self, name: &str) -> Option<Arc<MethodDescription>> {
        self.methods.shift_remove(name)
    }

    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Arc<MethodDescription>> {
        self.methods.get(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Arc<MethodDescription>> {
        self.methods.values()
    }

    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn has_methods(&self) -> bool {
        !self.methods.is_empty()
    }
}
