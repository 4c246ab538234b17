use std::collections::HashMap;
use std::fmt;

/// Handle identifying one controller (handler group)
///
/// Produced once per controller by [`Controllers::declare`] and used as the
/// key for resource-id overrides and declared versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u32);

impl ControllerId {
    /// The sentinel base controller every hierarchy is rooted in
    pub const BASE: ControllerId = ControllerId(0);

    #[must_use]
    pub fn is_base(self) -> bool {
        self == Self::BASE
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct ControllerEntry {
    type_name: String,
    controller_name: Option<String>,
    parent: Option<ControllerId>,
}

/// Arena of declared controllers with explicit parent links
#[derive(Debug, Clone)]
pub struct Controllers {
    entries: Vec<ControllerEntry>,
    by_type_name: HashMap<String, ControllerId>,
}

pub(crate) const BASE_TYPE_NAME: &str = "Base";

impl Default for Controllers {
    fn default() -> Self {
        Self::new()
    }
}

impl Controllers {
    #[must_use]
    pub fn new() -> Self {
        let mut by_type_name = HashMap::new();
        by_type_name.insert(BASE_TYPE_NAME.to_string(), ControllerId::BASE);
        Self {
            entries: vec![ControllerEntry {
                type_name: BASE_TYPE_NAME.to_string(),
                controller_name: None,
                parent: None,
            }],
            by_type_name,
        }
    }

    /// Declare a controller below `parent`
    ///
    /// Declaring a type name again returns the existing handle and updates
    /// its parent link, so replaying discovery after a reset is harmless.
    /// Re-parenting that would introduce a cycle is ignored.
    pub fn declare(&mut self, type_name: &str, parent: ControllerId) -> ControllerId {
        let parent = if self.contains(parent) { parent } else { ControllerId::BASE };
        if let Some(&id) = self.by_type_name.get(type_name) {
            if !id.is_base() && !self.ancestors(parent).any(|a| a == id) {
                self.entries[id.index()].parent = Some(parent);
            }
            return id;
        }
        let id = ControllerId(self.entries.len() as u32);
        self.entries.push(ControllerEntry {
            type_name: type_name.to_string(),
            controller_name: Some(controller_name(type_name)),
            parent: Some(parent),
        });
        self.by_type_name.insert(type_name.to_string(), id);
        id
    }

    #[must_use]
    pub fn contains(&self, id: ControllerId) -> bool {
        id.index() < self.entries.len()
    }

    #[must_use]
    pub fn lookup(&self, type_name: &str) -> Option<ControllerId> {
        self.by_type_name.get(type_name).copied()
    }

    /// Type name as declared, e.g. `Api::V1::UsersController`
    #[must_use]
    pub fn type_name(&self, id: ControllerId) -> &str {
        self.entries
            .get(id.index())
            .map(|e| e.type_name.as_str())
            .unwrap_or(BASE_TYPE_NAME)
    }

    /// Framework name derived from the type name; `None` for the base
    #[must_use]
    pub fn controller_name(&self, id: ControllerId) -> Option<&str> {
        self.entries
            .get(id.index())
            .and_then(|e| e.controller_name.as_deref())
    }

    #[must_use]
    pub fn parent(&self, id: ControllerId) -> Option<ControllerId> {
        self.entries.get(id.index()).and_then(|e| e.parent)
    }

    /// `id` followed by its ancestors up to and including the base
    ///
    /// The walk is bounded by the number of declared controllers.
    pub fn ancestors(&self, id: ControllerId) -> impl Iterator<Item = ControllerId> + '_ {
        let mut next = if self.contains(id) { Some(id) } else { None };
        let mut remaining = self.entries.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let current = next?;
            next = self.parent(current);
            Some(current)
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}

/// Framework name of a controller type
///
/// `Api::V2::UserProfilesController` becomes `user_profiles`.
#[must_use]
pub fn controller_name(type_name: &str) -> String {
    let base = type_name.rsplit("::").next().unwrap_or(type_name);
    let base = base.strip_suffix("Controller").unwrap_or(base);
    let mut out = String::with_capacity(base.len() + 4);
    let chars: Vec<char> = base.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).map(|n| n.is_lowercase()).unwrap_or(false);
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if i > 0 && (prev_lower || (prev_upper && next_lower)) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(*c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_name_derivation() {
        assert_eq!(controller_name("UsersController"), "users");
        assert_eq!(controller_name("Api::V2::UserProfilesController"), "user_profiles");
        assert_eq!(controller_name("HTTPLogsController"), "http_logs");
        assert_eq!(controller_name("posts"), "posts");
    }

    #[test]
    fn test_declare_is_idempotent() {
        let mut controllers = Controllers::new();
        let app = controllers.declare("ApplicationController", ControllerId::BASE);
        let users = controllers.declare("UsersController", app);
        assert_eq!(controllers.declare("UsersController", app), users);
        assert_eq!(controllers.len(), 3);
        assert_eq!(controllers.controller_name(users), Some("users"));
        assert_eq!(controllers.controller_name(ControllerId::BASE), None);
    }

    #[test]
    fn test_ancestors_walk_to_base() {
        let mut controllers = Controllers::new();
        let app = controllers.declare("ApplicationController", ControllerId::BASE);
        let api = controllers.declare("Api::BaseController", app);
        let users = controllers.declare("Api::UsersController", api);
        let chain: Vec<ControllerId> = controllers.ancestors(users).collect();
        assert_eq!(chain, vec![users, api, app, ControllerId::BASE]);
    }

    #[test]
    fn test_reparent_cycle_is_ignored() {
        let mut controllers = Controllers::new();
        let a = controllers.declare("AController", ControllerId::BASE);
        let b = controllers.declare("BController", a);
        controllers.declare("AController", b);
        assert_eq!(controllers.parent(a), Some(ControllerId::BASE));
        assert_eq!(controllers.ancestors(b).count(), 3);
    }
}
