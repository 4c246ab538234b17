//! Shorthand lookup keys.
//!
//! Resources and methods can be addressed with `#`-separated strings:
//!
//! | key              | meaning                                   |
//! |------------------|-------------------------------------------|
//! | `users`          | resource `users` in the default version   |
//! | `v2#users`       | resource `users` in version `v2`          |
//! | `users#show`     | method `show` of `users`, default version |
//! | `v2#users#show`  | method `show` of `users` in version `v2`  |
//!
//! A key with the wrong shape is an error; a well-formed key that names
//! nothing is simply absent at lookup time.

use std::fmt;

use crate::error::RegistryError;

/// Address of a resource; `version` is `None` for "the default version"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub version: Option<String>,
    pub resource: String,
}

/// Address of a method; `version` is `None` for "the default version"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub version: Option<String>,
    pub resource: String,
    pub method: String,
}

fn split_key(key: &str) -> Result<Vec<&str>, RegistryError> {
    let crumbs: Vec<&str> = key.split('#').collect();
    if crumbs.iter().any(|c| c.trim().is_empty()) {
        return Err(RegistryError::MalformedKey {
            key: key.to_string(),
            reason: "empty segment",
        });
    }
    Ok(crumbs)
}

impl ResourceKey {
    /// Parse `resource` or `version#resource`
    ///
    /// # Errors
    ///
    /// [`RegistryError::MalformedKey`] for empty segments or more than two
    /// segments.
    pub fn parse(key: &str) -> Result<Self, RegistryError> {
        match split_key(key)?.as_slice() {
            [resource] => Ok(Self {
                version: None,
                resource: resource.to_string(),
            }),
            [version, resource] => Ok(Self {
                version: Some(version.to_string()),
                resource: resource.to_string(),
            }),
            _ => Err(RegistryError::MalformedKey {
                key: key.to_string(),
                reason: "expected 'resource' or 'version#resource'",
            }),
        }
    }
}

impl MethodKey {
    /// Parse `resource#method` or `version#resource#method`
    ///
    /// # Errors
    ///
    /// [`RegistryError::MalformedKey`] for empty segments or a segment count
    /// other than two or three.
    pub fn parse(key: &str) -> Result<Self, RegistryError> {
        match split_key(key)?.as_slice() {
            [resource, method] => Ok(Self {
                version: None,
                resource: resource.to_string(),
                method: method.to_string(),
            }),
            [version, resource, method] => Ok(Self {
                version: Some(version.to_string()),
                resource: resource.to_string(),
                method: method.to_string(),
            }),
            _ => Err(RegistryError::MalformedKey {
                key: key.to_string(),
                reason: "expected 'resource#method' or 'version#resource#method'",
            }),
        }
    }

    #[must_use]
    pub fn resource_key(&self) -> ResourceKey {
        ResourceKey {
            version: self.version.clone(),
            resource: self.resource.clone(),
        }
    }
}

impl std::str::FromStr for ResourceKey {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::str::FromStr for MethodKey {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}#{}", v, self.resource),
            None => write!(f, "{}", self.resource),
        }
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}#{}#{}", v, self.resource, self.method),
            None => write!(f, "{}#{}", self.resource, self.method),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_keys() {
        let key: MethodKey = "v2#users#create".parse().unwrap();
        assert_eq!(key.version.as_deref(), Some("v2"));
        assert_eq!(key.resource, "users");
        assert_eq!(key.method, "create");

        let key = MethodKey::parse("users#create").unwrap();
        assert_eq!(key.version, None);
        assert_eq!(key.to_string(), "users#create");
    }

    #[test]
    fn test_parse_resource_keys() {
        assert_eq!(ResourceKey::parse("users").unwrap().version, None);
        let key = ResourceKey::parse("v1#users").unwrap();
        assert_eq!(key.to_string(), "v1#users");
    }

    #[test]
    fn test_malformed_keys() {
        assert!(MethodKey::parse("users").is_err());
        assert!(MethodKey::parse("a#b#c#d").is_err());
        assert!(MethodKey::parse("v1##show").is_err());
        assert!(ResourceKey::parse("").is_err());
        assert!(ResourceKey::parse("v1#users#show").is_err());
    }
}
