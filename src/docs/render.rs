use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::DocsConfig;
use crate::description::{ErrorDescription, MethodDescription, ResourceDescription};
use crate::registry::{Application, MethodKey};
use crate::validator::{ParamDescription, ParamSet};

#[derive(Debug, Clone, Serialize)]
pub struct DocTree {
    pub docs: Docs,
}

#[derive(Debug, Clone, Serialize)]
pub struct Docs {
    pub name: String,
    pub info: Option<String>,
    pub copyright: Option<String>,
    pub doc_url: String,
    pub api_url: String,
    pub resources: Resources,
}

/// All resources of a version by name, or the single requested one
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Resources {
    All(BTreeMap<String, ResourceDoc>),
    Single(Vec<ResourceDoc>),
}

impl Resources {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Resources::All(map) => map.len(),
            Resources::Single(list) => list.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &ResourceDoc> + '_> {
        match self {
            Resources::All(map) => Box::new(map.values()),
            Resources::Single(list) => Box::new(list.iter()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceDoc {
    pub name: String,
    pub version: String,
    pub doc_url: String,
    pub api_url: String,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub formats: Vec<String>,
    pub methods: IndexMap<String, MethodDoc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodDoc {
    pub name: String,
    pub doc_url: String,
    pub description: Option<String>,
    pub endpoints: Vec<EndpointDoc>,
    pub params: Vec<ParamDoc>,
    pub errors: Vec<ErrorDescription>,
    pub examples: Vec<String>,
    pub formats: Vec<String>,
    pub see: Option<SeeDoc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointDoc {
    pub http_method: String,
    /// Path prefixed with the version's API base URL
    pub path: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamDoc {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub required: bool,
    pub allow_nil: bool,
    pub expected_type: String,
    pub validator: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamDoc>,
}

/// A `see` reference; `doc_url` is set when it names a known method
#[derive(Debug, Clone, Serialize)]
pub struct SeeDoc {
    pub reference: String,
    pub doc_url: Option<String>,
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn render_params(params: &ParamSet, parent: Option<&str>) -> Vec<ParamDoc> {
    params
        .iter()
        .map(|param| render_param(param, parent))
        .collect()
}

fn render_param(param: &ParamDescription, parent: Option<&str>) -> ParamDoc {
    let full_name = param.full_name(parent);
    let nested = param
        .validator
        .nested_params()
        .map(|set| render_params(set, Some(&full_name)))
        .unwrap_or_default();
    ParamDoc {
        name: param.name.clone(),
        description: param.description.clone(),
        required: param.required,
        allow_nil: param.allow_nil,
        expected_type: param.validator.expected_type().to_string(),
        validator: param.validator.describe(),
        params: nested,
        full_name,
    }
}

struct Renderer<'a> {
    app: &'a Application,
    config: &'a DocsConfig,
    version: &'a str,
}

impl<'a> Renderer<'a> {
    fn resource_url(&self, resource: &str) -> String {
        join_url(&self.config.doc_url(self.version), resource)
    }

    fn method_url(&self, resource: &str, method: &str) -> String {
        join_url(&self.resource_url(resource), method)
    }

    fn see(&self, reference: &str) -> SeeDoc {
        let doc_url = MethodKey::parse(reference).ok().and_then(|key| {
            let version = key.version.as_deref().unwrap_or(self.version);
            self.app
                .resource(version, &key.resource)
                .and_then(|r| r.method(&key.method))
                .map(|_| join_url(&join_url(&self.config.doc_url(version), &key.resource), &key.method))
        });
        SeeDoc {
            reference: reference.to_string(),
            doc_url,
        }
    }

    fn method(&self, resource: &ResourceDescription, method: &MethodDescription) -> MethodDoc {
        let api_url = self.config.api_base_url(self.version);
        let mut examples = method.examples.clone();
        examples.extend(self.app.examples().rendered_for(&resource.name, &method.name));
        MethodDoc {
            name: method.name.clone(),
            doc_url: self.method_url(&resource.name, &method.name),
            description: method.description.clone(),
            endpoints: method
                .endpoints
                .iter()
                .map(|e| EndpointDoc {
                    http_method: e.http_method.to_string(),
                    path: join_url(api_url, &e.path),
                    description: e.description.clone(),
                })
                .collect(),
            params: render_params(&method.params, None),
            errors: method.errors.clone(),
            examples,
            formats: method
                .formats
                .clone()
                .or_else(|| resource.formats.clone())
                .unwrap_or_default(),
            see: method.see.as_deref().map(|r| self.see(r)),
        }
    }

    fn resource(&self, resource: &ResourceDescription, only: Option<&MethodDescription>) -> ResourceDoc {
        let methods = match only {
            Some(m) => vec![m],
            None => resource.methods().map(|m| &**m).collect(),
        };
        ResourceDoc {
            name: resource.name.clone(),
            version: resource.version.clone(),
            doc_url: self.resource_url(&resource.name),
            api_url: self.config.api_base_url(self.version).to_string(),
            short_description: resource.short_description.clone(),
            full_description: resource.full_description.clone(),
            formats: resource.formats.clone().unwrap_or_default(),
            methods: methods
                .into_iter()
                .map(|m| (m.name.clone(), self.method(resource, m)))
                .collect(),
        }
    }
}

/// Assemble the documentation tree of `version`
///
/// Returns `None` when a requested resource, or a requested method of it,
/// does not exist. An unknown version without a resource filter yields an
/// empty tree. A method filter without a resource filter is ignored.
#[must_use]
pub fn document_tree(
    app: &Application,
    version: &str,
    resource: Option<&str>,
    method: Option<&str>,
) -> Option<DocTree> {
    let config = app.config();
    let renderer = Renderer {
        app,
        config,
        version,
    };

    let resources = match resource {
        Some(name) => {
            let found = app.resource(version, name)?;
            let only = match method {
                Some(m) => Some(&**found.method(m)?),
                None => None,
            };
            Resources::Single(vec![renderer.resource(found, only)])
        }
        None => Resources::All(
            app.resources(version)
                .filter(|r| r.has_methods())
                .map(|r| (r.name.clone(), renderer.resource(r, None)))
                .collect(),
        ),
    };

    Some(DocTree {
        docs: Docs {
            name: config.app_name.clone(),
            info: config.app_info(version).map(str::to_string),
            copyright: config.copyright.clone(),
            doc_url: config.doc_url(version),
            api_url: config.api_base_url(version).to_string(),
            resources,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ControllerId;
    use crate::validator::{ParamOptions, ParamType, ParamValidator};
    use http::Method;
    use serde_json::json;

    fn app_with_users() -> Application {
        let mut app = Application::default();
        let users = app.declare_controller("UsersController", ControllerId::BASE);
        let posts = app.declare_controller("PostsController", ControllerId::BASE);
        {
            let mut dsl = app.dsl(users);
            dsl.api(Method::GET, "/users/:id", "fetch")
                .desc("show a user")
                .unwrap()
                .param("id", ParamType::Integer, ParamOptions::required())
                .param(
                    "filter",
                    ParamValidator::nested(|f| {
                        f.param("name", ParamType::String, ParamOptions::optional());
                    }),
                    ParamOptions::optional(),
                )
                .see("users#index");
            dsl.define("show", |_| ()).unwrap();
            dsl.api(Method::GET, "/users", "").formats(["json"]);
            dsl.define("index", |_| ()).unwrap();
        }
        app.define_resource(posts, "1.0").unwrap();
        app
    }

    #[test]
    fn test_all_resources_skip_empty() {
        let app = app_with_users();
        let tree = app.to_document_tree("1.0", None, None).unwrap();
        assert_eq!(tree.docs.resources.len(), 1);
        let value = serde_json::to_value(&tree).unwrap();
        assert!(value["docs"]["resources"]["users"].is_object());
        assert!(value["docs"]["resources"].get("posts").is_none());
        assert_eq!(value["docs"]["name"], json!("Another API"));
        assert_eq!(value["docs"]["doc_url"], json!("/apidoc/1.0"));
    }

    #[test]
    fn test_single_resource_is_an_array() {
        let app = app_with_users();
        let tree = app.to_document_tree("1.0", Some("users"), Some("show")).unwrap();
        let value = serde_json::to_value(&tree).unwrap();
        let resources = value["docs"]["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 1);
        let show = &resources[0]["methods"]["show"];
        assert!(resources[0]["methods"].get("index").is_none());
        assert_eq!(show["endpoints"][0]["path"], json!("/api/users/:id"));
        assert_eq!(show["endpoints"][0]["http_method"], json!("GET"));
        assert_eq!(show["params"][1]["params"][0]["full_name"], json!("filter[name]"));
        assert_eq!(show["see"]["doc_url"], json!("/apidoc/1.0/users/index"));
        assert_eq!(show["doc_url"], json!("/apidoc/1.0/users/show"));
    }

    #[test]
    fn test_unknown_lookups() {
        let app = app_with_users();
        assert!(app.to_document_tree("1.0", Some("nope"), None).is_none());
        assert!(app.to_document_tree("1.0", Some("users"), Some("nope")).is_none());
        let empty = app.to_document_tree("v9", None, None).unwrap();
        assert!(empty.docs.resources.is_empty());
    }

    #[test]
    fn test_method_formats_fall_back_to_resource() {
        let app = app_with_users();
        let tree = app.to_document_tree("1.0", Some("users"), None).unwrap();
        let resource = tree.docs.resources.iter().next().unwrap();
        assert_eq!(resource.methods["index"].formats, vec!["json"]);
        assert!(resource.methods["show"].formats.is_empty());
    }
}
