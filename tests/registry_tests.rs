#![allow(clippy::unwrap_used, clippy::expect_used)]

use brrtdoc::error::{ParamError, RegistryError};
use brrtdoc::registry::{Application, ControllerId};
use brrtdoc::validator::{ParamOptions, ParamType, ParamValidator, Params};
use brrtdoc::DocsConfig;
use http::Method;
use serde_json::json;

fn params(value: serde_json::Value) -> Params {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_show_user_end_to_end() {
    let mut app = Application::default();
    let users = app.declare_controller("UsersController", ControllerId::BASE);
    app.set_controller_versions(users, ["v1"]);

    let mut dsl = app.dsl(users);
    dsl.api(Method::GET, "/users/:id", "")
        .desc("show a user")
        .unwrap()
        .param("id", ParamType::Integer, ParamOptions::required());
    let show = dsl
        .define("show", |p: &Params| format!("user {}", p["id"]))
        .unwrap();
    drop(dsl);

    let method = app
        .get_method_description("v1#users#show")
        .unwrap()
        .expect("show is documented");
    assert_eq!(method.endpoints.len(), 1);
    assert_eq!(method.endpoints[0].http_method, Method::GET);
    assert_eq!(method.endpoints[0].path, "/users/:id");
    assert_eq!(method.description.as_deref(), Some("show a user"));
    assert_eq!(method.params.len(), 1);
    let id = method.params.get("id").unwrap();
    assert!(id.required);
    assert!(matches!(id.validator, ParamValidator::Type(ParamType::Integer)));

    let missing = show.call(&Params::new()).unwrap_err();
    assert!(matches!(missing, ParamError::Missing { ref param } if param == "id"));
    assert_eq!(missing.status_code(), 400);

    let mismatch = show.call(&params(json!({"id": "abc"}))).unwrap_err();
    assert!(matches!(mismatch, ParamError::TypeMismatch { .. }));

    assert_eq!(show.call(&params(json!({"id": 5}))).unwrap(), "user 5");
}

#[test]
fn test_reset_forgets_everything() {
    let mut app = Application::default();
    let users = app.declare_controller("UsersController", ControllerId::BASE);
    app.set_controller_versions(users, ["v1", "v2"]);
    app.set_resource_id(users, "people");
    {
        let mut dsl = app.dsl(users);
        dsl.api(Method::GET, "/people", "");
        dsl.define("index", |_| ()).unwrap();
    }
    assert_eq!(app.available_versions(), vec!["v1", "v2"]);

    app.reset();
    assert!(app.available_versions().is_empty());
    assert!(app.get_method_description("v1#people#index").unwrap().is_none());
    assert!(app.get_resource_description("v1#people").unwrap().is_none());
    assert_eq!(app.controller_versions(users), vec!["1.0"]);

    // The resource id override is gone too
    let mut dsl = app.dsl(users);
    dsl.api(Method::GET, "/users", "");
    dsl.define("index", |_| ()).unwrap();
    drop(dsl);
    assert!(app.get_method_description("users#index").unwrap().is_some());
}

#[test]
fn test_redefinition_keeps_only_second_declaration() {
    let mut app = Application::default();
    let users = app.declare_controller("UsersController", ControllerId::BASE);
    let mut dsl = app.dsl(users);

    dsl.api(Method::GET, "/users/:id", "first route")
        .desc("first")
        .unwrap()
        .param("id", ParamType::Integer, ParamOptions::required())
        .error(404, "not found")
        .example("GET /users/1")
        .see("users#index")
        .formats(["json"]);
    dsl.define("show", |_| ()).unwrap();

    dsl.api(Method::POST, "/users/:id/show", "second route")
        .param("verbose", ParamType::Boolean, ParamOptions::optional());
    dsl.define("show", |_| ()).unwrap();
    drop(dsl);

    let method = app.get_method_description("users#show").unwrap().unwrap();
    assert_eq!(method.endpoints.len(), 1);
    assert_eq!(method.endpoints[0].description, "second route");
    assert_eq!(method.description, None);
    assert_eq!(method.params.names().collect::<Vec<_>>(), vec!["verbose"]);
    assert!(method.errors.is_empty());
    assert!(method.examples.is_empty());
    assert!(method.see.is_none());
    assert!(method.formats.is_none());
}

#[test]
fn test_versions_inherited_from_nearest_ancestor() {
    let mut app = Application::default();
    let application = app.declare_controller("ApplicationController", ControllerId::BASE);
    let api = app.declare_controller("Api::BaseController", application);
    let users = app.declare_controller("Api::UsersController", api);
    let posts = app.declare_controller("Api::V3::PostsController", api);

    assert_eq!(app.controller_versions(users), vec!["1.0"]);

    app.set_controller_versions(api, ["v1", "v2"]);
    app.set_controller_versions(posts, ["v3"]);
    assert_eq!(app.controller_versions(users), vec!["v1", "v2"]);
    assert_eq!(app.controller_versions(posts), vec!["v3"]);
    assert_eq!(app.controller_versions(application), vec!["1.0"]);

    let mut dsl = app.dsl(users);
    dsl.api(Method::GET, "/users", "");
    let index = dsl.define("index", |_| ()).unwrap();
    assert_eq!(index.description().unwrap().version, "v1");
    drop(dsl);
    assert!(app.get_method_description("v2#users#index").unwrap().is_some());
    assert!(app.resource_for_controller(users, "v3").is_none());
}

#[test]
fn test_default_version_from_config() {
    let config = DocsConfig {
        default_version: "2024-01".to_string(),
        ..DocsConfig::default()
    };
    let mut app = Application::new(config);
    let users = app.declare_controller("UsersController", ControllerId::BASE);
    let mut dsl = app.dsl(users);
    dsl.api(Method::GET, "/users", "");
    dsl.define("index", |_| ()).unwrap();
    drop(dsl);
    assert_eq!(app.available_versions(), vec!["2024-01"]);
    // Keys without a version use the default version
    assert!(app.get_method_description("users#index").unwrap().is_some());
}

#[test]
fn test_duplicate_description_is_immediate() {
    let mut app = Application::default();
    let users = app.declare_controller("UsersController", ControllerId::BASE);
    let mut dsl = app.dsl(users);
    dsl.desc("one").unwrap();
    let err = dsl.desc("two").unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateDeclaration { .. }));
    assert!(err.to_string().contains("one"));
}

#[test]
fn test_configuration_error_for_base_controller() {
    let mut app = Application::default();
    let mut dsl = app.dsl(ControllerId::BASE);
    dsl.api(Method::GET, "/", "").desc("root").unwrap();
    let err = dsl.define("index", |_| ()).unwrap_err();
    assert!(matches!(err, RegistryError::Configuration { ref controller, .. } if controller == "Base"));
    drop(dsl);
    assert!(app.available_versions().is_empty());
}

#[test]
fn test_ignored_controller_is_not_documented() {
    let config = DocsConfig {
        ignored: vec!["HealthController".to_string()],
        ..DocsConfig::default()
    };
    let mut app = Application::new(config);
    let health = app.declare_controller("HealthController", ControllerId::BASE);
    let mut dsl = app.dsl(health);
    dsl.api(Method::GET, "/health", "").desc("liveness").unwrap();
    let check = dsl.define("check", |_| "ok").unwrap();
    drop(dsl);
    assert!(check.description().is_none());
    assert_eq!(check.call(&Params::new()).unwrap(), "ok");
    assert_eq!(app.method_count(), 0);
}

#[test]
fn test_ignored_controller_declares_no_resource() {
    let config = DocsConfig {
        ignored: vec!["HealthController".to_string()],
        ..DocsConfig::default()
    };
    let mut app = Application::new(config);
    let health = app.declare_controller("HealthController", ControllerId::BASE);
    let mut dsl = app.dsl(health);
    dsl.resource(|r| {
        r.short("health").api_versions(["v9"]);
    })
    .unwrap();
    dsl.api(Method::GET, "/health", "");
    dsl.define("check", |_| "ok").unwrap();
    drop(dsl);

    assert!(app.available_versions().is_empty());
    assert!(app.get_resource_description("v9#health").unwrap().is_none());
}

#[test]
fn test_malformed_and_unknown_keys() {
    let app = Application::default();
    assert!(matches!(
        app.get_method_description("v1##show"),
        Err(RegistryError::MalformedKey { .. })
    ));
    assert!(app.get_method_description("v1#a#b#c").is_err());
    assert!(app.get_method_description("v1#users#show").unwrap().is_none());
    assert!(app.get_resource_description("v1#users").unwrap().is_none());
}
