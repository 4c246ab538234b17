//! Unit tests for CLI commands

use crate::cli::{build_application, run_cli, Cli, Commands};
use crate::config::DocsConfig;
use clap::Parser;

const USERS: &str = r#"
controllers:
  - name: UsersController
    api_versions: [v1]
    methods:
      - name: show
        api: [{ method: GET, path: "/users/:id" }]
        desc: show a user
        params:
          - { name: id, type: integer, required: true }
"#;

#[test]
fn test_export_command_with_flags() {
    let cli = Cli::try_parse_from([
        "brrtdoc",
        "export",
        "--declarations",
        "decls",
        "--version",
        "v2",
        "--resource",
        "users",
        "--method",
        "show",
        "-o",
        "out.json",
    ])
    .unwrap();

    match cli.command {
        Commands::Export {
            source,
            version,
            resource,
            method,
            output,
        } => {
            assert_eq!(source.declarations.unwrap().to_string_lossy(), "decls");
            assert!(source.config.is_none());
            assert_eq!(version.as_deref(), Some("v2"));
            assert_eq!(resource.as_deref(), Some("users"));
            assert_eq!(method.as_deref(), Some("show"));
            assert_eq!(output.unwrap().to_string_lossy(), "out.json");
        }
        _ => panic!("Expected Export command"),
    }
}

#[test]
fn test_method_requires_resource() {
    assert!(Cli::try_parse_from(["brrtdoc", "export", "-d", "decls", "--method", "show"]).is_err());
}

#[test]
fn test_lint_command_with_flags() {
    let cli = Cli::try_parse_from([
        "brrtdoc",
        "lint",
        "--declarations",
        "decls",
        "--config",
        "brrtdoc.yaml",
        "--fail-on-error",
    ])
    .unwrap();

    match cli.command {
        Commands::Lint {
            source,
            fail_on_error,
        } => {
            assert_eq!(source.config.unwrap().to_string_lossy(), "brrtdoc.yaml");
            assert!(fail_on_error);
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["brrtdoc", "export", "-d", "decls"],
        vec!["brrtdoc", "versions", "-d", "decls"],
        vec!["brrtdoc", "lint", "-d", "decls"],
        vec!["brrtdoc", "watch", "-d", "decls", "-c", "docs.toml"],
    ];
    for args in commands {
        assert!(Cli::try_parse_from(&args).is_ok(), "failed to parse {:?}", args);
    }
    assert!(Cli::try_parse_from(["brrtdoc", "generate"]).is_err());
}

#[test]
fn test_build_and_export() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("users.yaml"), USERS).unwrap();

    let app = build_application(DocsConfig::default(), dir.path()).unwrap();
    assert_eq!(app.available_versions(), vec!["v1"]);

    let output = dir.path().join("out").with_extension("json");
    let cli = Cli::try_parse_from([
        "brrtdoc",
        "export",
        "-d",
        dir.path().to_str().unwrap(),
        "--version",
        "v1",
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();
    run_cli(cli).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        written["docs"]["resources"]["users"]["methods"]["show"]["description"],
        "show a user"
    );
}

#[test]
fn test_export_unknown_resource_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("users.yaml"), USERS).unwrap();
    let cli = Cli::try_parse_from([
        "brrtdoc",
        "export",
        "-d",
        dir.path().to_str().unwrap(),
        "--version",
        "v1",
        "--resource",
        "posts",
    ])
    .unwrap();
    assert!(run_cli(cli).is_err());
}

#[test]
fn test_missing_declarations_dir() {
    let cli = Cli::try_parse_from(["brrtdoc", "versions"]).unwrap();
    let err = run_cli(cli).unwrap_err();
    assert!(err.to_string().contains("declarations"));
}
