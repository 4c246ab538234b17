//! # Documentation Linter Module
//!
//! Consistency checks over committed documentation.
//!
//! ## Checks Performed
//!
//! 1. **Undeclared path params** - every `:id` / `{id}` placeholder of an
//!    endpoint should be declared as a param (warning)
//! 2. **Missing description** - documented methods should say what they do
//!    (info)
//! 3. **Duplicate endpoint** - one `(HTTP method, path)` pair claimed by two
//!    methods of the same version (error)
//! 4. **Unresolved see** - `see` must name an existing method (warning)
//!
//! ## Usage
//!
//! ```rust
//! use brrtdoc::linter::{lint_application, LintSeverity};
//! use brrtdoc::registry::Application;
//!
//! let app = Application::default();
//! let issues = lint_application(&app);
//! assert!(!issues.iter().any(|i| i.severity == LintSeverity::Error));
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::description::{MethodDescription, ResourceDescription};
use crate::registry::{Application, MethodKey};


/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintSeverity {
    /// Error - documentation is ambiguous
    Error,
    /// Warning - documentation is incomplete or misleading
    Warning,
    /// Info - best practice suggestion
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LintSeverity::Error => "error",
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        };
        write!(f, "{}", s)
    }
}

/// A lint issue found in the registry
#[derive(Debug, Clone)]
pub struct LintIssue {
    /// Where the issue occurred, as `version#resource#method`
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., "undeclared_path_param")
    pub kind: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl LintIssue {
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Lint every method of every version
#[must_use]
pub fn lint_application(app: &Application) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    for version in app.available_versions() {
        let mut claimed: HashMap<(String, String), String> = HashMap::new();
        for resource in app.resources(&version) {
            for method in resource.methods() {
                lint_method(app, &mut issues, resource, method);
                lint_duplicate_endpoints(&mut issues, &mut claimed, method);
            }
        }
    }
    issues
}

fn lint_method(
    app: &Application,
    issues: &mut Vec<LintIssue>,
    resource: &ResourceDescription,
    method: &MethodDescription,
) {
    let location = method.qualified_name();

    for endpoint in &method.endpoints {
        for placeholder in endpoint.path_params() {
            if method.params.get(placeholder).is_none() {
                issues.push(
                    LintIssue::new(
                        &location,
                        LintSeverity::Warning,
                        "undeclared_path_param",
                        format!(
                            "Path '{}' uses ':{}' but no param '{}' is declared",
                            endpoint.path, placeholder, placeholder
                        ),
                    )
                    .with_suggestion(format!("Declare param '{}'", placeholder)),
                );
            }
        }
    }

    if method.description.as_deref().map_or(true, |d| d.trim().is_empty()) {
        issues.push(
            LintIssue::new(
                &location,
                LintSeverity::Info,
                "missing_description",
                format!("Method '{}' of '{}' has no description", method.name, resource.name),
            )
            .with_suggestion("Add desc(...) before the method definition"),
        );
    }

    if let Some(reference) = &method.see {
        let resolved = MethodKey::parse(reference).ok().is_some_and(|key| {
            let version = key.version.as_deref().unwrap_or(&method.version);
            app.resource(version, &key.resource)
                .and_then(|r| r.method(&key.method))
                .is_some()
        });
        if !resolved {
            issues.push(LintIssue::new(
                &location,
                LintSeverity::Warning,
                "unresolved_see",
                format!("see reference '{}' does not name a documented method", reference),
            ));
        }
    }
}

fn lint_duplicate_endpoints(
    issues: &mut Vec<LintIssue>,
    claimed: &mut HashMap<(String, String), String>,
    method: &MethodDescription,
) {
    let location = method.qualified_name();
    for endpoint in &method.endpoints {
        let key = (endpoint.http_method.to_string(), endpoint.path.clone());
        match claimed.get(&key) {
            Some(owner) if *owner != location => {
                issues.push(
                    LintIssue::new(
                        &location,
                        LintSeverity::Error,
                        "duplicate_endpoint",
                        format!("{} {} is already documented by {}", key.0, key.1, owner),
                    )
                    .with_suggestion("Give each method its own route"),
                );
            }
            Some(_) => {}
            None => {
                claimed.insert(key, location.clone());
            }
        }
    }
}

/// Whether any issue is an error
#[must_use]
pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Print lint issues grouped by severity
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("No lint issues found");
        return;
    }

    let count = |severity: LintSeverity| issues.iter().filter(|i| i.severity == severity).count();
    println!(
        "\nLint results: {} error(s), {} warning(s), {} info(s)\n",
        count(LintSeverity::Error),
        count(LintSeverity::Warning),
        count(LintSeverity::Info)
    );

    let mut sorted: Vec<&LintIssue> = issues.iter().collect();
    sorted.sort_by_key(|i| i.severity);
    for issue in sorted {
        println!("   {} [{}] {}", issue.severity, issue.kind, issue.location);
        println!("      {}", issue.message);
        if let Some(suggestion) = &issue.suggestion {
            println!("      Suggestion: {}", suggestion);
        }
    }
}
