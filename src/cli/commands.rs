use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::DocsConfig;
use crate::discovery::discover_manifests;
use crate::hot_reload::watch_declarations;
use crate::linter::{has_errors, lint_application, print_lint_issues, LintSeverity};
use crate::registry::{rebuild_shared, Application};

/// Command-line interface for brrtdoc
///
/// Builds the documentation registry from declaration manifests and exports,
/// inspects, lints or watches it.
#[derive(Parser)]
#[command(name = "brrtdoc")]
#[command(about = "API documentation registry CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where declarations and settings come from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory of declaration manifests (falls back to `declarations_dir` in the config)
    #[arg(short, long)]
    pub declarations: Option<PathBuf>,

    /// Configuration file (YAML, TOML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print or write the JSON documentation tree
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// API version to export (default: the configured default version)
        #[arg(long)]
        version: Option<String>,

        /// Export a single resource
        #[arg(short, long)]
        resource: Option<String>,

        /// Export a single method of the resource
        #[arg(short, long, requires = "resource")]
        method: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the available API versions
    Versions {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Lint the documentation
    ///
    /// Reports undeclared path params, missing descriptions, endpoints
    /// documented twice and unresolved `see` references.
    Lint {
        #[command(flatten)]
        source: SourceArgs,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,
    },
    /// Rebuild the documentation whenever a manifest changes
    Watch {
        #[command(flatten)]
        source: SourceArgs,
    },
}

impl SourceArgs {
    fn load_config(&self) -> anyhow::Result<DocsConfig> {
        let mut config = match &self.config {
            Some(path) => DocsConfig::from_file(path)?,
            None => DocsConfig::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn declarations_dir(&self, config: &DocsConfig) -> anyhow::Result<PathBuf> {
        self.declarations
            .clone()
            .or_else(|| config.declarations_dir.clone())
            .ok_or_else(|| anyhow!("no declarations directory: pass --declarations or set declarations_dir"))
    }
}

/// Build a registry from the manifests of `dir`
///
/// # Errors
///
/// Fails if the directory cannot be scanned.
pub fn build_application(config: DocsConfig, dir: &Path) -> anyhow::Result<Application> {
    let manifests = discover_manifests(dir)?;
    let mut app = Application::new(config);
    app.reload_documentation(&manifests);
    Ok(app)
}

fn load(source: &SourceArgs) -> anyhow::Result<(Application, PathBuf)> {
    let config = source.load_config()?;
    let dir = source.declarations_dir(&config)?;
    Ok((build_application(config, &dir)?, dir))
}

/// Run a parsed command line
///
/// # Errors
///
/// Any failure of the command, including lint errors with `--fail-on-error`.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Export {
            source,
            version,
            resource,
            method,
            output,
        } => {
            let (app, _) = load(source)?;
            let version = version
                .clone()
                .unwrap_or_else(|| app.config().default_version.clone());
            let tree = app
                .to_document_tree(&version, resource.as_deref(), method.as_deref())
                .ok_or_else(|| {
                    anyhow!(
                        "nothing documented for version '{}'{}{}",
                        version,
                        resource.as_deref().map(|r| format!(", resource '{}'", r)).unwrap_or_default(),
                        method.as_deref().map(|m| format!(", method '{}'", m)).unwrap_or_default()
                    )
                })?;
            let json = serde_json::to_string_pretty(&tree)?;
            match output {
                Some(path) => std::fs::write(path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", json),
            }
            Ok(())
        }
        Commands::Versions { source } => {
            let (app, _) = load(source)?;
            for version in app.available_versions() {
                println!("{}", version);
            }
            Ok(())
        }
        Commands::Lint {
            source,
            fail_on_error,
        } => {
            let (app, _) = load(source)?;
            let issues = lint_application(&app);
            print_lint_issues(&issues);
            if *fail_on_error && has_errors(&issues) {
                let errors = issues
                    .iter()
                    .filter(|i| i.severity == LintSeverity::Error)
                    .count();
                bail!("lint found {} error(s)", errors);
            }
            Ok(())
        }
        Commands::Watch { source } => {
            let (app, dir) = load(source)?;
            info!(checksum = %app.checksum(), versions = ?app.available_versions(), "documentation built");
            let shared = app.into_shared();

            let _watcher = watch_declarations(&dir, shared.clone(), |app, versions| {
                info!(checksum = %app.checksum(), versions = ?versions, "documentation rebuilt");
            })
            .with_context(|| format!("failed to watch {}", dir.display()))?;

            // A rebuild now picks up anything changed between the first scan and the watch
            rebuild_shared(&shared, &discover_manifests(&dir)?)?;
            info!(dir = %dir.display(), "watching declarations, press Ctrl-C to stop");
            loop {
                std::thread::park();
            }
        }
    }
}
