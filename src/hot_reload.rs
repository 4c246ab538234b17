//! # Hot Reload Module
//!
//! Rebuilds the documentation registry when declaration manifests change,
//! without restarting the process.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brrtdoc::hot_reload::watch_declarations;
//! use brrtdoc::registry::Application;
//!
//! let shared = Application::new(config).into_shared();
//! let watcher = watch_declarations("declarations", shared.clone(), |app, versions| {
//!     println!("rebuilt {} versions, checksum {}", versions.len(), app.checksum());
//! })?;
//!
//! // Keep the watcher alive for as long as reloads are wanted
//! ```
//!
//! ## Reload Process
//!
//! On a create or modify event below the watched directory:
//!
//! 1. **Discover** - the directory is scanned for manifests again
//! 2. **Rebuild** - under the registry write lock, the registry is reset
//!    and every manifest is replayed
//! 3. **Callback** - `on_reload` runs, still under the lock, with the new
//!    version list
//!
//! A manifest that fails to parse is skipped and logged; the rest of the
//! documentation is still rebuilt. If the directory itself cannot be
//! scanned, the previous registry stays in place.

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::discovery::discover_manifests;
use crate::registry::{Application, SharedApplication};

/// Watch `dir` and rebuild `shared` from its manifests when anything changes
///
/// The returned watcher stops watching when dropped.
///
/// # Errors
///
/// Fails if the watcher cannot be created or the directory not watched.
pub fn watch_declarations<P, F>(
    dir: P,
    shared: SharedApplication,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&Application, Vec<String>) + Send + 'static,
{
    let dir: PathBuf = dir.as_ref().to_path_buf();
    let scan_dir = dir.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                let manifests = match discover_manifests(&scan_dir) {
                    Ok(manifests) => manifests,
                    Err(e) => {
                        warn!(dir = %scan_dir.display(), error = %e, "hot-reload: scan failed, keeping previous documentation");
                        return;
                    }
                };
                match shared.write() {
                    Ok(mut app) => {
                        let applied = app.reload_documentation(&manifests);
                        let versions = app.available_versions();
                        info!(
                            manifests = applied,
                            versions = versions.len(),
                            "hot-reload: documentation updated"
                        );
                        on_reload(&app, versions);
                    }
                    Err(_) => error!("hot-reload: registry lock poisoned"),
                }
            }
            Err(e) => error!(error = ?e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&dir, RecursiveMode::Recursive)?;
    Ok(watcher)
}
