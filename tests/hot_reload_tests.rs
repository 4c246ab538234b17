#![allow(clippy::unwrap_used, clippy::expect_used)]

use brrtdoc::discovery::discover_manifests;
use brrtdoc::hot_reload::watch_declarations;
use brrtdoc::registry::{rebuild_shared, Application};
use std::sync::{Arc, Mutex};
use std::time::Duration;

mod common;
use common::{fixtures, temp_files};

fn show_path(app: &Application) -> Option<String> {
    app.get_method_description("v1#users#show")
        .ok()
        .flatten()
        .map(|m| m.endpoints[0].path.clone())
}

#[test]
fn test_watch_declarations_reload() {
    let dir = temp_files::create_temp_dir("hot_reload");
    temp_files::write_manifest(&dir, "users.yaml", fixtures::USERS_V1);

    let shared = Application::default().into_shared();
    let manifests = discover_manifests(&dir).unwrap();
    assert_eq!(rebuild_shared(&shared, &manifests).unwrap(), 1);
    assert_eq!(
        show_path(&shared.read().unwrap()).as_deref(),
        Some("/users/:id")
    );

    let updates: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let updates_clone = updates.clone();

    let watcher = watch_declarations(&dir, shared.clone(), move |app, _versions| {
        updates_clone.lock().unwrap().push(show_path(app));
    })
    .expect("watch_declarations");

    // allow watcher thread to start
    std::thread::sleep(Duration::from_millis(100));

    temp_files::write_manifest(&dir, "users.yaml", fixtures::USERS_V1_CHANGED);

    // wait for callback to receive update
    for _ in 0..20 {
        {
            let ups = updates.lock().unwrap();
            if ups.iter().any(|p| p.as_deref() == Some("/people/:id")) {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    let ups = updates.lock().unwrap();
    assert!(ups.iter().any(|p| p.as_deref() == Some("/people/:id")));
    drop(ups);

    {
        let app = shared.read().unwrap();
        assert!(app.get_method_description("v1#users#index").unwrap().is_none());
    }

    drop(watcher);
    temp_files::cleanup_temp_dirs(&[dir]);
}
