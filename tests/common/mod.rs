#![allow(dead_code)]

pub mod temp_files {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    // Global counter and lock for thread-safe temporary directory creation
    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);
    static TEMP_LOCK: Mutex<()> = Mutex::new(());

    /// Creates an empty declarations directory with a unique name
    pub fn create_temp_dir(prefix: &str) -> PathBuf {
        let _lock = TEMP_LOCK.lock().unwrap();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();

        let dir = std::env::temp_dir().join(format!(
            "brrtdoc_{}_{}_{}_{}",
            prefix,
            std::process::id(),
            counter,
            nanos
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Writes a manifest into `dir` and returns its path
    pub fn write_manifest(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Cleanup temporary directories (best effort)
    pub fn cleanup_temp_dirs(dirs: &[PathBuf]) {
        for dir in dirs {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

pub mod fixtures {
    /// Users controller documented in v1
    pub const USERS_V1: &str = r#"
controllers:
  - name: UsersController
    api_versions: [v1]
    short_description: Users
    methods:
      - name: show
        api: [{ method: GET, path: "/users/:id" }]
        desc: show a user
        params:
          - { name: id, type: integer, required: true }
      - name: index
        api: [{ method: GET, path: "/users" }]
        desc: list users
"#;

    /// Same controller with `show` redefined and `index` removed
    pub const USERS_V1_CHANGED: &str = r#"
controllers:
  - name: UsersController
    api_versions: [v1]
    methods:
      - name: show
        api: [{ method: GET, path: "/people/:id" }]
        desc: show a person
"#;

    pub const BROKEN: &str = "controllers: [ {";
}
