//! Utilities for loading RON files and watching directories for changes.
//!
//! Used by the settings loader: files are read from a directory, parsed in
//! file-name order, and a `notify` watcher flips a shared flag whenever a file
//! under the directory is modified so the game can hot-reload.

use bevy::log::{debug, warn};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// File-watcher handle for RON hot-reload.
pub struct RonWatcher {
    changed: Arc<AtomicBool>,
    _watcher: Option<RecommendedWatcher>, // kept alive for as long as the handle lives
}

impl RonWatcher {
    /// A watcher with no OS backing. `take_changed` always returns `false`.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(AtomicBool::new(false)),
            _watcher: None,
        }
    }

    /// Returns `true` once per batch of modifications and clears the flag.
    pub fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::AcqRel)
    }
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// Files are visited in name order so the result is stable across platforms.
/// Files that fail to parse are skipped with a warning.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(path) else {
        debug!("ron: directory '{path}' not readable, nothing loaded");
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();

    let mut items = Vec::new();
    for file in files {
        match std::fs::read_to_string(&file) {
            Ok(content) => match ron::from_str::<T>(&content) {
                Ok(item) => items.push(item),
                Err(e) => warn!("Failed to parse {}: {e}", file.display()),
            },
            Err(e) => warn!("Failed to read {}: {e}", file.display()),
        }
    }
    items
}

/// Create a `RonWatcher` that watches a directory for modifications.
///
/// # Errors
/// Returns a `notify::Error` if the underlying file-watcher cannot be
/// created or the watcher cannot be registered for the provided path.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(AtomicBool::new(false));
    let changed_clone = changed.clone();
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    let p_canon = std::fs::canonicalize(p).unwrap_or_else(|_| p.clone());
                    p_canon.starts_with(&watched_path)
                });
                if relevant {
                    changed_clone.store(true, Ordering::Release);
                }
            }
            Err(e) => warn!("Watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Item {
        name: String,
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("meteorfall-ron-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn loads_in_name_order_and_skips_bad_files() {
        let dir = scratch_dir("order");
        std::fs::write(dir.join("b.ron"), "(name: \"second\")").expect("write b");
        std::fs::write(dir.join("a.ron"), "(name: \"first\")").expect("write a");
        std::fs::write(dir.join("c.ron"), "(name: ").expect("write c");
        std::fs::write(dir.join("notes.txt"), "(name: \"ignored\")").expect("write txt");

        let items: Vec<Item> = load_ron_files(dir.to_str().expect("utf8 path"));
        assert_eq!(
            items,
            vec![Item { name: "first".into() }, Item { name: "second".into() }]
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let items: Vec<Item> = load_ron_files("definitely/not/a/real/dir");
        assert!(items.is_empty());
    }

    #[test]
    fn stub_never_reports_changes() {
        let w = RonWatcher::stub();
        assert!(!w.take_changed());
    }
}
