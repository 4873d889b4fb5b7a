//! RON file loading and directory watching for hot reload.
//!
//! `load_ron_files` reads every `.ron` file in a directory. `RonWatcher` is a
//! filesystem watcher that raises a shared flag when something in the
//! watched directory is modified; systems poll and clear the flag.

use bevy::log::{debug, warn};
use bevy::prelude::Resource;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// File-watcher resource for RON hot-reload.
#[derive(Resource)]
pub struct RonWatcher {
    changed: Arc<AtomicBool>, // Set when a watched file is modified.
    _watcher: Option<RecommendedWatcher>, // kept alive for as long as the resource
}

impl RonWatcher {
    /// A watcher with no OS backing; `take_changed` always returns `false`.
    /// Used when the real watcher cannot be created.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(AtomicBool::new(false)),
            _watcher: None,
        }
    }

    /// Return whether anything changed since the last call, clearing the flag.
    pub fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::AcqRel)
    }

    /// Raise the flag by hand (the settings reload key).
    pub fn mark_changed(&self) {
        self.changed.store(true, Ordering::Release);
    }
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// Files are visited in file-name order. Files that fail to read or parse
/// are skipped with a warning.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: impl AsRef<Path>) -> Vec<T> {
    let path = path.as_ref();
    let Ok(entries) = std::fs::read_dir(path) else {
        debug!("no RON directory at {}", path.display());
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
        let content = match std::fs::read_to_string(&file) {
            Ok(c) => c,
            Err(e) => {
                warn!("failed to read {}: {e}", file.display());
                continue;
            }
        };
        match ron::from_str::<T>(&content) {
            Ok(item) => items.push(item),
            Err(e) => warn!("failed to parse {}: {e}", file.display()),
        }
    }
    items
}

/// Create a `RonWatcher` for modifications under `path`.
///
/// # Errors
/// Returns a `notify::Error` if the OS watcher cannot be created or the
/// directory cannot be registered.
pub fn setup_ron_watcher(path: impl AsRef<Path>) -> Result<RonWatcher, notify::Error> {
    let path = path.as_ref();
    let changed = Arc::new(AtomicBool::new(false));
    let flag = changed.clone();
    let watched: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    std::fs::canonicalize(p)
                        .unwrap_or_else(|_| p.clone())
                        .starts_with(&watched)
                });
                if relevant {
                    flag.store(true, Ordering::Release);
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(path, RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        name: String,
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stride-watch-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_ron_files_in_name_order_and_skips_bad_ones() {
        let dir = scratch_dir("load");
        std::fs::write(dir.join("b.ron"), "(name: \"second\")").unwrap();
        std::fs::write(dir.join("a.ron"), "(name: \"first\")").unwrap();
        std::fs::write(dir.join("c.ron"), "(nope").unwrap();
        std::fs::write(dir.join("d.txt"), "(name: \"ignored\")").unwrap();

        let items: Vec<Item> = load_ron_files(&dir);
        assert_eq!(
            items,
            vec![Item { name: "first".into() }, Item { name: "second".into() }]
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_is_empty() {
        let items: Vec<Item> = load_ron_files("definitely/not/here");
        assert!(items.is_empty());
    }

    #[test]
    fn stub_flag_round_trip() {
        let w = RonWatcher::stub();
        assert!(!w.take_changed());
        w.mark_changed();
        assert!(w.take_changed());
        assert!(!w.take_changed());
    }
}
