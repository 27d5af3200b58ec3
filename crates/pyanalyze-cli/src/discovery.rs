//! Walks the project tree for `.py` files, honoring the config's
//! `include`/`exclude`/`ignore` globs. Default `include` is every `.py`
//! file; a handful of directories that are never source (`.git`, common
//! virtualenv directory names) are always skipped regardless of config,
//! the same way a descent-pruning walk skips `node_modules` by default.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

const ALWAYS_SKIPPED_DIRS: &[&str] = &[".git", "__pycache__", ".venv", "venv", "node_modules"];

fn build_set(patterns: &[String], default_all: bool) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    if patterns.is_empty() && default_all {
        builder.add(Glob::new("**/*.py").expect("static glob"));
    }
    for pattern in patterns {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_else(|_| GlobSetBuilder::new().build().expect("empty set always builds"))
}

/// Every `.py` file under `root` matching `include` (default: all of them)
/// and none of `exclude`/`ignore`.
#[must_use]
pub fn collect_py_files(root: &Path, include: &[String], exclude: &[String], ignore: &[String]) -> Vec<PathBuf> {
    let include_set = build_set(include, true);
    let mut excluded = exclude.to_vec();
    excluded.extend(ignore.iter().cloned());
    let exclude_set = build_set(&excluded, false);

    let mut files = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        if !entry.file_type().is_dir() {
            return true;
        }
        !entry.file_name().to_str().is_some_and(|name| ALWAYS_SKIPPED_DIRS.contains(&name))
    });
    for entry in walker.filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("py") {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if !include_set.is_match(relative) || exclude_set.is_match(relative) {
            continue;
        }
        files.push(path.to_path_buf());
    }
    files.sort();
    files
}

#[cfg(test)]
#[path = "tests/discovery.rs"]
mod tests;
