//! Stage 1 (discovery): scans the input directory (and any configured
//! copybook search paths) for files matching the configured extensions.
//! Directory walking itself is out of scope as a general-purpose crate
//! dependency (spec.md §1); this is a deliberately plain, non-recursive-
//! tree-aware `std::fs` walk, not a `walkdir`/`ignore` integration.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One discovered source file: its path plus the raw bytes decoded per
/// the configured encoding (Latin-1 round-trips every byte; UTF-8 is
/// accepted when the configuration requests it).
#[derive(Clone, Debug)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub file_name: String,
    pub contents: String,
}

/// Recursively walks `root`, returning every file whose lowercased
/// extension (without the dot) is in `extensions`. Order is filesystem
/// order; callers that need determinism sort afterward (the dependency
/// graph's topological order is what actually determines processing
/// order, not discovery order).
pub fn scan_directory(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|source| Error::Io {
            path: dir.display().to_string(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| Error::Io {
                path: dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let ext_matches = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| extensions.iter().any(|want| want.eq_ignore_ascii_case(e)))
                .unwrap_or(false);
            if ext_matches {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Reads a file's content per `encoding`. `"latin-1"` maps each input
/// byte to its matching Unicode scalar value (lossless, total); anything
/// else is read as UTF-8.
pub fn read_file(path: &Path, encoding: &str) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;

    if encoding.eq_ignore_ascii_case("latin-1") || encoding.eq_ignore_ascii_case("iso-8859-1") {
        Ok(bytes.iter().map(|&b| b as char).collect())
    } else {
        String::from_utf8(bytes).map_err(|e| Error::Config(format!("{}: not valid UTF-8: {e}", path.display())))
    }
}

/// Discovers and reads every matching file under `root` plus every
/// `copybook_paths` entry, deduplicating by canonical path.
pub fn discover_files(
    root: &Path,
    copybook_paths: &[PathBuf],
    extensions: &[String],
    encoding: &str,
) -> Result<Vec<DiscoveredFile>> {
    let mut paths = scan_directory(root, extensions)?;
    for extra in copybook_paths {
        paths.extend(scan_directory(extra, extensions)?);
    }
    paths.sort();
    paths.dedup();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let contents = read_file(&path, encoding)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        files.push(DiscoveredFile {
            path,
            file_name,
            contents,
        });
    }
    Ok(files)
}
