//! Resolves a copybook name to a file on disk by searching a list of
//! configured search paths, and scans a directory's `COPY` statements into
//! a [`DependencyGraph`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::copy_stmt::find_copy_statements;
use crate::error::ResolverError;
use crate::graph::{normalize, DependencyGraph};

/// Extensions tried, in order, when a copybook name has none of its own.
const COPYBOOK_EXTENSIONS: &[&str] = &["cpy", "cob", "cbl", ""];

/// Searches a fixed list of directories for copybook files by uppercase
/// stem, caching hits (and misses) so repeated lookups for the same
/// normalized name are idempotent and cheap.
pub struct CopyResolver {
    search_paths: Vec<PathBuf>,
    cache: HashMap<String, Option<PathBuf>>,
    strict: bool,
}

impl CopyResolver {
    pub fn new(search_paths: Vec<PathBuf>, strict: bool) -> Self {
        Self {
            search_paths,
            cache: HashMap::new(),
            strict,
        }
    }

    /// Finds the file backing `copybook_name`, trying each search path in
    /// declared order and, within a path, each extension in
    /// [`COPYBOOK_EXTENSIONS`] order.
    pub fn resolve(&mut self, copybook_name: &str) -> Option<PathBuf> {
        let key = normalize(copybook_name);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }
        let found = self.search_paths.iter().find_map(|dir| {
            read_dir_upper_stems(dir)
                .into_iter()
                .find(|(stem, ext)| *stem == key && extension_is_allowed(ext))
                .map(|(_, _)| ())
                .and_then(|_| locate_exact(dir, &key))
        });
        self.cache.insert(key, found.clone());
        found
    }

    pub fn strict(&self) -> bool {
        self.strict
    }
}

fn extension_is_allowed(ext: &str) -> bool {
    COPYBOOK_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

fn read_dir_upper_stems(dir: &Path) -> Vec<(String, String)> {
    std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            let stem = path.file_stem()?.to_str()?.to_uppercase();
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string();
            Some((stem, ext))
        })
        .collect()
}

fn locate_exact(dir: &Path, stem_key: &str) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_uppercase() == stem_key)
                .unwrap_or(false)
        })
}

/// Scans every file's text for `COPY` statements and builds the
/// dependency graph. Returns non-fatal "copybook not found" warnings
/// unless `resolver.strict()`, in which case they are returned as errors.
pub fn build_dependency_graph(
    resolver: &mut CopyResolver,
    files: &[(String, String)], // (file name, file contents)
) -> (DependencyGraph, Vec<ResolverError>) {
    let mut graph = DependencyGraph::new();
    let mut warnings = Vec::new();

    for (file, _) in files {
        graph.add_file(file);
    }

    for (file, contents) in files {
        for stmt in find_copy_statements(contents, file) {
            graph.add_dependency(file, &stmt.copybook_name);
            if resolver.resolve(&stmt.copybook_name).is_none() {
                let known_in_batch = files
                    .iter()
                    .any(|(f, _)| normalize(f) == normalize(&stmt.copybook_name));
                if !known_in_batch {
                    warnings.push(ResolverError::CopyNotFound {
                        copybook: stmt.copybook_name.clone(),
                        file: file.clone(),
                        line: stmt.line,
                    });
                }
            }
        }
    }

    (graph, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_built_from_copy_statements() {
        let files = vec![
            ("MAIN.cbl".to_string(), "       COPY CUSTREC.".to_string()),
            ("CUSTREC.cpy".to_string(), "       05 WS-FIELD PIC X(1).".to_string()),
        ];
        let mut resolver = CopyResolver::new(vec![], false);
        let (graph, warnings) = build_dependency_graph(&mut resolver, &files);
        let order = graph.topological_order().unwrap();
        assert!(order.iter().position(|n| n == "CUSTREC") < order.iter().position(|n| n == "MAIN"));
        assert!(warnings.is_empty());
    }
}
