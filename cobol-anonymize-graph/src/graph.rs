//! The cross-file `COPY` dependency graph: cycle detection and a
//! deterministic topological order (dependencies first).

use std::collections::{BTreeMap, BTreeSet};

use crate::error::GraphError;

/// Edges point from a file to each copybook it includes (by normalized,
/// uppercase, extension-stripped name).
#[derive(Default, Debug, Clone)]
pub struct DependencyGraph {
    files: BTreeSet<String>,
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file (without asserting it depends on anything yet).
    pub fn add_file(&mut self, file: &str) {
        let key = normalize(file);
        self.files.insert(key.clone());
        self.edges.entry(key).or_default();
    }

    /// Records that `file` depends on (includes) `copybook`.
    pub fn add_dependency(&mut self, file: &str, copybook: &str) {
        let file_key = normalize(file);
        let copy_key = normalize(copybook);
        self.files.insert(file_key.clone());
        self.edges.entry(file_key).or_default().insert(copy_key);
    }

    /// Files that directly depend on `copybook`.
    pub fn dependents_of(&self, copybook: &str) -> Vec<String> {
        let copy_key = normalize(copybook);
        self.edges
            .iter()
            .filter(|(_, deps)| deps.contains(&copy_key))
            .map(|(file, _)| file.clone())
            .collect()
    }

    /// Emits a deterministic total order (dependencies before dependents).
    /// Ties among equally-ready files are broken in ascending lexicographic
    /// order. Copybooks that were referenced but never registered as a
    /// file (i.e. never found in the batch) are treated as having no
    /// further dependencies themselves.
    pub fn topological_order(&self) -> Result<Vec<String>, GraphError> {
        let mut all_nodes: BTreeSet<String> = self.files.clone();
        for deps in self.edges.values() {
            for d in deps {
                all_nodes.insert(d.clone());
            }
        }

        let mut remaining: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for node in &all_nodes {
            remaining.insert(
                node.clone(),
                self.edges.get(node).cloned().unwrap_or_default(),
            );
        }

        let mut order = Vec::with_capacity(all_nodes.len());
        let mut emitted: BTreeSet<String> = BTreeSet::new();

        while emitted.len() < all_nodes.len() {
            let mut ready: Vec<String> = remaining
                .iter()
                .filter(|(node, deps)| !emitted.contains(*node) && deps.is_subset(&emitted))
                .map(|(node, _)| node.clone())
                .collect();
            ready.sort();

            if ready.is_empty() {
                let cycle = self.find_cycle(&emitted);
                log::warn!("circular COPY dependency: {}", cycle.join(" -> "));
                return Err(GraphError::CircularDependency { cycle });
            }

            for node in ready {
                order.push(node.clone());
                emitted.insert(node);
            }
        }

        Ok(order)
    }

    fn find_cycle(&self, already_emitted: &BTreeSet<String>) -> Vec<String> {
        let remaining: Vec<&String> = self
            .files
            .iter()
            .chain(self.edges.values().flatten())
            .filter(|n| !already_emitted.contains(*n))
            .collect();
        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut stack: Vec<String> = Vec::new();

        for start in remaining {
            if visited.contains(start) {
                continue;
            }
            if let Some(cycle) = self.dfs_find_cycle(start, &mut visited, &mut stack) {
                return cycle;
            }
        }
        Vec::new()
    }

    fn dfs_find_cycle(
        &self,
        node: &str,
        visited: &mut BTreeSet<String>,
        stack: &mut Vec<String>,
    ) -> Option<Vec<String>> {
        if let Some(pos) = stack.iter().position(|n| n == node) {
            return Some(stack[pos..].to_vec());
        }
        if visited.contains(node) {
            return None;
        }
        visited.insert(node.to_string());
        stack.push(node.to_string());
        if let Some(deps) = self.edges.get(node) {
            for dep in deps {
                if let Some(cycle) = self.dfs_find_cycle(dep, visited, stack) {
                    return Some(cycle);
                }
            }
        }
        stack.pop();
        None
    }
}

pub fn normalize(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let stem = base.split('.').next().unwrap_or(base);
    stem.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topological_order_puts_dependencies_first() {
        let mut g = DependencyGraph::new();
        g.add_file("MAIN.cbl");
        g.add_dependency("MAIN.cbl", "COPYBOOK.cpy");
        g.add_file("COPYBOOK.cpy");

        let order = g.topological_order().unwrap();
        let main_pos = order.iter().position(|n| n == "MAIN").unwrap();
        let copy_pos = order.iter().position(|n| n == "COPYBOOK").unwrap();
        assert!(copy_pos < main_pos);
    }

    #[test]
    fn ties_break_lexicographically() {
        let mut g = DependencyGraph::new();
        g.add_file("ZEBRA.cbl");
        g.add_file("ALPHA.cbl");
        let order = g.topological_order().unwrap();
        assert_eq!(order, vec!["ALPHA".to_string(), "ZEBRA".to_string()]);
    }

    #[test]
    fn cycle_is_detected() {
        let mut g = DependencyGraph::new();
        g.add_dependency("A.cpy", "B");
        g.add_dependency("B.cpy", "A");
        let err = g.topological_order().unwrap_err();
        match err {
            GraphError::CircularDependency { cycle } => {
                assert!(cycle.contains(&"A".to_string()));
                assert!(cycle.contains(&"B".to_string()));
            }
        }
    }
}
