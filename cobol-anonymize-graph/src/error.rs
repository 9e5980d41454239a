use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A cycle was found while computing the topological order; fatal,
    /// prevents processing-order computation.
    #[error("circular dependency: {}", cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    /// A `COPY` reference names a copybook that could not be found on any
    /// configured search path. Only surfaced as an error when strict
    /// copybook presence is requested; otherwise it is a warning and the
    /// reference is left unmapped in the graph.
    #[error("copybook '{copybook}' referenced from {file}:{line} was not found")]
    CopyNotFound {
        copybook: String,
        file: String,
        line: usize,
    },
}
