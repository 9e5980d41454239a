use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum TransformError {
    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("{file}:{line}: proposed code body is {actual_length} bytes, exceeds {max_length}")]
    ColumnOverflow {
        file: String,
        line: usize,
        actual_length: usize,
        max_length: usize,
    },
}
