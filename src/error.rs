use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read roster {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed roster document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate student id: {0}")]
    DuplicateId(String),
}
