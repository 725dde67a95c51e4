use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClasspathError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid archive {path}: {message}")]
    Archive { path: PathBuf, message: String },
    #[error("unsupported classpath entry: {0}")]
    Unsupported(PathBuf),
    #[error("malformed class file for {name}: {message}")]
    ClassFormat { name: String, message: String },
}

pub type Result<T> = std::result::Result<T, ClasspathError>;
