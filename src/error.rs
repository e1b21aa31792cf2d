use thiserror::Error;

/// Failures of the in-memory filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("empty path")]
    EmptyPath,

    /// An intermediate segment is missing or names a file. Carries the
    /// canonical path reached before the failing segment.
    #[error("{path}{segment}: not a directory")]
    Unresolvable { path: String, segment: String },

    #[error("{0}: no such directory")]
    NotADirectory(String),

    #[error("{0}: is a directory")]
    IsADirectory(String),

    #[error("invalid file name '{0}'")]
    InvalidName(String),

    #[error("malformed tree description: {0}")]
    Description(String),
}

/// Everything a command handler can report. `Display` is the exact text the
/// user sees, so handlers render these straight into their result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("File {0} does not exists!")]
    FileNotFound(String),

    #[error("No directory {0}")]
    DirectoryNotFound(String),

    /// Which operand is missing: "directory", "address", "file".
    #[error("No {0} specified")]
    MissingArgument(&'static str),

    #[error("Err: unrecognized command \"{0}\"")]
    UnrecognizedCommand(String),

    /// The reason is kept for logs only.
    #[error("Error connecting")]
    Connection(String),

    #[error("Error writing file {path}")]
    WriteFailed {
        path: String,
        #[source]
        source: FsError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Tree(#[from] FsError),
}
