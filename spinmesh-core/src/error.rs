use std::path::PathBuf;

/// Errors raised while building a mesh from an object file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open object file '{path}': {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: face index {index} is out of range ({vertex_count} vertices declared so far)")]
    IndexOutOfRange {
        line: usize,
        index: i64,
        vertex_count: usize,
    },

    #[error("line {line}: malformed record '{content}'")]
    Malformed { line: usize, content: String },
}

/// Errors raised while reading or validating the render configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level error for scene startup and frame updates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("scene updated before on_create")]
    NotCreated,
}
