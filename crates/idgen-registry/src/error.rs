use std::path::PathBuf;

/// A result type defaulting to the registry [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failures while loading registry configuration or building a named
/// generator.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is larger than the loader accepts.
    #[error("config {} is {size} bytes, exceeding the {limit} byte limit", .path.display())]
    TooLarge {
        path: PathBuf,
        size: usize,
        limit: usize,
    },

    /// The configuration is not valid TOML or does not match the schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A generator's epoch is not a recognised UTC date or is before 1970.
    #[error(
        "invalid epoch {value:?} for generator {name:?}; expected yyyy-MM-ddTHH:mm:ss, yyyy-MM-dd HH:mm:ss or yyyy-MM-dd"
    )]
    InvalidEpoch { name: String, value: String },

    /// No generator with this name is configured.
    #[error("no id generator named {name:?} is configured")]
    UnknownGenerator { name: String },

    /// The core library rejected a generator's configuration.
    #[error(transparent)]
    Generator(#[from] idgen::Error),
}
