//! Errors raised while locating, loading or persisting `config.ron`.

/// Configuration failures. None of these are recoverable inside the loader;
/// callers decide whether to fall back to [`Config::default`](crate::Config).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The platform exposes no config directory and none was given on the CLI.
    #[error("no config directory available; pass --config <dir>")]
    NoConfigDir,

    /// `config.ron` exists but could not be read.
    #[error("failed to read config.ron: {0}")]
    ReadError(#[source] std::io::Error),

    /// The config directory or file could not be written.
    #[error("failed to write config.ron: {0}")]
    WriteError(#[source] std::io::Error),

    /// `config.ron` is not valid RON for [`Config`](crate::Config).
    #[error("invalid config.ron: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// The in-memory config could not be rendered as RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// A setting holds a value the game cannot run with.
    #[error("invalid setting `{setting}`: {reason}")]
    Invalid {
        setting: &'static str,
        reason: String,
    },
}
