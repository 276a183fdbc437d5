//! Error types for Fleet Console
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Main error type for the application
#[derive(Debug, Snafu)]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (preference file, data directories)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },

    /// A data source fetch was rejected
    #[snafu(display("Failed to load {view}: {message}"))]
    Load { view: String, message: String },

    /// A form field failed validation
    #[snafu(display("{field}: {message}"))]
    Validation { field: &'static str, message: String },

    /// Persona string outside the closed persona set
    #[snafu(display("Unknown persona: {value}"))]
    UnknownPersona { value: String },

    /// Embedded asset missing from the bundle
    #[snafu(display("Missing asset: {path}"))]
    MissingAsset { path: String },

    /// Async runtime failure
    #[snafu(display("Runtime error: {message}"))]
    Runtime { message: String },
}

impl Error {
    /// Whether this error came from a form validator
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
