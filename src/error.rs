use thiserror::Error;

/// Lander-specific error types
#[derive(Error, Debug)]
pub enum LanderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Container runtime error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Generic error: {0}")]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting: {field} (set {env})")]
    MissingField { field: String, env: String },

    #[error("Config file could not be read at path: {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Invalid config file format: {reason}")]
    InvalidFormat { reason: String },

    #[error("Invalid listen address: {address}")]
    InvalidListen { address: String },

    #[error("Invalid value for {env}: {value:?} (expected true or false)")]
    InvalidFlag { env: String, value: String },

    #[error("Invalid log level: {level}")]
    InvalidLogLevel { level: String },
}

/// Failures talking to the container runtime. Always fatal to the request.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Unsupported runtime endpoint: {endpoint}")]
    UnsupportedEndpoint { endpoint: String },

    #[error("Failed to connect to runtime at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: bollard::errors::Error,
    },

    #[error("Failed to list containers: {0}")]
    List(#[source] bollard::errors::Error),
}

/// Per-container extraction failures. These never leave the grouper.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{mode} extraction is disabled")]
    ModeDisabled { mode: &'static str },

    #[error("Missing label: {key}")]
    MissingLabel { key: String },

    #[error("Routing rule has no ':' delimiter: {rule}")]
    MalformedRule { rule: String },
}

impl ExtractError {
    /// Configuration-level skips, as opposed to bad labels on one container.
    pub fn is_mode_disabled(&self) -> bool {
        matches!(self, ExtractError::ModeDisabled { .. })
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template could not be compiled: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("Template could not be rendered: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Convenience type alias for Lander results
pub type Result<T, E = LanderError> = std::result::Result<T, E>;
