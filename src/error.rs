use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdpError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Guaranteed analysis fragment has no closing parenthesis: {fragment:?}")]
    MalformedAnalysis { fragment: String },

    #[error("Product identifier {0:?} cannot be used as a file name")]
    UnsafeIdentifier(String),
}

pub type Result<T> = std::result::Result<T, PdpError>;
