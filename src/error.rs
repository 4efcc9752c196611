use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildwatchError {
    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),

    #[error("Status fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Server returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Could not write config file: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BuildwatchError>;
