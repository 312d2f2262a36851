use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Server answered {0}")]
    Http(StatusCode),
    #[error("{0}")]
    NotFound(String),
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Text shown to the user in place of the results.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) | FetchError::Http(_) | FetchError::Decode(_) => {
                "Something went wrong with getting movies.".to_string()
            }
            FetchError::NotFound(message) => message.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O failed for {0}: {1}")]
    Io(String, std::io::Error),
    #[error("Stored value for {0} is malformed: {1}")]
    Malformed(String, serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    Parse(String, serde_yaml::Error),
}
