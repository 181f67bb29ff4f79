//! Client for the clue demo server's root endpoint.

use serde::Deserialize;

/// The three lists the clue server hands out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClueLists {
    pub suspects: Vec<String>,
    pub rooms: Vec<String>,
    pub weapons: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClueClientError {
    /// The server answered with its `{error, errDescription}` body.
    #[error("Error {error}: {description}")]
    Server { error: u16, description: String },

    #[error("Could not connect to clue server: {0}")]
    Unreachable(String),

    #[error("Clue server response malformed: {0}")]
    Malformed(String),
}

impl ClueClientError {
    /// Number shown in the error heading; 0 when the server never answered.
    pub fn error_number(&self) -> u16 {
        match self {
            ClueClientError::Server { error, .. } => *error,
            ClueClientError::Unreachable(_) | ClueClientError::Malformed(_) => 0,
        }
    }

    pub fn description(&self) -> String {
        match self {
            ClueClientError::Server { description, .. } => description.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClueErrorBody {
    error: u16,
    #[serde(rename = "errDescription", default)]
    err_description: String,
}

#[derive(Debug, Clone)]
pub struct ClueClient {
    client: reqwest::Client,
    base_url: String,
}

impl ClueClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET `/` and return all three lists.
    pub async fn fetch_all(&self) -> Result<ClueLists, ClueClientError> {
        let url = format!("{}/", self.base_url);
        tracing::debug!("Fetch request made: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClueClientError::Unreachable(e.to_string()))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClueClientError::Malformed(e.to_string()))?;

        if body.get("error").is_some() {
            let err: ClueErrorBody = serde_json::from_value(body)
                .map_err(|e| ClueClientError::Malformed(e.to_string()))?;
            return Err(ClueClientError::Server {
                error: err.error,
                description: err.err_description,
            });
        }

        serde_json::from_value(body).map_err(|e| ClueClientError::Malformed(e.to_string()))
    }
}
