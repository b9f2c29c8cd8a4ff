use anyhow::bail;

use crate::client::ApiClient;

/// Where to reach the API and which token to present
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub url: String,
    pub token: Option<String>,
}

impl ClientSettings {
    pub fn new(url: String, token: Option<String>) -> Self {
        Self {
            url,
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Client without credentials, for public routes
    pub fn anonymous(&self) -> ApiClient {
        ApiClient::new(&self.url)
    }

    /// Client carrying the bearer token; fails early when none is set
    pub fn authenticated(&self) -> anyhow::Result<ApiClient> {
        match &self.token {
            Some(token) => Ok(ApiClient::new(&self.url).with_token(token)),
            None => bail!("No token configured. Pass --token or set TASKBOARD_TOKEN"),
        }
    }
}
