use std::path::PathBuf;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::{self, Credentials},
    spotify,
    types::Token,
    warning,
};

/// On-disk form of the cached token, tied to the client it was issued for.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedToken {
    client_id: String,
    token: Token,
}

pub struct TokenManager {
    credentials: Credentials,
    token_url: String,
    token: Option<Token>,
    cache_path: PathBuf,
    cache_checked: bool,
}

impl TokenManager {
    pub fn new(credentials: Credentials, token_url: String) -> Self {
        TokenManager {
            credentials,
            token_url,
            token: None,
            cache_path: Self::token_path(),
            cache_checked: false,
        }
    }

    /// Keeps the token cache at `path` instead of the data directory.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    pub async fn load(&mut self) -> Result<(), String> {
        let content = async_fs::read_to_string(&self.cache_path)
            .await
            .map_err(|e| e.to_string())?;
        let cached: CachedToken = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        if cached.client_id == self.credentials.client_id {
            self.token = Some(cached.token);
        }
        Ok(())
    }

    pub async fn persist(&self) -> Result<(), String> {
        let Some(token) = &self.token else {
            return Ok(());
        };

        if let Some(parent) = self.cache_path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let cached = CachedToken {
            client_id: self.credentials.client_id.clone(),
            token: token.clone(),
        };
        let json = serde_json::to_string_pretty(&cached).map_err(|e| e.to_string())?;
        async_fs::write(&self.cache_path, json).await.map_err(|e| e.to_string())
    }

    /// Returns an access token that is valid for at least a few more minutes,
    /// requesting a new one when the current token is missing or expiring.
    pub async fn get_valid_token(&mut self, client: &Client) -> Result<String, reqwest::Error> {
        if !self.cache_checked {
            self.cache_checked = true;
            // a missing or unreadable cache just means a fresh token is requested
            let _ = self.load().await;
        }

        match &self.token {
            Some(token) if !token.is_expired() => {}
            _ => {
                let token =
                    spotify::auth::request_token(client, &self.token_url, &self.credentials)
                        .await?;
                self.token = Some(token);
                if let Err(e) = self.persist().await {
                    warning!(
                        "Failed to save token to {}: {}",
                        self.cache_path.display(),
                        e
                    );
                }
            }
        }

        Ok(self
            .token
            .as_ref()
            .map(|t| t.access_token.clone())
            .unwrap_or_default())
    }

    /// Drops the current token so the next call requests a new one.
    pub fn invalidate(&mut self) {
        self.token = None;
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}
