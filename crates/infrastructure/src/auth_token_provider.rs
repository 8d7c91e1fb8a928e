use async_trait::async_trait;

use staffdesk_core::{AppResult, NonEmptyString};

/// Supplies the bearer token attached to every admin API request.
#[async_trait]
pub trait AuthTokenProvider: Send + Sync {
    /// Returns the current bearer token.
    async fn bearer_token(&self) -> AppResult<String>;
}

/// Token provider backed by a fixed, pre-issued token.
#[derive(Debug, Clone)]
pub struct StaticAuthTokenProvider {
    token: NonEmptyString,
}

impl StaticAuthTokenProvider {
    /// Creates a provider, rejecting blank tokens.
    pub fn new(token: impl Into<String>) -> AppResult<Self> {
        let token = token.into();
        Ok(Self {
            token: NonEmptyString::new(token.trim())?,
        })
    }
}

#[async_trait]
impl AuthTokenProvider for StaticAuthTokenProvider {
    async fn bearer_token(&self) -> AppResult<String> {
        Ok(self.token.as_str().to_owned())
    }
}
