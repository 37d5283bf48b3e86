// Process-wide credential for the language-model collaborator.
// Set by `/set-api-key`, read by every request that needs a completion.

pub mod handlers;

use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::llm_client::GeminiClient;

#[derive(Debug, Default)]
pub struct SessionContext {
    api_key: RwLock<Option<String>>,
}

impl SessionContext {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: RwLock::new(api_key.filter(|k| !k.trim().is_empty())),
        }
    }

    /// Stores a trimmed key; blank keys are rejected.
    pub async fn set_api_key(&self, key: &str) -> Result<(), AppError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::Validation("API key is required".to_string()));
        }
        *self.api_key.write().await = Some(key.to_string());
        Ok(())
    }

    pub async fn api_key(&self) -> Option<String> {
        self.api_key.read().await.clone()
    }

    /// A client bound to the current key, or `CredentialNotSet`.
    pub async fn client(&self, http: reqwest::Client, model: &str) -> Result<GeminiClient, AppError> {
        let key = self.api_key().await.ok_or(AppError::CredentialNotSet)?;
        Ok(GeminiClient::new(http, key, model.to_string()))
    }
}
