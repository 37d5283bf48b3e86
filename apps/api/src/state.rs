use std::sync::Arc;

use crate::compile::CompilerChain;
use crate::config::Config;
use crate::render::TemplateStore;
use crate::session::SessionContext;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Process-wide model credential, set through `/set-api-key`.
    pub session: Arc<SessionContext>,
    pub templates: TemplateStore,
    /// Local -> remote -> built-in, as configured at startup.
    pub compiler: Arc<CompilerChain>,
    /// Shared connection pool for the model API and the remote compiler.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, http: reqwest::Client) -> Self {
        let session = Arc::new(SessionContext::new(config.gemini_api_key.clone()));
        let templates = TemplateStore::new(config.templates_dir.clone());
        let compiler = Arc::new(CompilerChain::from_config(&config, http.clone()));
        Self {
            config,
            session,
            templates,
            compiler,
            http,
        }
    }
}
