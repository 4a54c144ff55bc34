use std::fmt;

use tracing::warn;

use crate::{
    error::{ConfigError, GenerationError},
    provider::Provider,
};

pub const PROVIDER_ENV: &str = "VIRALSCRIPT_PROVIDER";
pub const MODEL_ENV: &str = "VIRALSCRIPT_MODEL";
pub const API_URL_ENV: &str = "VIRALSCRIPT_API_URL";
/// Shared credential variable, checked after the provider-specific one.
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Everything the generation client needs, resolved once at startup.
#[derive(Clone)]
pub struct Settings {
    pub provider: Provider,
    pub model: String,
    pub api_url: String,
    pub api_key: Option<String>,
}

impl Settings {
    /// Provider defaults with no credential.
    pub fn for_provider(provider: Provider) -> Self {
        let config = provider.config();
        Self {
            provider,
            model: config.model.to_string(),
            api_url: config.api_url.to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// A missing API key is only a warning: the window still opens and the request fails
    /// later with [`GenerationError::MissingApiKey`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match value(PROVIDER_ENV) {
            Some(name) => name.parse()?,
            None => Provider::default(),
        };

        let mut settings = Self::for_provider(provider);
        if let Some(model) = value(MODEL_ENV) {
            settings.model = model.trim().to_string();
        }
        if let Some(api_url) = value(API_URL_ENV) {
            settings.api_url = api_url.trim().trim_end_matches('/').to_string();
        }
        settings.api_key = value(settings.api_key_env())
            .or_else(|| value(FALLBACK_API_KEY_ENV))
            .map(|key| key.trim().to_string());

        if settings.api_key.is_none() {
            warn!(
                provider = provider.name(),
                env_var = settings.api_key_env(),
                "API key is missing; generation requests will fail until it is set"
            );
        }

        Ok(settings)
    }

    pub fn api_key_env(&self) -> &'static str {
        self.provider.config().env_var
    }

    pub fn require_api_key(&self) -> Result<&str, GenerationError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| GenerationError::MissingApiKey {
                env_var: self.api_key_env().to_string(),
            })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
