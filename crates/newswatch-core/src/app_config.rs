use std::path::PathBuf;

use crate::ConfigError;

/// Hard upper bound on results per query imposed by the search providers.
pub const MAX_RESULTS_PER_QUERY_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct AppConfig {
    pub google_api_key: Option<String>,
    pub google_search_engine_id: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub roster_path: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_results_per_query: u32,
    pub search_region: String,
    pub max_text_length: usize,
    pub search_max_retries: u32,
    pub search_retry_backoff_ms: u64,
    pub inter_query_delay_ms: u64,
}

impl AppConfig {
    /// Google Custom Search credentials as `(api_key, search_engine_id)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first absent variable.
    pub fn google_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let key = self
            .google_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_API_KEY".to_string()))?;
        let engine = self
            .google_search_engine_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_SEARCH_ENGINE_ID".to_string()))?;
        Ok((key, engine))
    }

    /// `SerpApi` key for the news provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `SERPAPI_API_KEY` is unset.
    pub fn serpapi_key(&self) -> Result<&str, ConfigError> {
        self.serpapi_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("SERPAPI_API_KEY".to_string()))
    }

    /// Key for the relevance classifier endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when neither `LLM_API_KEY` nor
    /// `HF_API_KEY` is set.
    pub fn llm_key(&self) -> Result<&str, ConfigError> {
        self.llm_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("LLM_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("google_search_engine_id", &self.google_search_engine_id)
            .field(
                "serpapi_api_key",
                &self.serpapi_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "llm_api_key",
                &self.llm_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("roster_path", &self.roster_path)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_results_per_query", &self.max_results_per_query)
            .field("search_region", &self.search_region)
            .field("max_text_length", &self.max_text_length)
            .field("search_max_retries", &self.search_max_retries)
            .field("search_retry_backoff_ms", &self.search_retry_backoff_ms)
            .field("inter_query_delay_ms", &self.inter_query_delay_ms)
            .finish()
    }
}
