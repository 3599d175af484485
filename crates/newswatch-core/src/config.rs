use crate::app_config::{AppConfig, MAX_RESULTS_PER_QUERY_LIMIT};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Credentials are optional here; each command asks for the ones it needs
/// through the accessors on [`AppConfig`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let google_api_key = optional("GOOGLE_API_KEY");
    let google_search_engine_id = optional("GOOGLE_SEARCH_ENGINE_ID");
    let serpapi_api_key = optional("SERPAPI_API_KEY");
    let llm_api_key = optional("LLM_API_KEY").or_else(|| optional("HF_API_KEY"));

    let llm_base_url = or_default("NEWSWATCH_LLM_BASE_URL", "https://router.huggingface.co/v1");
    let llm_model = or_default("NEWSWATCH_LLM_MODEL", "openai/gpt-oss-safeguard-20b:groq");
    let roster_path = PathBuf::from(or_default("NEWSWATCH_ROSTER_PATH", "./config/roster.yaml"));
    let log_level = or_default("NEWSWATCH_LOG_LEVEL", "info");
    let user_agent = or_default("NEWSWATCH_USER_AGENT", DEFAULT_USER_AGENT);
    let search_region = or_default("NEWSWATCH_SEARCH_REGION", "ua");

    let request_timeout_secs = parse_u64("NEWSWATCH_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSWATCH_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }

    let max_results_per_query = parse_u32("NEWSWATCH_MAX_RESULTS_PER_QUERY", "100")?;
    if max_results_per_query == 0 || max_results_per_query > MAX_RESULTS_PER_QUERY_LIMIT {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSWATCH_MAX_RESULTS_PER_QUERY".to_string(),
            reason: format!("must be between 1 and {MAX_RESULTS_PER_QUERY_LIMIT}"),
        });
    }

    let max_text_length = parse_usize("NEWSWATCH_MAX_TEXT_LENGTH", "1500")?;
    if max_text_length == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSWATCH_MAX_TEXT_LENGTH".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let search_max_retries = parse_u32("NEWSWATCH_SEARCH_MAX_RETRIES", "2")?;
    let search_retry_backoff_ms = parse_u64("NEWSWATCH_SEARCH_RETRY_BACKOFF_MS", "1000")?;
    let inter_query_delay_ms = parse_u64("NEWSWATCH_INTER_QUERY_DELAY_MS", "250")?;

    Ok(AppConfig {
        google_api_key,
        google_search_engine_id,
        serpapi_api_key,
        llm_api_key,
        llm_base_url,
        llm_model,
        roster_path,
        log_level,
        request_timeout_secs,
        user_agent,
        max_results_per_query,
        search_region,
        max_text_length,
        search_max_retries,
        search_retry_backoff_ms,
        inter_query_delay_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
