use std::env;
use std::str::FromStr;

/// Process-wide configuration, read once at startup and passed explicitly
/// into the pieces that need it. Nothing re-reads the environment after
/// `from_env` returns.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address for the web server.
    pub host: String,
    pub port: u16,
    /// Port for the Prometheus exporter, 0 disables it.
    pub metrics_port: u16,
    /// Upper bound on the multipart payload (the image dominates it).
    pub max_upload_bytes: usize,
    /// Base URL of the OpenAI-compatible inference backend.
    pub base_url: String,
    /// Read for completeness; not attached to outbound requests yet.
    pub api_key: String,
    pub model: String,
    pub default_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Include the full error chain on rendered error pages.
    pub show_error_details: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            host: env_str("APP_HOST", "0.0.0.0"),
            port: env_parse("APP_PORT", 8080),
            metrics_port: env_parse("METRICS_PORT", 9090),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 25 * 1024 * 1024),
            base_url: env_str("VLLM_BASE_URL", ""),
            api_key: env_str("VLLM_API_KEY", ""),
            model: env_str("VLLM_MODEL", "qwen3-vl-4b-instruct"),
            default_prompt: env_str("VLLM_DEFAULT_PROMPT", "Describe the image."),
            max_tokens: env_parse("VLLM_MAX_TOKENS", 512),
            temperature: env_parse("VLLM_TEMPERATURE", 0.2),
            show_error_details: env_flag("SHOW_ERROR_DETAILS"),
        }
    }
}

fn env_str(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations cannot race a parallel reader.
    #[test]
    fn from_env_reads_overrides_then_defaults() {
        env::set_var("APP_HOST", "127.0.0.1");
        env::set_var("APP_PORT", "9000");
        env::set_var("METRICS_PORT", "0");
        env::set_var("MAX_UPLOAD_BYTES", "1024");
        env::set_var("VLLM_BASE_URL", "http://backend:8000");
        env::set_var("VLLM_API_KEY", "secret");
        env::set_var("VLLM_MODEL", "test-model");
        env::set_var("VLLM_DEFAULT_PROMPT", "What is this?");
        env::set_var("VLLM_MAX_TOKENS", "128");
        env::set_var("VLLM_TEMPERATURE", "0.7");
        env::set_var("SHOW_ERROR_DETAILS", "true");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.metrics_port, 0);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.base_url, "http://backend:8000");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.default_prompt, "What is this?");
        assert_eq!(config.max_tokens, 128);
        assert_eq!(config.temperature, 0.7);
        assert!(config.show_error_details);

        // Unparseable values fall back rather than failing startup.
        env::set_var("APP_PORT", "not-a-port");
        env::set_var("SHOW_ERROR_DETAILS", "maybe");
        let config = AppConfig::from_env();
        assert_eq!(config.port, 8080);
        assert!(!config.show_error_details);

        for key in [
            "APP_HOST",
            "APP_PORT",
            "METRICS_PORT",
            "MAX_UPLOAD_BYTES",
            "VLLM_BASE_URL",
            "VLLM_API_KEY",
            "VLLM_MODEL",
            "VLLM_DEFAULT_PROMPT",
            "VLLM_MAX_TOKENS",
            "VLLM_TEMPERATURE",
            "SHOW_ERROR_DETAILS",
        ] {
            env::remove_var(key);
        }

        let config = AppConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.metrics_port, 9090);
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(config.base_url, "");
        assert_eq!(config.api_key, "");
        assert_eq!(config.model, "qwen3-vl-4b-instruct");
        assert_eq!(config.default_prompt, "Describe the image.");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.temperature, 0.2);
        assert!(!config.show_error_details);
    }
}
