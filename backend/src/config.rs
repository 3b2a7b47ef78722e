use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub inference: InferenceConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings for the hosted chat-completion endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Base URL of an OpenRouter-compatible API. Point this at an alternate
    /// directly-hosted backend to bypass the default provider.
    pub api_base: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Request timeout in seconds (default: 10)
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
    /// Never read from the config file: environment only (OPENROUTER_API_KEY).
    #[serde(skip)]
    pub api_key: String,
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from config.toml file (explicit path, or conf/config.toml lookup)
    /// 2. Override with environment variables
    /// 3. Validate the final configuration
    pub fn load(path: Option<&str>) -> Result<Self, anyhow::Error> {
        // 1. Load from config file
        let config_path = match path {
            Some(p) => Some(p.to_string()),
            None => Self::find_config_file(),
        };
        let mut config = if let Some(config_path) = config_path {
            Self::from_toml(&config_path)?
        } else {
            tracing::warn!("Configuration file not found, using defaults");
            Config::default()
        };

        // 2. Override with environment variables
        config.apply_env_overrides();

        // 3. Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8080)
    /// - OPENROUTER_API_KEY: Inference provider API key (no default; required
    ///   for live inference, requests degrade to the fallback reply without it)
    /// - APP_INFERENCE_API_BASE: Chat-completion base URL (default:
    ///   https://openrouter.ai/api/v1)
    /// - APP_INFERENCE_MODEL: Model identifier
    /// - APP_INFERENCE_TIMEOUT: Request timeout (accepts "10", "10s", "1m")
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,nexa_companion=debug")
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Ok(port) = std::env::var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            self.inference.api_key = key;
            tracing::info!("Loaded inference API key from env");
        }

        if let Ok(base) = std::env::var("APP_INFERENCE_API_BASE") {
            self.inference.api_base = base;
            tracing::info!("Override inference.api_base from env: {}", self.inference.api_base);
        }

        if let Ok(model) = std::env::var("APP_INFERENCE_MODEL") {
            self.inference.model = model;
            tracing::info!("Override inference.model from env: {}", self.inference.model);
        }

        if let Ok(timeout) = std::env::var("APP_INFERENCE_TIMEOUT") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.inference.timeout_secs = val;
                    tracing::info!(
                        "Override inference.timeout_secs from env: {}",
                        self.inference.timeout_secs
                    );
                },
                Err(e) => tracing::warn!(
                    "Invalid APP_INFERENCE_TIMEOUT '{}': {} (keep {})",
                    timeout,
                    e,
                    self.inference.timeout_secs
                ),
            }
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), anyhow::Error> {
        // Warn if running without an inference key: the companion will only
        // ever answer with the fallback message.
        if self.inference.api_key.is_empty() {
            tracing::warn!("⚠️  WARNING: No inference API key configured!");
            tracing::warn!("⚠️  Set the OPENROUTER_API_KEY environment variable.");
            tracing::warn!("⚠️  Every chat request will receive the fallback reply.");
        }

        // Validate server port
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        // Validate inference settings
        if self.inference.api_base.is_empty() {
            anyhow::bail!("inference.api_base cannot be empty");
        }
        if !self.inference.api_base.starts_with("http") {
            anyhow::bail!("inference.api_base must be an http(s) URL");
        }
        if !(0.0..=2.0).contains(&self.inference.temperature) {
            anyhow::bail!("inference.temperature must be within 0.0..=2.0");
        }
        if self.inference.max_tokens == 0 {
            anyhow::bail!("inference.max_tokens must be > 0");
        }
        if self.inference.timeout_secs == 0 {
            anyhow::bail!("inference.timeout_secs must be > 0");
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_base: "https://openrouter.ai/api/v1".to_string(),
            model: "google/gemini-2.0-flash-exp:free".to_string(),
            temperature: 0.7,
            max_tokens: 512,
            timeout_secs: 10,
            api_key: String::new(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:63342".to_string(),
                "https://nexahealth.vercel.app".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,nexa_companion=debug".to_string(),
            file: Some("logs/nexa-companion.log".to_string()),
        }
    }
}

// =========================
// Helpers for parsing values
// =========================

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Ok(n),
        "m" | "min" | "mins" | "minute" | "minutes" => Ok(n * 60),
        "h" | "hr" | "hour" | "hours" => Ok(n * 60 * 60),
        _ => Err(format!("unsupported unit: {}", unit)),
    }
}

// Custom serde deserializer to support numeric or human-friendly string values
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '10s', '1m'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
        fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(&v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_to_secs() {
        assert_eq!(parse_duration_to_secs("10"), Ok(10));
        assert_eq!(parse_duration_to_secs("10s"), Ok(10));
        assert_eq!(parse_duration_to_secs("2m"), Ok(120));
        assert_eq!(parse_duration_to_secs("1h"), Ok(3600));
        assert!(parse_duration_to_secs("soon").is_err());
        assert!(parse_duration_to_secs("10d").is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.inference.timeout().as_secs(), 10);
    }

    #[test]
    fn test_toml_round_trip() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9090

            [inference]
            model = "mistralai/mistral-7b-instruct"
            timeout_secs = "15s"
            "#,
        )
        .expect("config parses");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.inference.model, "mistralai/mistral-7b-instruct");
        assert_eq!(config.inference.timeout_secs, 15);
        // Untouched sections keep their defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.inference.max_tokens, 512);
    }
}
