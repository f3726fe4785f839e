use crate::game::GamePolicy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_REWRITE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_REWRITE_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

pub struct Config {
    pub port: u16,
    pub catalog_path: PathBuf,
    pub policy: GamePolicy,
    /// Sessions idle longer than this are evicted. `None` keeps them forever.
    pub session_idle_timeout: Option<Duration>,
    pub sweep_interval: Duration,
    pub rewrite: Option<RewriteConfig>,
    pub embedding: Option<EmbeddingConfig>,
}

/// OpenAI-compatible chat endpoint used to restyle outgoing messages
#[derive(Debug, Clone)]
pub struct RewriteConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
    pub cache_size: usize,
}

/// OpenAI-compatible embeddings endpoint. When absent the local trigram embedder is used.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source. Unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = GamePolicy::default();

        let policy = GamePolicy {
            max_attempts: parsed(&get, "MAX_ATTEMPTS", defaults.max_attempts),
            hint_start_at: parsed(&get, "HINT_START_AT", defaults.hint_start_at),
            max_hints: parsed(&get, "MAX_HINTS", defaults.max_hints),
            match_threshold: parsed(&get, "MATCH_THRESHOLD", defaults.match_threshold),
            very_close_threshold: parsed(
                &get,
                "VERY_CLOSE_THRESHOLD",
                defaults.very_close_threshold,
            ),
            top_k: parsed(&get, "MATCH_TOP_K", defaults.top_k),
        };

        let rewrite = get("REWRITE_API_KEY").map(|api_key| RewriteConfig {
            api_url: get("REWRITE_API_URL").unwrap_or_else(|| DEFAULT_REWRITE_URL.to_string()),
            api_key,
            model: get("REWRITE_MODEL").unwrap_or_else(|| DEFAULT_REWRITE_MODEL.to_string()),
            timeout: Duration::from_millis(parsed(&get, "REWRITE_TIMEOUT_MS", 5_000)),
            cache_size: parsed(&get, "REWRITE_CACHE_SIZE", 512),
        });

        let embedding = get("EMBEDDING_API_URL").map(|api_url| EmbeddingConfig {
            api_url,
            api_key: get("EMBEDDING_API_KEY"),
            model: get("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            timeout: Duration::from_millis(parsed(&get, "EMBEDDING_TIMEOUT_MS", 10_000)),
        });

        Self {
            port: parsed(&get, "PORT", 3000),
            catalog_path: get("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("football_players_full.csv")),
            policy,
            session_idle_timeout: get("SESSION_IDLE_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs),
            // tokio intervals reject a zero period
            sweep_interval: Duration::from_secs(
                Some(parsed(&get, "SESSION_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS))
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
            ),
            rewrite,
            embedding,
        }
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parsed<T, G>(get: &G, key: &str, default: T) -> T
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_original_game_rules() {
        let config = config_from(&[]);

        assert_eq!(config.port, 3000);
        assert_eq!(config.policy, GamePolicy::default());
        assert_eq!(config.policy.max_attempts, 5);
        assert_eq!(config.policy.hint_start_at, 3);
        assert_eq!(config.policy.max_hints, 2);
        assert_eq!(config.policy.top_k, 2);
        assert!(config.session_idle_timeout.is_none());
        assert!(config.rewrite.is_none());
        assert!(config.embedding.is_none());
    }

    #[test]
    fn policy_values_are_read_from_lookup() {
        let config = config_from(&[
            ("MAX_ATTEMPTS", "8"),
            ("HINT_START_AT", "2"),
            ("MAX_HINTS", "3"),
            ("MATCH_THRESHOLD", "0.8"),
            ("MATCH_TOP_K", "4"),
            ("SESSION_IDLE_TIMEOUT_SECS", "900"),
        ]);

        assert_eq!(config.policy.max_attempts, 8);
        assert_eq!(config.policy.hint_start_at, 2);
        assert_eq!(config.policy.max_hints, 3);
        assert_eq!(config.policy.match_threshold, 0.8);
        assert_eq!(config.policy.top_k, 4);
        assert_eq!(config.session_idle_timeout, Some(Duration::from_secs(900)));
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "not-a-port"), ("MAX_ATTEMPTS", "")]);

        assert_eq!(config.port, 3000);
        assert_eq!(config.policy.max_attempts, 5);
    }

    #[test]
    fn zero_sweep_interval_falls_back_to_default() {
        let config = config_from(&[
            ("SESSION_IDLE_TIMEOUT_SECS", "300"),
            ("SESSION_SWEEP_INTERVAL_SECS", "0"),
        ]);

        assert_eq!(config.sweep_interval, Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS));
        assert_eq!(config.session_idle_timeout, Some(Duration::from_secs(300)));

        let config = config_from(&[("SESSION_SWEEP_INTERVAL_SECS", "5")]);
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
    }

    #[test]
    fn rewrite_is_enabled_by_api_key() {
        let config = config_from(&[("REWRITE_API_KEY", "secret"), ("REWRITE_CACHE_SIZE", "16")]);

        let rewrite = config.rewrite.unwrap();
        assert_eq!(rewrite.api_key, "secret");
        assert_eq!(rewrite.api_url, DEFAULT_REWRITE_URL);
        assert_eq!(rewrite.model, DEFAULT_REWRITE_MODEL);
        assert_eq!(rewrite.cache_size, 16);
    }

    #[test]
    fn embedding_service_is_enabled_by_url() {
        let config = config_from(&[("EMBEDDING_API_URL", "http://localhost:8080/v1")]);

        let embedding = config.embedding.unwrap();
        assert_eq!(embedding.api_url, "http://localhost:8080/v1");
        assert_eq!(embedding.model, DEFAULT_EMBEDDING_MODEL);
        assert!(embedding.api_key.is_none());
    }
}
