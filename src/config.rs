use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::logger::LogLevel;

/// Value shipped in demo secret stores in place of a real key.
pub const DEMO_API_KEY_SENTINEL: &str = "DUMMY_KEY_FOR_DEMO_COMPLETION_002";
pub const DEFAULT_MODEL: &str = "nano-banana";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct GenerationApiConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub use_system_proxy: bool,
}

/// Credential for the prompt-refinement service. Recorded so it can be
/// reported, but nothing calls that service yet.
#[derive(Debug, Clone, Default)]
pub struct PromptRefinementConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub generation: GenerationApiConfig,
    pub refinement: PromptRefinementConfig,
    pub images_pointer: Option<String>,
    pub log_level: Option<LogLevel>,
    /// Where the demo binary saves artifacts; nothing is saved when unset.
    pub output_dir: Option<PathBuf>,
}

impl Default for GenerationApiConfig {
    fn default() -> Self {
        GenerationApiConfig {
            api_key: None,
            endpoint: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_system_proxy: true,
        }
    }
}

impl GenerationApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout = non_blank("NANOBANANA_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        GenerationApiConfig {
            api_key: non_blank("NANOBANANA_API_KEY"),
            endpoint: non_blank("NANOBANANA_ENDPOINT"),
            model: non_blank("NANOBANANA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout,
            use_system_proxy: true,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ignore `HTTP_PROXY`-style environment settings.
    pub fn without_system_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }

    /// The key to send, or `None` when absent, blank or the demo sentinel.
    pub fn live_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != DEMO_API_KEY_SENTINEL)
    }

    pub fn has_live_credentials(&self) -> bool {
        self.live_api_key().is_some()
    }
}

impl PromptRefinementConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        PromptRefinementConfig {
            api_key: lookup("GEMINI_API_KEY").filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            generation: GenerationApiConfig::default(),
            refinement: PromptRefinementConfig::default(),
            images_pointer: None,
            log_level: None,
            output_dir: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Config {
            generation: GenerationApiConfig::from_lookup(&lookup),
            refinement: PromptRefinementConfig::from_lookup(&lookup),
            images_pointer: non_blank("NANOBANANA_IMAGES_POINTER"),
            log_level: non_blank("CHARAGEN_LOG_LEVEL").and_then(|level| LogLevel::parse(&level)),
            output_dir: non_blank("CHARAGEN_OUTPUT_DIR").map(PathBuf::from),
        }
    }

    pub fn with_generation(mut self, config: GenerationApiConfig) -> Self {
        self.generation = config;
        self
    }

    pub fn with_refinement(mut self, config: PromptRefinementConfig) -> Self {
        self.refinement = config;
        self
    }

    pub fn with_images_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.images_pointer = Some(pointer.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = GenerationApiConfig::from_lookup(lookup_from(&[]));
        assert!(config.api_key.is_none());
        assert!(config.endpoint.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert!(!config.has_live_credentials());
    }

    #[test]
    fn test_values_from_lookup() {
        let config = GenerationApiConfig::from_lookup(lookup_from(&[
            ("NANOBANANA_API_KEY", "sk-live"),
            ("NANOBANANA_ENDPOINT", "https://images.example.com/v1/generate"),
            ("NANOBANANA_MODEL", "banana-pro"),
            ("NANOBANANA_TIMEOUT_SECS", "45"),
        ]));
        assert_eq!(config.live_api_key(), Some("sk-live"));
        assert_eq!(
            config.endpoint.as_deref(),
            Some("https://images.example.com/v1/generate")
        );
        assert_eq!(config.model, "banana-pro");
        assert_eq!(config.timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_bad_timeout_falls_back_to_default() {
        let config =
            GenerationApiConfig::from_lookup(lookup_from(&[("NANOBANANA_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_sentinel_and_blank_keys_are_not_live() {
        let sentinel = GenerationApiConfig::new().with_api_key(DEMO_API_KEY_SENTINEL);
        assert!(!sentinel.has_live_credentials());

        let blank = GenerationApiConfig::new().with_api_key("   ");
        assert!(!blank.has_live_credentials());

        let blank_env = GenerationApiConfig::from_lookup(lookup_from(&[("NANOBANANA_API_KEY", "")]));
        assert!(blank_env.api_key.is_none());
    }

    #[test]
    fn test_full_config_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("NANOBANANA_API_KEY", "sk-live"),
            ("GEMINI_API_KEY", "gm-key"),
            ("NANOBANANA_IMAGES_POINTER", "/data/images"),
            ("CHARAGEN_LOG_LEVEL", "warn"),
            ("CHARAGEN_OUTPUT_DIR", "out/knights"),
        ]));
        assert!(config.generation.has_live_credentials());
        assert_eq!(config.refinement.api_key.as_deref(), Some("gm-key"));
        assert_eq!(config.images_pointer.as_deref(), Some("/data/images"));
        assert_eq!(config.log_level, Some(LogLevel::Warn));
        assert_eq!(config.output_dir, Some(PathBuf::from("out/knights")));

        let empty = Config::from_lookup(lookup_from(&[("CHARAGEN_OUTPUT_DIR", "  ")]));
        assert!(empty.output_dir.is_none());
    }
}
