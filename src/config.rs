use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for the local model server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the llama.cpp server
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Model file the server is expected to have loaded
    #[serde(default)]
    pub model_path: Option<String>,

    /// Context window the prompts are sized for
    #[serde(default = "default_context_size")]
    pub context_size: usize,

    /// Server slot to pin requests to; reset erases this slot
    #[serde(default)]
    pub slot: Option<u32>,
}

/// Configuration for finding review pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of sources to analyze
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Query templates tried in order, `{product}` is replaced by the product name
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,

    /// Regex patterns for result URLs to skip
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

/// Configuration for loading pages through WebDriver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Maximum time to wait for a page to load
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Time given to lazy content after scrolling to the bottom
    #[serde(default = "default_settle_millis")]
    pub settle_millis: u64,
}

/// Settings the analysis phase needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub model: ModelConfig,

    /// Maximum characters of normalized text handed to the model per source
    #[serde(default = "default_content_limit")]
    pub content_limit: usize,
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(flatten)]
    pub analysis: AnalysisConfig,
}

impl PipelineConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override endpoints from `WEBDRIVER_URL` and `LLAMA_SERVER_URL` when set
    pub fn apply_env(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.fetch.webdriver_url = webdriver_url;
            }
        }
        if let Ok(server_url) = std::env::var("LLAMA_SERVER_URL") {
            if !server_url.is_empty() {
                self.analysis.model.server_url = server_url;
            }
        }
        self
    }
}

fn default_server_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_context_size() -> usize {
    16384
}

fn default_max_results() -> usize {
    4
}

fn default_queries() -> Vec<String> {
    vec![
        "{product} review".to_string(),
        "review users {product}".to_string(),
    ]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        r"(?i)\.(jpg|jpeg|png|gif|webp|svg|pdf|mp4|mp3|zip)(\?.*)?$".to_string(),
        r"(?i)^https?://(www\.)?(youtube\.com|youtu\.be)/".to_string(),
    ]
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_page_timeout_secs() -> u64 {
    30
}

fn default_settle_millis() -> u64 {
    2000
}

/// Default maximum characters of normalized text per source
pub fn default_content_limit() -> usize {
    3000
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            model_path: None,
            context_size: default_context_size(),
            slot: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            queries: default_queries(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            page_timeout_secs: default_page_timeout_secs(),
            settle_millis: default_settle_millis(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            content_limit: default_content_limit(),
        }
    }
}
