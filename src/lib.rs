pub mod config;
pub mod crawlers;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod parsers;
pub mod pipeline;
pub mod report;
pub mod results;
pub mod search;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::PipelineConfig;
pub use error::{ConfigError, InferenceError, PipelineError};
pub use pipeline::{Source, run_pipeline};
pub use report::AggregateReport;
pub use results::{NormalizedText, RawPage, SourceRecord};

use crawlers::Browser;
use llm::LlamaServer;

/// Main builder for a product review digest
pub struct ReviewDigest {
    product: String,
    config: PipelineConfig,
}

impl ReviewDigest {
    /// Create a builder for the given product with default settings
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            config: PipelineConfig::default(),
        }
    }

    /// Set the maximum number of sources to analyze
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.config.search.max_results = max_results;
        self
    }

    /// Set the WebDriver server used for search and fetch
    pub fn with_webdriver_url(mut self, webdriver_url: impl Into<String>) -> Self {
        self.config.fetch.webdriver_url = webdriver_url.into();
        self
    }

    /// Set the llama.cpp server used for analysis
    pub fn with_model_url(mut self, server_url: impl Into<String>) -> Self {
        self.config.analysis.model.server_url = server_url.into();
        self
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = PipelineConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Search, fetch every source, then analyze them against the local model
    ///
    /// The browser session is closed before analysis starts. Analysis runs on
    /// a blocking thread.
    pub async fn run(self) -> Result<AggregateReport, PipelineError> {
        let Self { product, config } = self;
        let product = product.trim().to_string();

        let browser = Browser::connect(&config.fetch).await?;
        let sources = match search::search(&browser, &product, &config.search).await {
            Ok(hits) => {
                if hits.is_empty() {
                    ::log::warn!("No sources found for {}", product);
                }
                browser.fetch_all(&hits).await
            }
            Err(e) => {
                browser.close().await;
                return Err(e);
            }
        };
        browser.close().await;

        let analysis = config.analysis;
        tokio::task::spawn_blocking(move || {
            let backend = LlamaServer::new().map_err(PipelineError::Backend)?;
            run_pipeline(&product, sources, &backend, &analysis)
        })
        .await?
    }
}
