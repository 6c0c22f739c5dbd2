use crate::config::FetchConfig;
use crate::error::PipelineError;
use crate::pipeline::{Source, SourceState};
use crate::results::RawPage;
use crate::search::SearchHit;
use fantoccini::{Client, ClientBuilder};
use tokio::time::{Duration, sleep, timeout};

/// Alternative WebDriver endpoints tried when the configured one is down
const FALLBACK_URLS: &[&str] = &[
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// One WebDriver session shared by the search and fetch phases
pub struct Browser {
    client: Client,
    config: FetchConfig,
}

impl Browser {
    /// Connects to the configured WebDriver server, falling back to common defaults
    pub async fn connect(config: &FetchConfig) -> Result<Self, PipelineError> {
        let client = connect_to_webdriver(&config.webdriver_url)
            .await
            .ok_or_else(|| PipelineError::WebDriver(config.webdriver_url.clone()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Page source of `url` right after navigation, `None` on failure
    pub async fn source_of(&self, url: &str) -> Option<String> {
        let loaded = timeout(self.page_timeout(), async {
            self.client.goto(url).await?;
            self.client.source().await
        })
        .await;

        match loaded {
            Ok(Ok(source)) => Some(source),
            Ok(Err(e)) => {
                ::log::error!("Error loading {}: {}", url, e);
                None
            }
            Err(_) => {
                ::log::error!("Timeout loading: {}", url);
                None
            }
        }
    }

    /// Loads `url`, scrolls to the bottom and waits for lazy content
    ///
    /// Returns the final page source, or `None` when any step fails.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        let started = std::time::Instant::now();
        ::log::debug!("FETCH: {}", url);

        let settle = Duration::from_millis(self.config.settle_millis);
        let loaded = timeout(self.page_timeout() + settle, async {
            self.client.goto(url).await?;
            self.client.execute(SCROLL_TO_BOTTOM, vec![]).await?;
            sleep(settle).await;
            self.client.source().await
        })
        .await;

        match loaded {
            Ok(Ok(source)) => {
                ::log::debug!(
                    "Fetched {} ({} bytes) in {:.2} seconds",
                    url,
                    source.len(),
                    started.elapsed().as_secs_f64()
                );
                Some(source)
            }
            Ok(Err(e)) => {
                ::log::error!("Error fetching {}: {}", url, e);
                None
            }
            Err(_) => {
                ::log::error!("Timeout fetching: {}", url);
                None
            }
        }
    }

    /// Fetches every hit in order; failed fetches become pages without markup
    pub async fn fetch_all(&self, hits: &[SearchHit]) -> Vec<Source> {
        let mut sources = Vec::with_capacity(hits.len());
        for hit in hits {
            ::log::debug!(
                "Source {}: {} -> {}",
                hit.display_name,
                SourceState::Idle,
                SourceState::Fetching
            );
            let page = match self.fetch(&hit.url).await {
                Some(markup) => RawPage::new(&hit.url, markup),
                None => RawPage::failed(&hit.url),
            };
            sources.push(Source::new(&hit.display_name, page));
        }
        sources
    }

    /// Ends the WebDriver session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }

    fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.config.page_timeout_secs)
    }
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(webdriver_url: &str) -> Option<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                webdriver_url,
                e
            );
        }
    }

    for url in FALLBACK_URLS.iter().filter(|url| **url != webdriver_url) {
        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    None
}
