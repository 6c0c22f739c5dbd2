pub mod filter;

use crate::config::SearchConfig;
use crate::crawlers::web::Browser;
use crate::error::{ConfigError, PipelineError};
use crate::utils;
use filter::ResultFilter;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

static RESULT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").expect("valid result selector"));

/// One page found for the product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub display_name: String,
}

impl SearchHit {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let display_name = utils::site_name(&url);
        Self { url, display_name }
    }
}

/// Finds up to `max_results` pages about `product`
///
/// Query templates are tried in order until enough distinct pages are
/// found; fewer may come back. A query that fails to load is skipped.
pub async fn search(
    browser: &Browser,
    product: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchHit>, PipelineError> {
    let filter = ResultFilter::new(&config.exclude_patterns).map_err(ConfigError::from)?;
    let mut collector = HitCollector::new(filter, config.max_results);

    for template in &config.queries {
        if collector.is_full() {
            break;
        }

        let query = utils::fill_query(template, product);
        let search_url = match Url::parse_with_params(SEARCH_ENDPOINT, &[("q", query.as_str())]) {
            Ok(url) => url,
            Err(e) => {
                ::log::error!("Could not build search URL for '{}': {}", query, e);
                continue;
            }
        };

        ::log::info!("Searching for: {}", query);
        match browser.source_of(search_url.as_str()).await {
            Some(html) => {
                let links = parse_results(&html);
                ::log::debug!("Search '{}' returned {} links", query, links.len());
                collector.extend(links);
            }
            None => ::log::error!("Search request failed for: {}", query),
        }
    }

    let hits = collector.into_hits();
    ::log::info!("Found {} sources for {}", hits.len(), product);
    Ok(hits)
}

/// Target URLs of the organic results on a DuckDuckGo HTML results page
pub fn parse_results(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&RESULT_LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(decode_result_link)
        .collect()
}

/// Unwraps DuckDuckGo's `/l/?uddg=` redirect links
fn decode_result_link(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };
    let url = Url::parse(&absolute).ok()?;

    if url.path() == "/l/" {
        return url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned());
    }
    Some(url.to_string())
}

/// Accumulates distinct, accepted hits up to a cap
pub struct HitCollector {
    filter: ResultFilter,
    max_results: usize,
    seen: HashSet<String>,
    hits: Vec<SearchHit>,
}

impl HitCollector {
    pub fn new(filter: ResultFilter, max_results: usize) -> Self {
        Self {
            filter,
            max_results,
            seen: HashSet::new(),
            hits: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.hits.len() >= self.max_results
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, links: I) {
        for link in links {
            if self.is_full() {
                break;
            }
            let Ok(url) = Url::parse(&link) else {
                continue;
            };
            if !self.filter.accepts(&url) {
                continue;
            }
            let normalized = self.filter.normalize_url(&url).to_string();
            if self.seen.insert(normalized.clone()) {
                self.hits.push(SearchHit::new(normalized));
            }
        }
    }

    pub fn into_hits(self) -> Vec<SearchHit> {
        self.hits
    }
}
