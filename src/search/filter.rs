use regex::Regex;
use url::Url;

/// Hosts that only ever link back into the search engine itself
const SEARCH_HOSTS: &[&str] = &["duckduckgo.com", "html.duckduckgo.com"];

/// Decides which search results are worth fetching
#[derive(Debug)]
pub struct ResultFilter {
    exclude_regexes: Vec<Regex>,
}

impl ResultFilter {
    /// Create a filter from regex exclude patterns
    pub fn new(exclude_patterns: &[String]) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }
        Ok(Self { exclude_regexes })
    }

    /// Whether a result URL points at a page that can be analyzed
    pub fn accepts(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        match url.host_str() {
            Some(host) if SEARCH_HOSTS.contains(&host) => return false,
            None => return false,
            _ => {}
        }

        let url_str = url.as_str();
        for regex in &self.exclude_regexes {
            if regex.is_match(url_str) {
                ::log::debug!("Result filter rejected: {}", url_str);
                return false;
            }
        }

        true
    }

    /// Create a normalized version of the URL (e.g., removing fragments)
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }
}
