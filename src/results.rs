use serde::{Deserialize, Serialize};

/// Placeholder stored in every field that could not be determined
pub const NO_DATA: &str = "No data";

/// Raw page content as handed over by the fetch stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    /// URL the page was loaded from
    pub url: String,

    /// Page markup, `None` when the fetch failed
    pub markup: Option<String>,
}

impl RawPage {
    /// Create a page that was fetched successfully
    pub fn new(url: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            markup: Some(markup.into()),
        }
    }

    /// Create a page whose fetch failed
    pub fn failed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            markup: None,
        }
    }

    /// Markup that is present and not blank
    pub fn usable_markup(&self) -> Option<&str> {
        self.markup.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Text rendering of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Document title, `"No title"` when the page has none
    pub title: String,

    /// Title header followed by the rendered page text
    pub body: String,
}

impl NormalizedText {
    /// The header every body starts with
    pub fn header(title: &str) -> String {
        format!("# {}\n\n", title)
    }

    /// Whether the page contributed no text beyond its title header
    pub fn is_blank(&self) -> bool {
        let header = Self::header(&self.title);
        self.body
            .strip_prefix(header.as_str())
            .unwrap_or(&self.body)
            .trim()
            .is_empty()
    }
}

/// Opinion extracted from one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub site_name: String,
    pub rating: String,
    pub pros: String,
    pub cons: String,
}

impl SourceRecord {
    /// Create a record from extracted fields
    pub fn new(
        site_name: impl Into<String>,
        rating: impl Into<String>,
        pros: impl Into<String>,
        cons: impl Into<String>,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            rating: rating.into(),
            pros: pros.into(),
            cons: cons.into(),
        }
    }

    /// Record for a source nothing could be extracted from
    pub fn no_data(site_name: impl Into<String>) -> Self {
        Self::new(site_name, NO_DATA, NO_DATA, NO_DATA)
    }

    pub fn is_no_data(&self) -> bool {
        self.rating == NO_DATA && self.pros == NO_DATA && self.cons == NO_DATA
    }
}
