use crate::config::AnalysisConfig;
use crate::error::PipelineError;
use crate::extraction::{ExtractionSession, Stage};
use crate::llm::ModelBackend;
use crate::parsers;
use crate::report::AggregateReport;
use crate::results::{RawPage, SourceRecord};
use std::fmt;

/// A fetched page and the name it is reported under
#[derive(Debug, Clone)]
pub struct Source {
    pub display_name: String,
    pub page: RawPage,
}

impl Source {
    pub fn new(display_name: impl Into<String>, page: RawPage) -> Self {
        Self {
            display_name: display_name.into(),
            page,
        }
    }
}

/// Where one source is in its trip through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    Idle,
    Fetching,
    Normalizing,
    Extracting(Stage),
    Done,
    Degraded,
}

impl fmt::Display for SourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceState::Idle => f.write_str("idle"),
            SourceState::Fetching => f.write_str("fetching"),
            SourceState::Normalizing => f.write_str("normalizing"),
            SourceState::Extracting(stage) => write!(f, "extracting {}", stage),
            SourceState::Done => f.write_str("done"),
            SourceState::Degraded => f.write_str("degraded"),
        }
    }
}

/// Tracks and logs the state of one source
struct Progress<'a> {
    name: &'a str,
    state: SourceState,
}

impl<'a> Progress<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            state: SourceState::Idle,
        }
    }

    fn enter(&mut self, next: SourceState) {
        ::log::debug!("Source {}: {} -> {}", self.name, self.state, next);
        self.state = next;
    }
}

/// Analyzes every source in order and builds the aggregate report
///
/// Sources are handled one at a time with at most one model context alive.
/// A source that cannot be analyzed gets a "No data" record; only a failing
/// conclusion query fails the pipeline.
pub fn run_pipeline<B: ModelBackend>(
    product_name: &str,
    sources: Vec<Source>,
    backend: &B,
    config: &AnalysisConfig,
) -> Result<AggregateReport, PipelineError> {
    let product_name = product_name.trim();
    ::log::info!(
        "Analyzing {} sources for product: {}",
        sources.len(),
        product_name
    );

    let mut records = Vec::with_capacity(sources.len());
    for (index, source) in sources.into_iter().enumerate() {
        let record = analyze_source(product_name, source, backend, config);
        ::log::info!(
            "Source {} ({}): rating {:?}",
            index + 1,
            record.site_name,
            record.rating
        );
        records.push(record);
    }

    AggregateReport::build(product_name, records, backend, &config.model)
}

/// Produces the record for one source, degrading to "No data" on any failure
pub fn analyze_source<B: ModelBackend>(
    product_name: &str,
    source: Source,
    backend: &B,
    config: &AnalysisConfig,
) -> SourceRecord {
    let Source { display_name, page } = source;
    let mut progress = Progress::new(&display_name);

    let Some(markup) = page.usable_markup() else {
        ::log::warn!("No content fetched from {}, skipping analysis", page.url);
        progress.enter(SourceState::Degraded);
        return SourceRecord::no_data(display_name.as_str());
    };

    progress.enter(SourceState::Normalizing);
    let normalized = parsers::normalize(markup);
    if normalized.is_blank() {
        ::log::warn!("No text left in {} after normalization", page.url);
        progress.enter(SourceState::Degraded);
        return SourceRecord::no_data(display_name.as_str());
    }
    let normalized = parsers::bound(normalized, config.content_limit);

    let outcome = ExtractionSession::open(backend, &config.model).and_then(|session| {
        session.analyze_observed(&normalized.body, product_name, |stage| {
            progress.enter(SourceState::Extracting(stage))
        })
    });

    match outcome {
        Ok(extraction) => {
            progress.enter(SourceState::Done);
            SourceRecord::new(
                display_name.as_str(),
                extraction.rating,
                extraction.pros,
                extraction.cons,
            )
        }
        Err(e) => {
            ::log::error!("Analysis of {} failed: {}", page.url, e);
            progress.enter(SourceState::Degraded);
            SourceRecord::no_data(display_name.as_str())
        }
    }
}
