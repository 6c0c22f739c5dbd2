pub mod parse;
pub mod prompts;

use crate::config::ModelConfig;
use crate::error::InferenceError;
use crate::llm::{CompletionRequest, InferenceContext, LoadedModel, ModelBackend, SamplingParams};
use std::fmt;

/// Near-deterministic decoding for the rating answer
pub const RATING_SAMPLING: SamplingParams = SamplingParams {
    max_tokens: 250,
    temperature: 0.1,
    top_p: 0.1,
};

/// Looser decoding for pros and cons
pub const LIST_SAMPLING: SamplingParams = SamplingParams {
    max_tokens: 250,
    temperature: 0.7,
    top_p: 0.3,
};

/// One query of the extraction protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Rating,
    Pros,
    Cons,
}

impl Stage {
    /// Stages in the order they are queried
    pub const ALL: [Stage; 3] = [Stage::Rating, Stage::Pros, Stage::Cons];

    pub fn request(self, product: &str, text: &str) -> CompletionRequest {
        let (prompt, sampling) = match self {
            Stage::Rating => (prompts::rating(product, text), RATING_SAMPLING),
            Stage::Pros => (prompts::pros(product, text), LIST_SAMPLING),
            Stage::Cons => (prompts::cons(product, text), LIST_SAMPLING),
        };
        CompletionRequest::new(prompt, sampling)
            .with_stop([prompts::QUESTION_MARKER, prompts::CONTENT_MARKER])
    }

    pub fn parse(self, response: &str) -> String {
        match self {
            Stage::Rating => parse::parse_rating(response),
            Stage::Pros | Stage::Cons => parse::parse_bullets(response),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Rating => "rating",
            Stage::Pros => "pros",
            Stage::Cons => "cons",
        };
        f.write_str(name)
    }
}

/// Fields extracted from one source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub rating: String,
    pub pros: String,
    pub cons: String,
}

impl Extraction {
    fn set(&mut self, stage: Stage, value: String) {
        match stage {
            Stage::Rating => self.rating = value,
            Stage::Pros => self.pros = value,
            Stage::Cons => self.cons = value,
        }
    }
}

/// Runs the rating/pros/cons queries for one source on one loaded model
///
/// The model is reset after each query. Dropping the session, whichever way
/// analysis ends, resets and closes the model.
pub struct ExtractionSession<C: InferenceContext> {
    model: LoadedModel<C>,
}

impl<C: InferenceContext> ExtractionSession<C> {
    /// Load a model context for a new session
    pub fn open<B>(backend: &B, config: &ModelConfig) -> Result<Self, InferenceError>
    where
        B: ModelBackend<Context = C>,
    {
        Ok(Self {
            model: LoadedModel::load(backend, config)?,
        })
    }

    /// Extract rating, pros and cons for `product` from `text`
    pub fn analyze(self, text: &str, product: &str) -> Result<Extraction, InferenceError> {
        self.analyze_observed(text, product, |_| {})
    }

    /// Like [`analyze`](Self::analyze), calling `on_stage` before each query
    ///
    /// The first failing query ends the session; later stages are not run.
    pub fn analyze_observed(
        mut self,
        text: &str,
        product: &str,
        mut on_stage: impl FnMut(Stage),
    ) -> Result<Extraction, InferenceError> {
        let mut extraction = Extraction::default();
        for stage in Stage::ALL {
            on_stage(stage);
            let value = self.run_stage(stage, text, product)?;
            extraction.set(stage, value);
        }
        Ok(extraction)
    }

    fn run_stage(&mut self, stage: Stage, text: &str, product: &str) -> Result<String, InferenceError> {
        let request = stage.request(product, text);
        let response = self.model.complete(&request)?;
        ::log::debug!("Model answered {} query with {} chars", stage, response.len());
        self.model.reset()?;
        Ok(stage.parse(&response))
    }
}
