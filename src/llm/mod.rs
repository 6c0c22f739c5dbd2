pub mod llama;
#[cfg(test)]
pub mod scripted;

pub use llama::LlamaServer;

use crate::config::ModelConfig;
use crate::error::InferenceError;
use serde::Serialize;

/// Decoding settings for one completion
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

/// One prompt plus everything needed to decode it
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub sampling: SamplingParams,
    pub stop: Vec<String>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, sampling: SamplingParams) -> Self {
        Self {
            prompt: prompt.into(),
            sampling,
            stop: Vec::new(),
        }
    }

    /// Add stop sequences
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop.extend(stop.into_iter().map(Into::into));
        self
    }
}

/// Something that can load an inference context for a model
pub trait ModelBackend {
    type Context: InferenceContext;

    /// Load the model described by `config`
    fn load(&self, config: &ModelConfig) -> Result<Self::Context, InferenceError>;
}

/// A loaded model, used by one session at a time
pub trait InferenceContext {
    /// Run one completion and return the generated text
    fn complete(&mut self, request: &CompletionRequest) -> Result<String, InferenceError>;

    /// Clear conversational state without unloading the model
    fn reset(&mut self) -> Result<(), InferenceError>;

    /// Release the context
    fn close(self) -> Result<(), InferenceError>
    where
        Self: Sized;
}

/// Holds a loaded context and releases it when dropped
///
/// Release resets the context and then closes it, on every exit path.
pub struct LoadedModel<C: InferenceContext> {
    context: Option<C>,
}

impl<C: InferenceContext> LoadedModel<C> {
    /// Load a context from `backend`
    pub fn load<B>(backend: &B, config: &ModelConfig) -> Result<Self, InferenceError>
    where
        B: ModelBackend<Context = C>,
    {
        let context = backend.load(config)?;
        ::log::debug!("Loaded model context from {}", config.server_url);
        Ok(Self {
            context: Some(context),
        })
    }

    pub fn complete(&mut self, request: &CompletionRequest) -> Result<String, InferenceError> {
        self.context_mut()?.complete(request)
    }

    pub fn reset(&mut self) -> Result<(), InferenceError> {
        self.context_mut()?.reset()
    }

    fn context_mut(&mut self) -> Result<&mut C, InferenceError> {
        self.context
            .as_mut()
            .ok_or_else(|| InferenceError::Backend("model context already released".to_string()))
    }

    fn release(&mut self) {
        let Some(mut context) = self.context.take() else {
            return;
        };
        if let Err(e) = context.reset() {
            ::log::warn!("Failed to reset model context: {}", e);
        }
        match context.close() {
            Ok(()) => ::log::debug!("Closed model context"),
            Err(e) => ::log::warn!("Failed to close model context: {}", e),
        }
    }
}

impl<C: InferenceContext> Drop for LoadedModel<C> {
    fn drop(&mut self) {
        self.release();
    }
}
