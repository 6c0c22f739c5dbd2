use thiserror::Error;

/// Failure of a model backend call
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model server request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("model server at {url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("model backend error: {0}")]
    Backend(String),
}

/// Failure loading pipeline configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Failure that aborts the whole pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("conclusion generation failed: {0}")]
    Conclusion(#[source] InferenceError),

    #[error("model backend unavailable: {0}")]
    Backend(#[source] InferenceError),

    #[error("no WebDriver server reachable at {0}")]
    WebDriver(String),

    #[error("analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
