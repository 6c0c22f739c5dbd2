use crate::config::ModelConfig;
use crate::error::InferenceError;
use crate::llm::{CompletionRequest, InferenceContext, ModelBackend};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};

/// Backend for a llama.cpp server reachable over HTTP
///
/// Inference is blocking and has no request timeout; call it from a
/// blocking thread.
#[derive(Debug, Clone)]
pub struct LlamaServer {
    client: Client,
}

/// Context bound to one llama.cpp server
#[derive(Debug)]
pub struct LlamaContext {
    client: Client,
    base_url: String,
    slot: Option<u32>,
    completions: usize,
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "no_stop")]
    stop: &'a [String],
    cache_prompt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_slot: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct ServerProps {
    #[serde(default)]
    model_path: Option<String>,
    #[serde(default)]
    default_generation_settings: Option<GenerationSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerationSettings {
    #[serde(default)]
    n_ctx: Option<usize>,
}

impl LlamaServer {
    pub fn new() -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| InferenceError::Backend(format!("could not build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl ModelBackend for LlamaServer {
    type Context = LlamaContext;

    fn load(&self, config: &ModelConfig) -> Result<LlamaContext, InferenceError> {
        let url = endpoint(&config.server_url, "props");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| InferenceError::Transport {
                url: url.clone(),
                source,
            })?;
        let props: ServerProps = check_status(&url, response)?
            .json()
            .map_err(|e| InferenceError::Malformed(format!("{} props: {}", url, e)))?;

        for warning in compare_props(&props, config) {
            ::log::warn!("{}", warning);
        }

        Ok(LlamaContext {
            client: self.client.clone(),
            base_url: config.server_url.clone(),
            slot: config.slot,
            completions: 0,
        })
    }
}

impl InferenceContext for LlamaContext {
    fn complete(&mut self, request: &CompletionRequest) -> Result<String, InferenceError> {
        let url = endpoint(&self.base_url, "completion");
        let body = completion_body(request, self.slot);

        ::log::trace!(
            "POST {} ({} prompt chars, n_predict {})",
            url,
            request.prompt.len(),
            body.n_predict
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|source| InferenceError::Transport {
                url: url.clone(),
                source,
            })?;
        let completion: CompletionResponse = check_status(&url, response)?
            .json()
            .map_err(|e| InferenceError::Malformed(format!("{} completion: {}", url, e)))?;

        self.completions += 1;
        Ok(completion.content)
    }

    fn reset(&mut self) -> Result<(), InferenceError> {
        // Requests are sent with cache_prompt off, so only a pinned slot holds state
        if let Some(slot) = self.slot {
            let url = format!(
                "{}?action=erase",
                endpoint(&self.base_url, &format!("slots/{}", slot))
            );
            let response = self
                .client
                .post(&url)
                .send()
                .map_err(|source| InferenceError::Transport {
                    url: url.clone(),
                    source,
                })?;
            check_status(&url, response)?;
            ::log::trace!("Erased llama.cpp slot {}", slot);
        }
        self.completions = 0;
        Ok(())
    }

    fn close(self) -> Result<(), InferenceError> {
        ::log::trace!(
            "Closing llama.cpp context for {} ({} completions since last reset)",
            self.base_url,
            self.completions
        );
        Ok(())
    }
}

fn no_stop(stop: &&[String]) -> bool {
    stop.is_empty()
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

fn completion_body(request: &CompletionRequest, slot: Option<u32>) -> CompletionBody<'_> {
    CompletionBody {
        prompt: &request.prompt,
        n_predict: request.sampling.max_tokens,
        temperature: request.sampling.temperature,
        top_p: request.sampling.top_p,
        stop: &request.stop,
        cache_prompt: false,
        id_slot: slot,
    }
}

fn check_status(url: &str, response: Response) -> Result<Response, InferenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(InferenceError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Mismatches between what the server reports and what the config expects
fn compare_props(props: &ServerProps, config: &ModelConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if let (Some(expected), Some(loaded)) = (&config.model_path, &props.model_path) {
        if !loaded.ends_with(expected.as_str()) && !expected.ends_with(loaded.as_str()) {
            warnings.push(format!(
                "Model server has {} loaded, expected {}",
                loaded, expected
            ));
        }
    }

    let server_ctx = props
        .default_generation_settings
        .as_ref()
        .and_then(|settings| settings.n_ctx);
    if let Some(n_ctx) = server_ctx {
        if n_ctx < config.context_size {
            warnings.push(format!(
                "Model server context is {} tokens, smaller than the configured {}",
                n_ctx, config.context_size
            ));
        }
    }

    warnings
}
