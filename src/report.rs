use crate::config::ModelConfig;
use crate::error::{InferenceError, PipelineError};
use crate::extraction::prompts;
use crate::llm::{CompletionRequest, LoadedModel, ModelBackend, SamplingParams};
use crate::results::SourceRecord;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Exploratory decoding for the closing summary
pub const CONCLUSION_SAMPLING: SamplingParams = SamplingParams {
    max_tokens: 512,
    temperature: 0.7,
    top_p: 0.5,
};

/// Bullets of each kind quoted in the conclusion prompt
const MAX_PROMPT_BULLETS: usize = 5;

static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(\.\d+)?").expect("valid numeral pattern"));

/// Summary of all sources for one product
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub product_name: String,
    pub average_rating: Option<f64>,
    pub records: Vec<SourceRecord>,
    pub conclusion: String,
}

impl AggregateReport {
    /// Computes the average rating and asks the model for a conclusion
    ///
    /// A failing conclusion query fails the whole report.
    pub fn build<B: ModelBackend>(
        product_name: &str,
        records: Vec<SourceRecord>,
        backend: &B,
        config: &ModelConfig,
    ) -> Result<Self, PipelineError> {
        let average_rating = average_rating(&records);
        let rating_text = rating_text(average_rating);
        let (pros, cons) = collect_bullets(&records);

        ::log::info!(
            "Average rating for {} across {} sources: {}",
            product_name,
            records.len(),
            rating_text
        );

        let prompt = prompts::conclusion(product_name, &rating_text, &pros, &cons);
        let conclusion =
            generate_conclusion(backend, config, &prompt).map_err(PipelineError::Conclusion)?;

        Ok(Self {
            product_name: product_name.to_string(),
            average_rating,
            records,
            conclusion,
        })
    }

    /// Renders the report as markdown
    pub fn render(&self) -> String {
        let mut out = format!(
            "# Product Analysis Summary for {}\n\n",
            self.product_name
        );
        out.push_str(&format!(
            "**Average Rating:** {}\n\n",
            rating_text(self.average_rating)
        ));
        out.push_str("## Detailed Analysis by Source\n\n");
        out.push_str("| Site | Rating | Pros | Cons |\n");
        out.push_str("|------|--------|------|------|\n");

        for record in &self.records {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                table_cell(&record.site_name),
                table_cell(&record.rating.replace('\n', " ")),
                bullet_cell(&record.pros, "✓ "),
                bullet_cell(&record.cons, "✗ "),
            ));
        }

        out.push_str("\n## Conclusion\n\n");
        out.push_str(&self.conclusion);
        out
    }
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// First numeral found in a rating answer
pub fn parse_rating_value(rating: &str) -> Option<f64> {
    NUMERAL
        .find(rating)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Mean of every rating that contains a numeral, `None` when none do
pub fn average_rating(records: &[SourceRecord]) -> Option<f64> {
    let values = records
        .iter()
        .filter_map(|record| parse_rating_value(&record.rating))
        .collect::<Vec<_>>();

    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// `X.X/10`, or `Unknown` without an average
pub fn rating_text(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("{:.1}/10", value),
        None => "Unknown".to_string(),
    }
}

/// First pros and cons bullets across all records, markers stripped
///
/// Fields containing `"No "` are skipped as a whole; this also drops
/// answers such as "No issues found" that carry real content.
pub fn collect_bullets(records: &[SourceRecord]) -> (Vec<String>, Vec<String>) {
    let pros = records
        .iter()
        .flat_map(|record| bullet_lines(&record.pros))
        .take(MAX_PROMPT_BULLETS)
        .collect();
    let cons = records
        .iter()
        .flat_map(|record| bullet_lines(&record.cons))
        .take(MAX_PROMPT_BULLETS)
        .collect();
    (pros, cons)
}

fn bullet_lines(field: &str) -> Vec<String> {
    if field.contains("No ") {
        return Vec::new();
    }
    field
        .lines()
        .map(|line| line.trim().trim_start_matches(['*', ' ']).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn generate_conclusion<B: ModelBackend>(
    backend: &B,
    config: &ModelConfig,
    prompt: &str,
) -> Result<String, InferenceError> {
    let mut model: LoadedModel<B::Context> = LoadedModel::load(backend, config)?;
    let request = CompletionRequest::new(prompt, CONCLUSION_SAMPLING);
    let response = model.complete(&request)?;
    Ok(response.trim().to_string())
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn bullet_cell(text: &str, glyph: &str) -> String {
    table_cell(&text.replace('\n', "<br>").replace("* ", glyph))
}
