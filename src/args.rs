use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "review-digest")]
#[command(about = "Summarizes web reviews of a product with a local language model")]
#[command(version)]
pub struct Args {
    /// Product to look up
    pub product: String,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of sources to analyze
    #[arg(short, long)]
    pub max_results: Option<usize>,

    /// WebDriver server URL (overrides WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// llama.cpp server URL (overrides LLAMA_SERVER_URL)
    #[arg(long)]
    pub model_url: Option<String>,

    /// Print the report as JSON instead of markdown
    #[arg(long)]
    pub json: bool,
}
