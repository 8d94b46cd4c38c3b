// Command-line arguments

use std::path::PathBuf;

use chunkreview_pipeline::ReviewOverrides;
use clap::Parser;

/// ChunkReview - code review for files of any size
#[derive(Parser, Debug, Clone)]
#[command(name = "chunkreview")]
#[command(bin_name = "chunkreview")]
#[command(about = "Review source files with a language model, chunked under a token budget")]
#[command(
    long_about = "ChunkReview splits source files into token-bounded chunks and sends each chunk to a language model.\n\nWith one file, every chunk is reviewed for bugs, anti-patterns and improvements.\nWith several files, each file is summarized first and the summaries are analyzed together for cross-module problems.\n\nThe API key is read from OPENAI_API_KEY (a .env file in the working directory is loaded first)."
)]
#[command(version)]
pub struct Cli {
    /// Files to analyze
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Model to use (default: gpt-4o)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Token ceiling for one chunk (default: 3000)
    #[arg(long, value_name = "TOKENS")]
    pub max_tokens_per_chunk: Option<usize>,

    /// Ceiling on generated tokens per request (default: 1500)
    #[arg(long, value_name = "TOKENS")]
    pub max_response_tokens: Option<usize>,

    /// Sampling temperature between 0.0 and 2.0 (default: 0.2)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Language the model should answer in
    #[arg(short, long)]
    pub language: Option<String>,

    /// Maximum number of requests in flight (default: 1)
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Configuration file (default: ./.chunkreview.yaml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Values given on the command line, highest configuration precedence
    pub fn overrides(&self) -> ReviewOverrides {
        ReviewOverrides {
            model: self.model.clone(),
            max_tokens_per_chunk: self.max_tokens_per_chunk,
            max_response_tokens: self.max_response_tokens,
            temperature: self.temperature,
            response_language: self.language.clone(),
            max_concurrency: self.concurrency,
        }
    }
}
