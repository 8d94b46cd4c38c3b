// ChunkReview CLI library

pub mod app;
pub mod args;
pub mod error;
pub mod logging;
pub mod output;

pub use args::Cli;
pub use error::{CliError, CliResult};
