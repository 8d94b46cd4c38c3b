// Run orchestration: configuration, credentials, pipeline

use std::sync::Arc;

use chunkreview_pipeline::{AnalysisResult, PipelineContext, PipelineSelector, ReviewConfig};
use chunkreview_providers::{
    validate_credentials, CompletionClient, ConfigurationManager, OpenAiProvider, Provider,
};
use chunkreview_tokens::TokenizerAdapter;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::args::Cli;
use crate::error::{CliError, CliResult};
use crate::output::{format_result, OutputStyle};

/// Resolve and validate the review configuration
pub fn resolve_config<F>(cli: &Cli, lookup: F) -> CliResult<ReviewConfig>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(ReviewConfig::load(cli.config.as_deref(), lookup, &cli.overrides())?)
}

/// Build the OpenAI provider from environment settings
pub fn build_provider<F>(lookup: F) -> CliResult<Arc<OpenAiProvider>>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = ConfigurationManager::new().load_with(lookup)?;
    Ok(Arc::new(OpenAiProvider::from_settings(&settings)?))
}

/// Warning when one request may not fit the model's context window
pub fn context_window_warning(provider: &dyn Provider, config: &ReviewConfig) -> Option<String> {
    let model = provider.models().into_iter().find(|m| m.id == config.model)?;
    let needed = config.max_tokens_per_chunk + config.max_response_tokens;
    (needed > model.context_window).then(|| {
        format!(
            "max_tokens_per_chunk + max_response_tokens = {} exceeds the {} token context window of {}",
            needed, model.context_window, model.id
        )
    })
}

/// Validate the credential, then run the pipeline over `cli.files`
pub async fn analyze(
    cli: &Cli,
    config: ReviewConfig,
    provider: Arc<dyn Provider>,
    cancel: CancellationToken,
) -> CliResult<AnalysisResult> {
    validate_credentials(provider.as_ref())
        .await
        .map_err(|e| CliError::Credentials(e.to_string()))?;

    if let Some(warning) = context_window_warning(provider.as_ref(), &config) {
        warn!("{}", warning);
    }

    let context = PipelineContext::new(
        Arc::new(config),
        Arc::new(TokenizerAdapter::new()),
        CompletionClient::new(provider),
        cancel,
    )?;

    let result = PipelineSelector::new(Arc::new(context)).run(&cli.files).await?;
    info!(
        sections = result.sections.len(),
        failed = result.failed_sections(),
        skipped = result.skipped.len(),
        "Analysis finished"
    );
    Ok(result)
}

/// Full run against the process environment; returns the formatted report
pub async fn run(cli: &Cli) -> CliResult<String> {
    let env = |name: &str| std::env::var(name).ok();

    let config = resolve_config(cli, env)?;
    let provider = build_provider(env)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling analysis");
            on_interrupt.cancel();
        }
    });

    let result = analyze(cli, config, provider, cancel).await?;
    format_result(&result, cli.json, &OutputStyle::default())
}
