//! Studio batch driver entry point
//!
//! Reads prompts (one per line), drives a streamed (default) or buffered
//! batch run against the gateway, and saves the materialized artifacts to
//! a project file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use shared::{GenerationRequest, ProgressEvent};
use studio::{Artifact, RealGatewayClient, RequestOptions, SessionHandle, Workspace};
use studio::traits::GenerationGateway;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "studio")]
#[command(about = "Generate UI components in bulk through the generation gateway")]
struct Args {
    /// Gateway base URL
    #[arg(long, default_value = "http://127.0.0.1:3001")]
    gateway_url: String,

    /// File with one generation prompt per line
    #[arg(long)]
    prompts: PathBuf,

    /// Optional design brief appended to every prompt
    #[arg(long)]
    design_brief: Option<String>,

    /// Project name, used for context and the workspace title
    #[arg(long)]
    project_name: Option<String>,

    /// Output project file
    #[arg(long, default_value = "project.json")]
    out: PathBuf,

    /// Use buffered bulk mode instead of streaming
    #[arg(long)]
    batch: bool,

    /// API key forwarded to the gateway (defaults to ANTHROPIC_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    shared::logging::init_tracing("studio", Some(&args.log_level));

    let prompts = std::fs::read_to_string(&args.prompts)
        .with_context(|| format!("failed to read prompts from {}", args.prompts.display()))?;
    let requests: Vec<GenerationRequest> = prompts
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| GenerationRequest {
            prompt: line.to_string(),
            design_brief: args.design_brief.clone(),
            project_name: args.project_name.clone(),
        })
        .collect();
    anyhow::ensure!(
        !requests.is_empty(),
        "no prompts found in {}",
        args.prompts.display()
    );

    let options = RequestOptions {
        system_instructions: None,
        api_key: args
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok()),
    };
    let client = RealGatewayClient::new(&args.gateway_url);
    let mut workspace = Workspace::new(
        args.project_name
            .clone()
            .unwrap_or_else(|| "untitled project".to_string()),
    );

    shared::logging::log_startup(
        "studio",
        &format!("{} prompts against {}", requests.len(), args.gateway_url),
    );

    let outcome = if args.batch {
        // Buffered mode: one response, artifacts materialized at once.
        let outcome = client.run_batch(requests, options).await?;
        for item in &outcome.results {
            workspace.add_artifact(Artifact::from_result(item));
        }
        outcome
    } else {
        let session = SessionHandle::new();
        client
            .run_streamed(requests, options, &session, &mut workspace, |event| {
                match event {
                    ProgressEvent::Progress { current, total, prompt } => {
                        tracing::info!("⏳ generating {current}/{total}: {prompt}");
                    }
                    ProgressEvent::Error { result } => {
                        tracing::warn!(index = result.index, error = %result.error, "❌ item failed");
                    }
                    // Successes are logged by the workspace as they land.
                    ProgressEvent::Success { .. } | ProgressEvent::Complete { .. } => {}
                }
            })
            .await?
    };

    workspace.save(&args.out)?;

    shared::logging::log_success(
        "studio",
        &format!(
            "{} generated, {} failed ({} tokens); saved {} artifacts to {}",
            outcome.total_generated,
            outcome.total_failed,
            outcome.total_tokens_used,
            workspace.len(),
            args.out.display()
        ),
    );
    Ok(())
}
