mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use tcstamp::config::{ProcessingOptions, ToolsConfig, WatchConfig};
use tcstamp::pipeline;
use tcstamp::remux::Remuxer;
use tcstamp::watch;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Respect RUST_LOG if set, otherwise pick a default from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "tcstamp=debug".to_string()
        } else {
            "tcstamp=info".to_string()
        }
    });
    // Logs go to stderr; stdout carries only the summary or JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let options = ProcessingOptions {
        destructive: cli.destructive,
        rename: cli.rename,
        start: cli.start,
        framerate: cli.framerate,
    };
    let remuxer = Remuxer::locate(&ToolsConfig {
        ffmpeg_path: cli.ffmpeg,
    });

    if let Some(folder) = cli.watch {
        let cancel = CancellationToken::new();
        let signal_cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Received Ctrl-C, shutting down");
                signal_cancel.cancel();
            }
        });
        watch::run(
            folder,
            options,
            WatchConfig::default(),
            Arc::new(remuxer),
            cancel,
        )
        .await?;
        return Ok(());
    }

    let input = cli
        .input
        .context("an input file is required unless --watch is given")?;
    let result = pipeline::process(&input, &options, &remuxer).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Operation complete: determined file creation time as {} and added timecode starting with {}",
            result.created_time, result.timecode
        );
    }
    Ok(())
}
