//! Quick Capture CLI — feeds share events into an intake bridge and prints
//! what a consumer would receive.
//!
//! Staging settings come from SHARE_STAGING_DIR and friends (see `IntakeConfig`).

use anyhow::Context;
use capture_bridge::{Attachment, IntakeBridge, IntakeEvent, RawShareIntent, FETCH_METHOD};
use capture_cli::{init_tracing, parse_file_arg};
use capture_core::IntakeConfig;
use capture_storage::FileSource;
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "quick-capture", about = "Share intake bridge CLI")]
struct Cli {
    /// Attach a consumer before the event and print the push it receives
    #[arg(long, global = true)]
    push: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Share a piece of text (a bare URL becomes the shared link)
    Text {
        text: String,
        /// Subject used as the label of a bare-URL share
        #[arg(long)]
        subject: Option<String>,
    },
    /// Share one or more files, each given as PATH or PATH@MIME
    Files {
        #[arg(required = true)]
        files: Vec<String>,
        /// Content type for files given without one
        #[arg(long)]
        mime: Option<String>,
    },
    /// Replay a raw host share trigger
    Intent {
        /// send or send-multiple (Android action names are accepted too)
        #[arg(long)]
        action: String,
        /// Declared content type of the share
        #[arg(long = "type")]
        mime_type: Option<String>,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        /// Attached stream, as PATH or PATH@MIME
        #[arg(long = "stream")]
        streams: Vec<String>,
    },
}

#[derive(Serialize)]
struct Report {
    handled: bool,
    pushed: Option<serde_json::Value>,
    fetched: serde_json::Value,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize report")?;
    println!("{}", out);
    Ok(())
}

fn attachments(args: &[String], default_mime: Option<&str>) -> Vec<Attachment> {
    args.iter()
        .map(|arg| {
            let (path, mime) = parse_file_arg(arg, default_mime);
            Attachment::new(mime, FileSource::new(path))
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = IntakeConfig::from_env().context("Invalid share intake configuration")?;
    init_tracing(config.log_format);

    let cli = Cli::parse();

    let bridge = IntakeBridge::from_config(&config)
        .await
        .with_context(|| format!("Failed to prepare {}", config.staging_dir.display()))?;

    let mut subscription = cli.push.then(|| bridge.attach());

    let handled = match cli.command {
        Commands::Text { text, subject } => {
            bridge.on_share_event(IntakeEvent::text(text, subject)).await;
            true
        }
        Commands::Files { files, mime } => {
            let mut items = attachments(&files, mime.as_deref());
            let event = if items.len() == 1 {
                IntakeEvent::SingleAttachment(items.remove(0))
            } else {
                IntakeEvent::MultipleAttachments(items)
            };
            bridge.on_share_event(event).await;
            true
        }
        Commands::Intent {
            action,
            mime_type,
            text,
            subject,
            streams,
        } => {
            let intent = RawShareIntent {
                action: Some(action),
                streams: attachments(&streams, None),
                mime_type,
                text,
                subject,
            };
            bridge.on_intent(intent).await
        }
    };

    let pushed = match subscription.as_mut().and_then(|sub| sub.try_recv()) {
        Some(event) => Some(serde_json::to_value(&event).context("Serialize push")?),
        None => None,
    };

    let fetched = bridge
        .handle_method_call(FETCH_METHOD)
        .context("Fetch shared data")?;

    print_json(&Report {
        handled,
        pushed,
        fetched,
    })
}
