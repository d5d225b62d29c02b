//! Pixelsmith CLI: run media edits against the cloud media service.
//!
//! Prints an `{ "result": ... }` or `{ "error": ... }` document and exits non-zero
//! on error. Transcription needs MEDIA_CLOUD_NAME, MEDIA_API_KEY and MEDIA_API_SECRET.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pixelsmith_api_client::ApiClient;
use pixelsmith_cli::{emit, format_from_url, print_json, read_request, ScheduleReport};
use pixelsmith_core::{
    ActionResult, EditError, EditorConfig, ExtractMode, Operation, ResourceKind, TransformRequest,
};
use pixelsmith_infra::{init_telemetry, shutdown_telemetry};
use pixelsmith_services::{
    export_asset, run_operation, transcribe_video, EditorContext, ExportRequest,
    TranscriptionRequest,
};

#[derive(Parser)]
#[command(name = "pixelsmith", about = "Cloud media edit CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Asset {
    /// Delivery URL of the source asset (must contain /upload/)
    url: String,
    /// Source format; taken from the URL extension when omitted
    #[arg(long)]
    format: Option<String>,
    /// Poll cadence: image or video
    #[arg(long)]
    kind: Option<ResourceKind>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Edit(EditCommands),
    /// Generate and overlay subtitles for a video
    Transcribe {
        /// Delivery URL of the video
        url: String,
        #[arg(long)]
        public_id: String,
    },
    /// Resolve a download URL at a quality preset
    Export {
        url: String,
        #[arg(long)]
        public_id: String,
        /// original, large, medium or small
        #[arg(long, default_value = "original")]
        quality: String,
        #[arg(long, default_value = "image")]
        kind: ResourceKind,
        /// Taken from the URL extension when omitted
        #[arg(long)]
        format: Option<String>,
    },
    /// Run a request given as JSON, or @file
    Run {
        #[arg(long)]
        request: String,
        #[arg(long)]
        kind: Option<ResourceKind>,
    },
    /// Print the backoff schedule of a poll policy
    Schedule {
        #[arg(long, value_enum, default_value = "image")]
        kind: ScheduleKind,
    },
}

#[derive(Subcommand)]
enum EditCommands {
    /// Remove the background
    BgRemove {
        #[command(flatten)]
        asset: Asset,
    },
    /// Replace the background, optionally guided by a prompt
    BgReplace {
        #[command(flatten)]
        asset: Asset,
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Extend the canvas to an aspect ratio with generated content
    GenFill {
        #[command(flatten)]
        asset: Asset,
        #[arg(long)]
        aspect_ratio: String,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },
    /// Remove an object described by a prompt
    GenRemove {
        #[command(flatten)]
        asset: Asset,
        #[arg(long)]
        prompt: String,
    },
    /// Extract the areas matching one or more prompts
    Extract {
        #[command(flatten)]
        asset: Asset,
        /// Repeat for several objects
        #[arg(long = "prompt", required = true)]
        prompts: Vec<String>,
        #[arg(long)]
        multiple: bool,
        /// content or mask
        #[arg(long, default_value = "content")]
        mode: ExtractMode,
        #[arg(long)]
        invert: bool,
    },
    /// Crop a video around its subject
    SmartCrop {
        #[command(flatten)]
        asset: Asset,
        #[arg(long)]
        aspect_ratio: String,
        #[arg(long)]
        height: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScheduleKind {
    Image,
    Video,
    Transcription,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = EditorConfig::from_env().context("Failed to load configuration")?;
    init_telemetry(&config.telemetry)?;

    let ctx = EditorContext::from_config(&config)?;
    let cancel = ctx.cancellation_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling");
            cancel.cancel();
        }
    });

    let failed = match cli.command {
        Commands::Schedule { kind } => {
            let policy = &config.poll;
            let poll_config = match kind {
                ScheduleKind::Image => &policy.image,
                ScheduleKind::Video => &policy.video,
                ScheduleKind::Transcription => &policy.transcription,
            };
            print_json(&ScheduleReport::from(poll_config))?;
            false
        }
        Commands::Transcribe { url, public_id } => {
            let request = TranscriptionRequest {
                asset_url: url,
                public_id,
            };
            let result = match admin_client(&config) {
                Ok(admin) => transcribe_video(&ctx, &admin, &request).await,
                Err(e) => Err(e),
            };
            emit(&ActionResult::from(result.map(String::from)))?
        }
        Commands::Export {
            url,
            public_id,
            quality,
            kind,
            format,
        } => {
            let format = format.unwrap_or_else(|| format_from_url(&url));
            let request = ExportRequest {
                asset_url: url,
                public_id,
                quality,
                resource_kind: kind,
                format,
            };
            emit(&ActionResult::from(export_asset(&ctx, &request).await))?
        }
        Commands::Run { request, kind } => {
            let request = read_request(&request)?;
            let kind = kind
                .or_else(|| request.operation.default_resource_kind())
                .unwrap_or(ResourceKind::Image);
            edit(&ctx, request, kind).await?
        }
        Commands::Edit(command) => {
            let (asset, operation) = command.into_parts();
            let format = asset
                .format
                .unwrap_or_else(|| format_from_url(&asset.url));
            let kind = asset
                .kind
                .or_else(|| operation.default_resource_kind())
                .unwrap_or(ResourceKind::Image);
            edit(&ctx, TransformRequest::new(asset.url, operation, format), kind).await?
        }
    };

    shutdown_telemetry().await;

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

async fn edit(
    ctx: &EditorContext,
    request: TransformRequest,
    kind: ResourceKind,
) -> anyhow::Result<bool> {
    let result = run_operation(ctx, &request, kind).await;
    emit(&ActionResult::from(result.map(String::from)))
}

fn admin_client(config: &EditorConfig) -> Result<ApiClient, EditError> {
    let credentials = config.admin_credentials()?;
    ApiClient::from_credentials(&config.admin_api_url, &credentials)
        .map_err(|e| EditError::Configuration(e.to_string()))
}

impl EditCommands {
    /// Source asset and operation of an edit subcommand.
    fn into_parts(self) -> (Asset, Operation) {
        match self {
            EditCommands::BgRemove { asset } => (asset, Operation::BackgroundRemoval),
            EditCommands::BgReplace { asset, prompt } => {
                (asset, Operation::BackgroundReplace { prompt })
            }
            EditCommands::GenFill {
                asset,
                aspect_ratio,
                width,
                height,
            } => (
                asset,
                Operation::GenerativeFill {
                    aspect_ratio,
                    width,
                    height,
                },
            ),
            EditCommands::GenRemove { asset, prompt } => {
                (asset, Operation::GenerativeRemove { prompt })
            }
            EditCommands::Extract {
                asset,
                prompts,
                multiple,
                mode,
                invert,
            } => (
                asset,
                Operation::AreaExtract {
                    prompts,
                    multiple,
                    mode,
                    invert,
                },
            ),
            EditCommands::SmartCrop {
                asset,
                aspect_ratio,
                height,
            } => (
                asset,
                Operation::SmartCrop {
                    aspect_ratio,
                    height,
                },
            ),
        }
    }
}
