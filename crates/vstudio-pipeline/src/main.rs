//! `vstudio` command line front end.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vstudio_genai::{GenAiClient, GenAiError};
use vstudio_models::{AspectRatio, GenerationSettings, Pacing, TransitionStyle};
use vstudio_pipeline::{CredentialGate, EnvCredentialGate, Studio, StudioConfig};

#[derive(Parser, Debug)]
#[command(name = "vstudio")]
#[command(about = "Turn an image sequence into a video, or edit a single image")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a video transitioning through the images, in order
    Video {
        /// Free-text direction for the video
        #[arg(long, default_value = "")]
        instruction: String,

        /// Transition style (none, fade, dissolve, zoom, pan, cut, morph)
        #[arg(long, default_value_t = TransitionStyle::default())]
        style: TransitionStyle,

        /// Pacing (slow, normal, fast, rhythmic)
        #[arg(long, default_value_t = Pacing::default())]
        pacing: Pacing,

        /// Aspect ratio (16:9 or 9:16)
        #[arg(long, default_value_t = AspectRatio::default())]
        aspect: AspectRatio,

        /// Output file path
        #[arg(short, long, default_value = "visionary_output.mp4")]
        out: PathBuf,

        /// Images, first and last anchor the video
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// Edit a single image with a text prompt
    Edit {
        /// Edit instruction
        #[arg(short, long)]
        prompt: String,

        /// Output file path (defaults to visionary_edit.<ext>)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Image to edit
        image: PathBuf,
    },
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vstudio_pipeline=info,vstudio_genai=info,warn"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

async fn run_video(
    studio: &Studio,
    instruction: String,
    settings: GenerationSettings,
    out: PathBuf,
    images: Vec<PathBuf>,
) -> Result<()> {
    let added = studio.add_image_paths(&images).await?;
    if added.len() < images.len() {
        warn!(
            skipped = images.len() - added.len(),
            "Some files were skipped (not images, or over the image limit)"
        );
    }
    studio.set_instruction(instruction).await;
    studio.set_settings(settings).await;

    let mut status = studio.subscribe_status();
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let s = status.borrow_and_update().clone();
            info!(progress = s.progress, "{}", s.status_message);
            if s.is_terminal() {
                break;
            }
        }
    });

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt, cancelling");
            let _ = cancel_tx.send(true);
        }
    });

    match studio.generate_video(Some(cancel_rx)).await {
        Ok(video) => {
            tokio::fs::write(&out, video.bytes())
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!(path = %out.display(), bytes = video.len(), "Video saved");
            Ok(())
        }
        Err(e) => {
            error!("Video generation failed: {}", e);
            Err(e.into())
        }
    }
}

async fn run_edit(studio: &Studio, prompt: String, out: Option<PathBuf>, image: PathBuf) -> Result<()> {
    studio.add_image_paths(&[image.as_path()]).await?;
    if studio.images().await.is_empty() {
        bail!("{} is not a supported image", image.display());
    }

    let edited = studio.edit_first_image(&prompt).await?;
    let mime_type = edited.mime_type().unwrap_or("application/octet-stream");
    let out = out.unwrap_or_else(|| PathBuf::from(format!("visionary_edit.{}", extension_for(mime_type))));
    let bytes = edited.decode().context("Edited image payload is invalid")?;

    tokio::fs::write(&out, bytes)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;
    info!(path = %out.display(), "Edited image saved");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_tracing();

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }

    let config = StudioConfig::from_env();
    info!("Studio config: {:?}", config);

    let gate = Arc::new(EnvCredentialGate::default());
    let client = match GenAiClient::from_env() {
        Ok(client) => client,
        Err(e @ GenAiError::MissingCredential) => {
            gate.prompt_for_credential().await;
            return Err(e.into());
        }
        Err(e) => return Err(e).context("Failed to create GenAI client"),
    };

    let studio = Studio::with_client(config, client, gate);

    match cli.command {
        Commands::Video {
            instruction,
            style,
            pacing,
            aspect,
            out,
            images,
        } => {
            let settings = GenerationSettings {
                transition_style: style,
                pacing,
                aspect_ratio: aspect,
            };
            run_video(&studio, instruction, settings, out, images).await
        }
        Commands::Edit { prompt, out, image } => run_edit(&studio, prompt, out, image).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video() {
        let cli = Cli::try_parse_from([
            "vstudio", "video", "--style", "zoom", "--pacing", "fast", "--aspect", "9:16", "a.png",
            "b.png",
        ])
        .unwrap();

        match cli.command {
            Commands::Video {
                style,
                pacing,
                aspect,
                images,
                out,
                ..
            } => {
                assert_eq!(style, TransitionStyle::Zoom);
                assert_eq!(pacing, Pacing::Fast);
                assert_eq!(aspect, AspectRatio::Portrait);
                assert_eq!(images.len(), 2);
                assert_eq!(out, PathBuf::from("visionary_output.mp4"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_video_defaults() {
        let cli = Cli::try_parse_from(["vstudio", "video", "a.png"]).unwrap();

        match cli.command {
            Commands::Video {
                instruction,
                style,
                pacing,
                aspect,
                ..
            } => {
                assert!(instruction.is_empty());
                assert_eq!(style, TransitionStyle::Morph);
                assert_eq!(pacing, Pacing::Normal);
                assert_eq!(aspect, AspectRatio::Landscape);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_edit() {
        let cli = Cli::try_parse_from(["vstudio", "edit", "--prompt", "add snow", "photo.jpg"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Edit { ref prompt, out: None, ref image } if prompt == "add snow" && image == &PathBuf::from("photo.jpg")
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Cli::try_parse_from(["vstudio"]).is_err());
        assert!(Cli::try_parse_from(["vstudio", "video"]).is_err());
        assert!(Cli::try_parse_from(["vstudio", "edit", "photo.jpg"]).is_err());
        assert!(Cli::try_parse_from(["vstudio", "edit", "--prompt", "x", "a.png", "b.png"]).is_err());
        assert!(Cli::try_parse_from(["vstudio", "video", "--style", "wobble", "a.png"]).is_err());
        assert!(Cli::try_parse_from(["vstudio", "video", "--aspect", "4:3", "a.png"]).is_err());
        assert!(Cli::try_parse_from(["vstudio", "render", "a.png"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
