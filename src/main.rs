mod cli;

use vidport::{
    api::ApiEndpoints,
    catalog::VideoCatalog,
    config,
    notifications::NotificationManager,
    playback::{CapabilityProfile, ConsoleSink, HeadlessEnvironment, PlaybackSelector, PlaybackTarget},
    session::PlayerSession,
    upload::{
        HttpTransport, ProgressReporter, UploadEvent, UploadOutcome, UploadPipeline,
        UploadRequest, VideoFile,
    },
};
use vidport_core::{EventBus, VideoId};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn notification_manager(config: &config::Config) -> Arc<NotificationManager> {
    let bus = Arc::new(EventBus::new(16, config.notifications.history));
    Arc::new(NotificationManager::new(&config.notifications, bus))
}

async fn upload(
    file: &Path,
    title: String,
    description: String,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let endpoints = ApiEndpoints::from_config(&config.api);

    let video = VideoFile::open(file)
        .await
        .with_context(|| format!("Failed to read {:?}", file))?;
    tracing::debug!("Selected {:?}", video);

    let pipeline = UploadPipeline::new(
        Arc::new(HttpTransport::new(&config)),
        notification_manager(&config),
    );
    let (reporter, mut events) = ProgressReporter::new();

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(video.name.clone());

    let bar_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                UploadEvent::Progress(progress) => {
                    bar.set_position(u64::from(progress.percent_complete));
                }
                UploadEvent::Finished { message, .. } => {
                    bar.finish_with_message(message);
                    return;
                }
            }
        }
        bar.abandon();
    });

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let request = UploadRequest::new(Some(video), title, description);
    let result = pipeline
        .submit_with_cancel(request, &reporter, &cancel)
        .await;

    drop(reporter);
    let _ = bar_task.await;

    match result? {
        UploadOutcome::Success(id) => {
            println!("Video ID: {}", id);
            println!("Manifest: {}", endpoints.manifest(&id));
            Ok(())
        }
        UploadOutcome::Failure(reason) => anyhow::bail!("Upload failed: {}", reason),
    }
}

async fn list_videos(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let catalog = VideoCatalog::new(&config);

    let videos = catalog.list_videos().await?;
    if videos.is_empty() {
        println!("No videos stored.");
        return Ok(());
    }

    for video in &videos {
        print!("{}  {}", video.video_id, video.title);
        if let Some(ref content_type) = video.content_type {
            print!(" ({})", content_type);
        }
        println!();
        if !video.description.is_empty() {
            println!("    {}", video.description);
        }
    }
    println!("\n{} video(s)", videos.len());

    Ok(())
}

fn print_manifest_url(video_id: &str, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let id: VideoId = video_id.parse()?;
    println!("{}", ApiEndpoints::from_config(&config.api).manifest(&id));
    Ok(())
}

async fn play(video_id: &str, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let id: VideoId = video_id.parse()?;

    let mut session = PlayerSession::new(ApiEndpoints::from_config(&config.api));
    let manifest_url = session
        .select(id)
        .context("No video selected")?;

    let selector = PlaybackSelector::new(
        Arc::new(HeadlessEnvironment::new(&config)),
        notification_manager(&config),
        config.playback.clone(),
    );
    let sink = Arc::new(ConsoleSink::new());

    let profile = selector
        .attach(PlaybackTarget::new(sink.clone(), manifest_url))
        .await?;
    selector.detach();

    println!("Playback path: {}", profile);
    if profile == CapabilityProfile::Unsupported {
        anyhow::bail!("Video format not supported");
    }
    println!("Play requests: {}", sink.play_count());

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  API: {}", config.api.base_url);
            println!("  Upload chunk size: {} bytes", config.upload.chunk_size);
            println!("  Manifest MIME: {}", config.playback.manifest_mime);
            println!("  Plugins allowed: {}", config.playback.allow_plugin);
            if let Some(max) = config.playback.max_bandwidth {
                println!("  Max bandwidth: {} bps", max);
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  API: {}", config.api.base_url);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vidport=trace,vidport_core=trace,vidport_hls=debug,reqwest=debug".to_string()
        } else {
            "vidport=info,vidport_core=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Upload {
            file,
            title,
            description,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(upload(&file, title, description, config_path))
        }
        Commands::List => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(list_videos(config_path))
        }
        Commands::Url { video_id } => print_manifest_url(&video_id, config_path),
        Commands::Play { video_id } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(play(&video_id, config_path))
        }
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or_else(|| cli.config.clone());
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("vidport {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
