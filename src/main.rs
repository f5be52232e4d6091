// Command-line host for the converter: gathers input files, runs one batch,
// and writes the results to disk individually and/or as a ZIP archive.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use webp_batch::archive::DEFAULT_ARCHIVE_NAME;
use webp_batch::core::{ItemOutcome, ResizeMode};
use webp_batch::utils::{
    collect_image_paths, format_file_size, is_image_path, read_input_image, write_output,
};
use webp_batch::{
    BatchEvent, BatchOrchestrator, ConversionSettings, ConverterSession, OutputFormat, ZipBundler,
    bundle_session, progress_channel,
};

#[derive(Debug, Parser)]
#[command(name = "webp-batch", version, about = "Resize images and convert them to WebP in one go")]
struct Cli {
    /// Image files or directories (scanned one level deep)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Encoder quality between 0 and 1 [default: 0.8]
    #[arg(short, long)]
    quality: Option<f32>,

    /// Resize mode [default: none]
    #[arg(long, value_parser = parse_mode)]
    resize: Option<ResizeMode>,

    /// Target width in pixels (non-positive falls back to 800)
    #[arg(long, allow_negative_numbers = true)]
    width: Option<i64>,

    /// Target height in pixels (non-positive falls back to 600)
    #[arg(long, allow_negative_numbers = true)]
    height: Option<i64>,

    /// Output format: webp or jpeg [default: webp]
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Directory for the converted files
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Also bundle every converted file into this ZIP archive (a directory
    /// gets webp_images.zip inside it)
    #[arg(long, value_name = "FILE")]
    zip: Option<PathBuf>,

    /// JSON settings file; command-line flags take precedence
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log every pipeline stage
    #[arg(short, long)]
    verbose: bool,
}

fn parse_mode(raw: &str) -> Result<ResizeMode, String> {
    raw.parse().map_err(|e: webp_batch::ConverterError| e.to_string())
}

impl Cli {
    /// Settings file (or defaults) with flags applied on top.
    fn settings(&self) -> anyhow::Result<ConversionSettings> {
        let mut settings = match &self.settings {
            Some(path) => ConversionSettings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => ConversionSettings::default(),
        };

        if let Some(quality) = self.quality {
            settings.quality = quality;
        }
        if let Some(mode) = self.resize {
            settings.resize.mode = mode;
        }
        if self.width.is_some() {
            settings.resize.width = self.width;
        }
        if self.height.is_some() {
            settings.resize.height = self.height;
        }
        if let Some(format) = self.format {
            settings.output_format = format;
        }
        Ok(settings)
    }

    /// Where the archive goes, refusing paths that would clobber an image.
    fn archive_path(&self) -> anyhow::Result<Option<PathBuf>> {
        let Some(path) = &self.zip else {
            return Ok(None);
        };
        let path = if path.is_dir() {
            path.join(DEFAULT_ARCHIVE_NAME)
        } else {
            path.clone()
        };
        if is_image_path(&path) || self.inputs.contains(&path) {
            bail!("refusing to write the archive over {}", path.display());
        }
        Ok(Some(path))
    }
}

/// True when writing `target` would replace one of the source files.
async fn overwrites_input(target: &Path, sources: &HashSet<PathBuf>) -> bool {
    match tokio::fs::canonicalize(target).await {
        Ok(resolved) => sources.contains(&resolved),
        Err(_) => false,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_target(false)       // Remove module path
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns the number of images that failed to convert.
async fn run(cli: Cli) -> anyhow::Result<usize> {
    let params = cli.settings()?.to_params();
    let zip_path = cli.archive_path()?;

    let paths = collect_image_paths(&cli.inputs).await.context("collecting input files")?;
    if paths.is_empty() {
        bail!("no image files found in the given inputs");
    }

    let mut session = ConverterSession::new();
    let mut sources = HashSet::new();
    for path in &paths {
        session.add_images([read_input_image(path).await?]);
        let resolved = tokio::fs::canonicalize(path)
            .await
            .with_context(|| format!("resolving {}", path.display()))?;
        sources.insert(resolved);
    }

    let orchestrator = BatchOrchestrator::default();
    let (emitter, mut events) = progress_channel();

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                BatchEvent::Progress(update) => {
                    let marker = match update.outcome {
                        ItemOutcome::Converted => "ok",
                        ItemOutcome::Failed(_) => "FAILED",
                    };
                    eprintln!(
                        "[{:>3}%] {}/{} {} {marker}",
                        update.percent, update.completed_count, update.total_count, update.file_name
                    );
                }
                BatchEvent::Complete(summary) => {
                    debug!("Progress stream closed after {} item(s)", summary.attempted);
                }
            }
        }
    });

    let summary = orchestrator.run(&mut session, &params, &emitter).await;
    drop(emitter);
    printer.await.context("progress printer stopped unexpectedly")?;

    for failure in &summary.failures {
        warn!("{}: {}", failure.input.name(), failure.error);
    }

    let write_individual = cli.out_dir.is_some() || zip_path.is_none();
    if write_individual {
        let out_dir = cli.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        for (entry, converted) in session.archive_entries().iter().zip(session.results()) {
            let target = out_dir.join(&entry.name);
            if overwrites_input(&target, &sources).await {
                warn!("Skipping {}: it would overwrite the source image, pass --out-dir", target.display());
                continue;
            }
            let path = write_output(&out_dir, &entry.name, &entry.bytes).await?;
            println!(
                "{} {} → {} ({:+.1}%)",
                path.display(),
                format_file_size(converted.input().size()),
                format_file_size(converted.output_size()),
                -converted.size_reduction_percent()
            );
        }
    }

    if let Some(zip_path) = &zip_path {
        if summary.succeeded() > 0 {
            let archive = bundle_session(&session, &ZipBundler::default())?;
            tokio::fs::write(zip_path, &archive)
                .await
                .with_context(|| format!("writing {}", zip_path.display()))?;
            info!("Wrote {} ({})", zip_path.display(), format_file_size(archive.len() as u64));
        } else {
            warn!("Nothing converted, skipping archive {}", zip_path.display());
        }
    }

    println!(
        "Converted {} of {} image(s): {} → {}",
        summary.succeeded(),
        summary.total,
        format_file_size(summary.total_input_bytes()),
        format_file_size(summary.total_output_bytes())
    );

    Ok(summary.failed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use webp_batch::ResizePolicy;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("webp-batch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        let params = parse(&["a.png"]).settings().unwrap().to_params();
        assert_eq!(params.quality(), 0.8);
        assert_eq!(params.policy(), ResizePolicy::NoResize);
        assert_eq!(params.format(), OutputFormat::WebP);
    }

    #[test]
    fn negative_width_falls_back_to_default() {
        let cli = parse(&["--resize", "width", "--width", "-5", "a.png"]);
        assert_eq!(cli.width, Some(-5));
        let params = cli.settings().unwrap().to_params();
        assert_eq!(params.policy(), ResizePolicy::FixedWidth { width: 800 });
    }

    #[test]
    fn flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        std::fs::write(
            &file,
            r#"{"quality": 0.3, "resize": {"mode": "both", "width": 400, "height": 300}, "outputFormat": "jpeg"}"#,
        )
        .unwrap();
        let file = file.to_str().unwrap();

        let from_file = parse(&["--settings", file, "a.png"]).settings().unwrap().to_params();
        assert_eq!(from_file.quality(), 0.3);
        assert_eq!(from_file.policy(), ResizePolicy::FixedBoth { width: 400, height: 300 });
        assert_eq!(from_file.format(), OutputFormat::JPEG);

        let overridden = parse(&["--settings", file, "-q", "0.9", "--height", "100", "--format", "webp", "a.png"])
            .settings()
            .unwrap()
            .to_params();
        assert_eq!(overridden.quality(), 0.9);
        assert_eq!(overridden.policy(), ResizePolicy::FixedBoth { width: 400, height: 100 });
        assert_eq!(overridden.format(), OutputFormat::WebP);
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let cli = parse(&["--settings", "/nonexistent/settings.json", "a.png"]);
        assert!(cli.settings().is_err());
    }

    #[test]
    fn zip_requires_a_value() {
        assert!(Cli::try_parse_from(["webp-batch", "a.png", "--zip"]).is_err());

        let cli = parse(&["--zip", "out.zip", "a.png", "b.png"]);
        assert_eq!(cli.zip, Some(PathBuf::from("out.zip")));
        assert_eq!(cli.inputs.len(), 2);
        assert_eq!(cli.archive_path().unwrap(), Some(PathBuf::from("out.zip")));
    }

    #[test]
    fn zip_path_never_replaces_an_image() {
        let cli = parse(&["--zip", "a.png", "b.png"]);
        assert_eq!(cli.inputs, vec![PathBuf::from("b.png")]);
        assert!(cli.archive_path().is_err());

        let cli = parse(&["--zip", "photos", "photos"]);
        assert!(cli.archive_path().is_err());
    }

    #[test]
    fn zip_into_directory_uses_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let cli = parse(&["--zip", dir.path().to_str().unwrap(), "a.png"]);
        assert_eq!(cli.archive_path().unwrap(), Some(dir.path().join(DEFAULT_ARCHIVE_NAME)));
    }

    #[tokio::test]
    async fn detects_output_over_its_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("photo.webp");
        std::fs::write(&source, b"x").unwrap();
        let sources = HashSet::from([std::fs::canonicalize(&source).unwrap()]);

        assert!(overwrites_input(&dir.path().join("photo.webp"), &sources).await);
        assert!(!overwrites_input(&dir.path().join("other.webp"), &sources).await);
    }
}
