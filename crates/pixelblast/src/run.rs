use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use pixelconfig::PixelBlastConfig;
use renderer::{render_still, run_window, save_png, StillRequest, WindowOptions};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ExportArgs, RunArgs, SpeakArgs, TableArgs};
use crate::paths::AppPaths;
use crate::reload::{load_config, ConfigWatcher};
use crate::speech::{GradioSpeech, SpeechProvider};
use crate::table::{CsvDirectory, DataTableProvider};

pub fn run(cli: Cli) -> Result<()> {
    initialise_tracing();

    let paths = AppPaths::discover()?;
    tracing::debug!(
        config = %paths.config_dir().display(),
        data = %paths.data_dir().display(),
        "resolved pixelblast paths"
    );

    match cli.command {
        None => run_preview(&cli.run, &paths),
        Some(Command::Export(args)) => run_export(&cli.run, &paths, &args),
        Some(Command::Table(args)) => run_table(&paths, &args),
        Some(Command::Speak(args)) => run_speak(&args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the JSON output of `table` and `speak`
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit `--config`, else the default file when it exists, else defaults.
fn resolve_config(args: &RunArgs, paths: &AppPaths) -> Result<(PixelBlastConfig, Option<PathBuf>)> {
    let path = match args.config.as_ref() {
        Some(path) => Some(path.clone()),
        None => Some(paths.config_file()).filter(|path| path.is_file()),
    };
    match path {
        Some(path) => {
            let config = load_config(&path)?;
            tracing::info!(path = %path.display(), variant = %config.variant, "loaded configuration");
            Ok((config, Some(path)))
        }
        None => {
            tracing::info!("no configuration file found; using defaults");
            Ok((PixelBlastConfig::default(), None))
        }
    }
}

fn run_preview(args: &RunArgs, paths: &AppPaths) -> Result<()> {
    let (config, path) = resolve_config(args, paths)?;
    let options = WindowOptions {
        size: args.size.unwrap_or(WindowOptions::default().size),
        scale_factor: args.scale_factor,
        seed: args.seed,
        ..WindowOptions::default()
    };

    let mut watcher = path.map(ConfigWatcher::new);
    if let Some(watcher) = watcher.as_ref() {
        tracing::info!(path = %watcher.path().display(), "watching configuration for changes");
    }
    let reload = move || watcher.as_mut().and_then(|watcher| watcher.poll(Instant::now()));
    run_window(config, options, reload)
}

fn run_export(args: &RunArgs, paths: &AppPaths, export: &ExportArgs) -> Result<()> {
    let (config, _) = resolve_config(args, paths)?;
    let defaults = StillRequest::default();
    let request = StillRequest {
        size: args.size.unwrap_or(defaults.size),
        scale_factor: args.scale_factor.unwrap_or(defaults.scale_factor),
        time: export.time,
        clicks: export.clicks.clone(),
        drag: export.drag.clone(),
        seed: args.seed.unwrap_or(defaults.seed),
    };
    let image = render_still(&config, &request)?;
    save_png(&image, &export.output)?;
    tracing::info!(path = %export.output.display(), "wrote still frame");
    Ok(())
}

fn run_table(paths: &AppPaths, args: &TableArgs) -> Result<()> {
    let root = args.dir.clone().unwrap_or_else(|| paths.table_dir());
    let tables = CsvDirectory::new(root);
    let rows = tables.load(&args.file)?;
    let json = serde_json::to_string_pretty(&rows).context("failed to encode table")?;
    println!("{json}");
    Ok(())
}

fn run_speak(args: &SpeakArgs) -> Result<()> {
    let speech = GradioSpeech::new(args.endpoint.as_deref())
        .context("failed to construct speech client")?;
    let audio = speech.synthesize(&args.text)?;
    let json = serde_json::to_string_pretty(&audio).context("failed to encode speech result")?;
    println!("{json}");
    Ok(())
}
