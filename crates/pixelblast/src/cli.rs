use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pixelblast",
    author,
    version,
    about = "Interactive procedural pixel-art background",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Configuration file; defaults to `pixelblast.toml` in the config directory.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Container size in logical pixels (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size, global = true)]
    pub size: Option<(u32, u32)>,

    /// Device pixel ratio override; values above 2 are capped.
    #[arg(long, value_name = "FACTOR", global = true)]
    pub scale_factor: Option<f64>,

    /// Fixes the random animation offset.
    #[arg(long, value_name = "N", global = true)]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a single frame on the CPU and write it as PNG.
    Export(ExportArgs),
    /// Load a CSV table from the data directory and print it as JSON.
    Table(TableArgs),
    /// Synthesize speech for a line of text and print the audio reference as JSON.
    Speak(SpeakArgs),
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Destination PNG path.
    #[arg(long, short, value_name = "PATH")]
    pub output: PathBuf,

    /// Seconds of animation before the capture.
    #[arg(long, value_name = "SECONDS", default_value_t = 1.0)]
    pub time: f32,

    /// Click position in container pixels; repeat for several ripples.
    #[arg(long = "click", value_name = "X,Y", value_parser = parse_point)]
    pub clicks: Vec<(f64, f64)>,

    /// Pointer path fed to the touch trail, one point per frame.
    #[arg(long = "drag", value_name = "X,Y", value_parser = parse_point)]
    pub drag: Vec<(f64, f64)>,
}

#[derive(Parser, Debug)]
pub struct TableArgs {
    /// CSV file name inside the table directory.
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Directory holding the CSV files; defaults to `csv/` under the data directory.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct SpeakArgs {
    /// Text to synthesize.
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Base URL of the Gradio space.
    #[arg(long, value_name = "URL", env = "PIXELBLAST_TTS_URL")]
    pub endpoint: Option<String>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{value}'; expected WIDTHxHEIGHT"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{value}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{value}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("size '{value}' must be non-zero"));
    }
    Ok((width, height))
}

pub fn parse_point(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("invalid point '{value}'; expected X,Y"))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid x coordinate in '{value}'"))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|_| format!("invalid y coordinate in '{value}'"))?;
    Ok((x, y))
}
