use std::{convert::Infallible, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::granularity::GranularityPreset;

#[derive(Debug, Parser)]
#[command(name = "cuecraft")]
#[command(about = "Turn speech-recognition SRT transcripts into SRT or ASS subtitle files.")]
pub struct Args {
    /// Path to config TOML (defaults to ./config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert one or more SRT transcripts
    Convert(ConvertCmd),
    /// Parse a transcript and print the first cues
    Preview(PreviewCmd),
    /// List granularity presets and the engine flags they map to
    Presets,
    /// Print the effective default config as TOML and exit
    PrintDefaultConfig,
}

#[derive(Debug, Parser)]
pub struct ConvertCmd {
    /// Input SRT paths, or '-' for stdin
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<String>,

    /// Output file path (single input only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for generated files (defaults to each input's directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Base name for the generated file, without extension
    #[arg(long)]
    pub name: Option<String>,

    /// Target format (defaults to config)
    #[arg(long, value_enum)]
    pub to: Option<Format>,

    /// Emit per-word karaoke timing (ASS only)
    #[arg(long)]
    pub karaoke: bool,

    /// Preset the transcript was produced with: low, medium, high or ultra (unknown means medium)
    #[arg(long, value_parser = parse_granularity)]
    pub granularity: Option<GranularityPreset>,

    /// Write to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Allow overwriting output file
    #[arg(long)]
    pub overwrite: bool,

    /// Print previews as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not print a preview after converting
    #[arg(long)]
    pub no_preview: bool,
}

#[derive(Debug, Parser)]
pub struct PreviewCmd {
    /// Input SRT path, or '-' for stdin
    pub input: String,

    /// Maximum number of cues to show (defaults to config)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Leave out timings
    #[arg(long)]
    pub compact: bool,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_granularity(s: &str) -> Result<GranularityPreset, Infallible> {
    Ok(GranularityPreset::parse_lenient(s))
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Srt,
    Ass,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Srt => "srt",
            Format::Ass => "ass",
        }
    }
}
