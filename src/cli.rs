use clap::Parser;
use std::path::PathBuf;

use crate::audio::decode::DecodeMode;
use crate::report::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "beatsense", about = "Estimate the tempo (BPM) of audio recordings")]
pub struct Cli {
    /// Audio files or HTTPS URLs to analyze
    pub inputs: Vec<String>,

    /// Config file (defaults to ./beatsense.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// How to turn input bytes into PCM
    #[arg(long, value_enum)]
    pub decode: Option<DecodeMode>,

    /// Sample rate to assume, overriding the decoded stream's rate
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Only URLs starting with this prefix may be fetched
    #[arg(long, env = "BEATSENSE_ALLOWED_PREFIX")]
    pub allowed_prefix: Option<String>,

    /// Fetch timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Include onset timestamps and the dominant interval in the output
    #[arg(long)]
    pub onsets: bool,

    /// Include the source in the output even for a single input
    #[arg(long)]
    pub source_field: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}
