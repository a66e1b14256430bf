mod audio;
mod cli;
mod config;
mod error;
mod fetch;
mod report;
mod source;
mod tempo;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use cli::Cli;
use config::Config;
use fetch::FetchPolicy;
use report::Report;
use source::AudioSource;
use tempo::TempoAnalysis;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    let mut config = match config::find_config_path(cli.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            // An explicitly requested config must load.
            Err(err) if cli.config.is_some() => return Err(err),
            Err(err) => {
                log::warn!("{:#}", err);
                Config::default()
            }
        },
        None => Config::default(),
    };
    apply_overrides(&cli, &mut config);
    config.validate()?;

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    if cli.inputs.is_empty() {
        anyhow::bail!("At least one input file or URL is required");
    }

    let policy = FetchPolicy {
        allowed_prefix: config.fetch.allowed_prefix.clone(),
        timeout: Duration::from_secs(config.fetch.timeout_secs),
        user_agent: config.fetch.user_agent.clone(),
    };
    let with_source = cli.source_field || cli.inputs.len() > 1;

    let pb = if cli.inputs.len() > 1 && !cli.quiet {
        let pb = ProgressBar::new(cli.inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta} remaining)")?
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    // Each input runs its own pipeline; nothing is shared between them.
    let reports: Vec<Report> = cli
        .inputs
        .par_iter()
        .map(|input| {
            let source = with_source.then(|| input.clone());
            let report = match analyze_input(input, &config, &policy) {
                Ok(analysis) => Report::success(source, analysis, cli.onsets),
                Err(err) => {
                    log::error!("Error detecting BPM for {}: {:#}", input, err);
                    Report::failure(source, &err)
                }
            };
            pb.inc(1);
            report
        })
        .collect();

    pb.finish_and_clear();

    let format = config.output.format;
    for report in &reports {
        println!("{}", report.render(format));
    }

    if reports.iter().all(Report::is_success) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(mode) = cli.decode {
        config.audio.decode = mode;
    }
    if cli.sample_rate.is_some() {
        config.audio.sample_rate = cli.sample_rate;
    }
    if cli.allowed_prefix.is_some() {
        config.fetch.allowed_prefix = cli.allowed_prefix.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.fetch.timeout_secs = timeout;
    }
}

fn analyze_input(input: &str, config: &Config, policy: &FetchPolicy) -> Result<TempoAnalysis> {
    let source = AudioSource::parse(input);
    log::info!("Processing audio file: {}", source);

    let loaded = source.load(policy)?;
    let buffer = audio::decode::decode_pcm(
        &loaded.bytes,
        loaded.extension.as_deref(),
        config.audio.decode,
        config.audio.sample_rate,
    )?;

    Ok(tempo::analyze(&buffer, &config.analysis))
}
