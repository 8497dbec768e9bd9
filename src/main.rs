//! Histogram the residence times of oxygens in the first shell of a trajectory.
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use shellres::{AtomId, Config};

/// Track which oxygens stay within the first shell around a reference atom, and for how long.
///
/// Defaults apply to anything that is neither in the configuration file nor given as a flag.
#[derive(Parser)]
struct Args {
    /// Configuration file (toml). Flags take precedence over its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input path (text trajectory).
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output path for the histogram.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output path for the log of shell changes and residences.
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Oxygens strictly closer than this to the center atom are in the shell.
    #[arg(long)]
    shell_radius: Option<f64>,

    /// Time between consecutive frames.
    #[arg(long)]
    frame_time: Option<f64>,

    /// Width of a histogram bin.
    #[arg(long)]
    bin_width: Option<f64>,

    /// Number of histogram bins. Defaults to the number of frames.
    #[arg(long)]
    bins: Option<usize>,

    /// Id of the atom that marks the center of the shell.
    #[arg(long, allow_negative_numbers = true)]
    center_id: Option<AtomId>,

    /// Close residences that are still open at the end of the trajectory instead of dropping them.
    #[arg(long)]
    flush_open_on_eof: bool,
}

impl Args {
    fn into_config(self) -> shellres::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(log) = self.log {
            config.log = log;
        }
        if let Some(shell_radius) = self.shell_radius {
            config.shell_radius = shell_radius;
        }
        if let Some(frame_time) = self.frame_time {
            config.frame_time = frame_time;
        }
        if let Some(bin_width) = self.bin_width {
            config.bin_width = bin_width;
        }
        if let Some(center_id) = self.center_id {
            config.center_id = center_id;
        }
        if self.bins.is_some() {
            config.bins = self.bins;
        }
        config.flush_open_on_eof |= self.flush_open_on_eof;

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.into_config().and_then(|config| shellres::run(&config)) {
        Ok(summary) => {
            print!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Printed even when logging is off.
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
