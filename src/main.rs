//! Recomb CLI - Comb Filter Processor
//!
//! Command-line front end composing the pipeline components. All signal
//! processing lives in the library; this binary only parses arguments,
//! wires files through the pipeline, and prints the resulting reports.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use recomb::dsp::{FilterParameters, FilterType};
use recomb::pipeline;
use recomb::Result;

#[derive(Parser)]
#[command(name = "recomb-cli", version, about = "Comb filter processing and output verification")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a comb filter to a WAV file and write 16-bit PCM output
    Filter {
        /// Input WAV file
        input: PathBuf,
        /// Output WAV file
        output: PathBuf,
        /// Filter algorithm
        #[arg(long, value_enum, default_value = "fir")]
        filter: FilterType,
        /// Processing sample rate in Hz; input is resampled to this rate
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,
        /// Tap gain
        #[arg(long, default_value_t = 0.5)]
        gain: f32,
        /// Tap delay in seconds
        #[arg(long, default_value_t = 0.25)]
        delay_secs: f64,
        /// Load filter parameters from a JSON file instead of flags
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// Compare two WAV files sample by sample
    Compare {
        /// First file
        left: PathBuf,
        /// Second file
        right: PathBuf,
        /// Write the difference signal to this WAV file
        #[arg(long)]
        diff_output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("Recomb v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Filter {
            input,
            output,
            filter,
            sample_rate,
            gain,
            delay_secs,
            params,
        } => {
            let params = match params {
                Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
                None => FilterParameters::new(sample_rate, gain, delay_secs),
            };
            let report = pipeline::process_file(&input, &output, filter, &params)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Compare {
            left,
            right,
            diff_output,
        } => {
            let report = pipeline::compare_files(&left, &right, diff_output.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
