use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use tuningmaker::{
    config::{Config, TuningConfig},
    display::{Rendering, Unit, MIDDLE_C_FREQUENCY},
    pitchspace::FULL_SIGNATURE,
    weighting::WeightingPolicy,
};

/// Compute consensus tunings for scales of weighted just intervals
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YAML file with additional pitch spaces and a default tuning job
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all known pitch spaces and their signatures
    List,
    /// Tune a scale. Flags override the tuning job from the configuration file.
    Tune {
        /// Name of the pitch space
        #[arg(long)]
        pitch_space: Option<String>,

        /// Name of the signature within the pitch space
        #[arg(long)]
        signature: Option<String>,

        /// Number of degrees to tune
        #[arg(long)]
        degrees: Option<usize>,

        /// The degree that is tuned to unison
        #[arg(long)]
        root: Option<usize>,

        /// Between 0 (explore every path, slow) and 1 (direct intervals only)
        #[arg(long)]
        weight_cutoff: Option<f64>,

        /// Weight all intervals equally instead of by Tenney height
        #[arg(long, conflicts_with = "curve")]
        uniform: bool,

        /// Exponent applied to the Tenney height weights
        #[arg(long)]
        curve: Option<f64>,

        #[arg(long, value_enum, default_value_t = OutputUnit::Cents)]
        unit: OutputUnit,

        /// Frequency of the root when printing Hertz
        #[arg(long, default_value_t = MIDDLE_C_FREQUENCY)]
        base_frequency: f64,

        /// Number of worker threads
        #[arg(long, default_value_t = 1)]
        threads: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputUnit {
    Ratio,
    Cents,
    Hertz,
}

fn merge_job(
    base: Option<TuningConfig>,
    pitch_space: Option<String>,
    signature: Option<String>,
    degrees: Option<usize>,
    root: Option<usize>,
    weight_cutoff: Option<f64>,
    weighting: Option<WeightingPolicy>,
) -> Result<TuningConfig, Box<dyn Error>> {
    let mut job = match (base, pitch_space.clone(), degrees) {
        (Some(job), _, _) => job,
        (None, Some(pitch_space), Some(degrees)) => TuningConfig {
            pitch_space,
            signature: FULL_SIGNATURE.into(),
            degrees,
            root: 0,
            weight_cutoff: 0.0001,
            weighting: WeightingPolicy::default(),
        },
        _ => {
            return Err(
                "without a tuning job in the configuration, --pitch-space and --degrees are required"
                    .into(),
            )
        }
    };

    if let Some(x) = pitch_space {
        job.pitch_space = x;
    }
    if let Some(x) = signature {
        job.signature = x;
    }
    if let Some(x) = degrees {
        job.degrees = x;
    }
    if let Some(x) = root {
        job.root = x;
    }
    if let Some(x) = weight_cutoff {
        job.weight_cutoff = x;
    }
    if let Some(x) = weighting {
        job.weighting = x;
    }
    Ok(job)
}

pub fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            log::info!("reading configuration from {}", path.display());
            Config::load(path)?
        }
        None => Config::default(),
    };
    let registry = config.registry()?;

    match args.command {
        Commands::List => {
            for (name, space) in registry.iter() {
                let relations: Vec<String> =
                    space.table().iter().map(|r| r.to_string()).collect();
                println!("{name}: {}", relations.join(" "));
                for signature in space.signature_names() {
                    if let Some(degrees) = space.get_signature(signature) {
                        println!("  {signature}: {degrees:?}");
                    }
                }
            }
        }
        Commands::Tune {
            pitch_space,
            signature,
            degrees,
            root,
            weight_cutoff,
            uniform,
            curve,
            unit,
            base_frequency,
            threads,
        } => {
            let weighting = if uniform {
                Some(WeightingPolicy::Uniform)
            } else {
                curve.map(|curve| WeightingPolicy::TenneyHeight { curve })
            };
            let job = merge_job(
                config.tuning.clone(),
                pitch_space,
                signature,
                degrees,
                root,
                weight_cutoff,
                weighting,
            )?;

            let scale = job.realize(&registry)?;
            let tuning = if threads > 1 {
                scale.tune_scale_parallel(job.root, job.weight_cutoff(), threads)?
            } else {
                scale.tune_scale(job.root, job.weight_cutoff())?
            };

            let unit = match unit {
                OutputUnit::Ratio => Unit::Ratio,
                OutputUnit::Cents => Unit::Cents,
                OutputUnit::Hertz => Unit::Hertz { base_frequency },
            };

            println!("{}", scale.name().unwrap_or("scale"));
            print!(
                "{}",
                Rendering {
                    tuning: &tuning,
                    unit
                }
            );
        }
    }

    Ok(())
}
