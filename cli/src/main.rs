use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use packet_source_core_rs::diagnostics::{
    histogram, ks_critical_value, ks_statistic, BatchSummary, SpectrumBins, SpectrumHistogram,
};
use packet_source_core_rs::sampling::{direction_cdf, direction_density};
use packet_source_core_rs::source::{
    generate_partitioned, BlackBodySource, PacketSource, PartitionPlan, SourceConfig,
};
use packet_source_core_rs::{BatchSnapshot, PacketBatch};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "packet-source")]
#[command(about = "Monte Carlo energy packets from a blackbody photosphere")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a packet batch and write a snapshot or print a summary
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Snapshot JSON file; prints a summary when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare the reweighted frequency histogram with the Planck curve
    Spectrum {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, default_value = "40")]
        bins: usize,

        /// Lower frequency edge (Hz)
        #[arg(long, default_value = "0")]
        nu_min: f64,

        /// Upper frequency edge (Hz); defaults to hν = 15 kT
        #[arg(long)]
        nu_max: Option<f64>,
    },

    /// Compare the direction cosines with the 2μ density
    Directions {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, default_value = "20")]
        bins: usize,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Photosphere temperature (K)
    #[arg(short, long, default_value = "10000")]
    temperature: f64,

    /// Photosphere radius (cm)
    #[arg(short, long, default_value = "1e15")]
    radius: f64,

    /// Number of packets
    #[arg(short = 'n', long, default_value = "40000")]
    packets: usize,

    /// Rng seed; overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON source config (seed, planck.tolerance, planck.max_terms)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate over independent sub-streams of this many packets
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Worker threads for sub-stream generation
    #[arg(long, default_value = "1")]
    threads: usize,
}

impl SourceArgs {
    fn load_config(&self) -> Result<SourceConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SourceConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }

    /// Sub-stream plan, present when `--chunk-size` was given
    fn partition(&self) -> Option<PartitionPlan> {
        self.chunk_size.map(|chunk_size| PartitionPlan {
            chunk_size,
            threads: self.threads,
        })
    }

    fn generate(&self, config: &SourceConfig) -> Result<PacketBatch> {
        let batch = match self.partition() {
            Some(plan) => {
                generate_partitioned(self.temperature, self.packets, self.radius, config, &plan)?
            }
            None => BlackBodySource::from_config(config)?.create_packets(
                self.temperature,
                self.packets,
                self.radius,
            )?,
        };
        Ok(batch)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate { source, output } => {
            let config = source.load_config()?;
            let batch = source.generate(&config)?;

            match output {
                Some(path) => {
                    let snapshot = BatchSnapshot::take(
                        &config,
                        source.partition(),
                        source.temperature,
                        source.radius,
                        batch,
                    )?;
                    fs::write(&path, snapshot.to_json()?)
                        .with_context(|| format!("writing snapshot {}", path.display()))?;
                    info!(
                        path = %path.display(),
                        digest = %snapshot.batch_digest,
                        "wrote snapshot"
                    );
                }
                None => {
                    let summary = BatchSummary::from_batch(&batch, source.temperature, source.radius)?;
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                }
            }
        }

        Commands::Spectrum {
            source,
            bins,
            nu_min,
            nu_max,
        } => {
            let config = source.load_config()?;
            let batch = source.generate(&config)?;

            let mut binning = SpectrumBins::for_temperature(source.temperature, bins);
            binning.nu_min = nu_min;
            if let Some(nu_max) = nu_max {
                binning.nu_max = nu_max;
            }
            let spectrum =
                SpectrumHistogram::from_batch(&batch, source.temperature, source.radius, &binning)?;

            println!(
                "{:>14} {:>8} {:>14} {:>14} {:>8}",
                "nu [Hz]", "count", "L_nu MC", "L_nu Planck", "ratio"
            );
            for (((nu, count), value), model) in spectrum
                .centers()
                .into_iter()
                .zip(spectrum.counts())
                .zip(spectrum.values())
                .zip(spectrum.model())
            {
                let ratio = if model > 0.0 { value / model } else { f64::NAN };
                println!(
                    "{:>14.6e} {:>8} {:>14.6e} {:>14.6e} {:>8.4}",
                    nu, count, value, model, ratio
                );
            }
            if let Some(deviation) = spectrum.max_relative_deviation(100) {
                println!("max relative deviation (bins >= 100 packets): {:.4}", deviation);
            }
        }

        Commands::Directions { source, bins } => {
            anyhow::ensure!(bins > 0, "--bins must be at least 1");
            let config = source.load_config()?;
            let batch = source.generate(&config)?;

            let counts = histogram(batch.mus(), 0.0, 1.0, bins);
            let n = batch.len() as f64;

            println!("{:>8} {:>8} {:>10} {:>10}", "mu", "count", "density", "2mu");
            for (i, count) in counts.iter().enumerate() {
                // 2μ is linear, so its value at the centre is the bin average
                let center = (i as f64 + 0.5) / bins as f64;
                let density = *count as f64 / n * bins as f64;
                println!(
                    "{:>8.4} {:>8} {:>10.4} {:>10.4}",
                    center,
                    count,
                    density,
                    direction_density(center)
                );
            }

            let d = ks_statistic(batch.mus(), direction_cdf);
            let critical = ks_critical_value(batch.len(), 0.05);
            println!(
                "KS D = {:.5} (5% critical value {:.5}): {}",
                d,
                critical,
                if d < critical { "pass" } else { "FAIL" }
            );
        }
    }

    Ok(())
}
