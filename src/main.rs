//! digit-net CLI
//!
//! Trains, scores and inspects a 3-layer sigmoid digit classifier.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use digit_net::data::{load_csv, to_ascii};
use digit_net::eval::{misclassified, predictions, Prediction};
use digit_net::{Network, NetworkDims, ParameterStore, TrainConfig};

#[derive(Parser)]
#[command(name = "digit-net")]
#[command(about = "3-layer sigmoid network trained with mini-batch SGD", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Level {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Network shape; must match any weight file that is loaded.
#[derive(Args)]
struct ShapeArgs {
    /// Input features per sample
    #[arg(long, default_value = "784")]
    inputs: usize,

    /// Hidden units
    #[arg(long, default_value = "128")]
    hidden: usize,

    /// Output classes
    #[arg(long, default_value = "10")]
    outputs: usize,
}

impl ShapeArgs {
    fn dims(&self) -> NetworkDims {
        NetworkDims::new(self.inputs, self.hidden, self.outputs)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Train a network and report per-epoch training accuracy
    Train {
        /// Training set, one `label,p0,...` row per sample
        #[arg(long)]
        train_csv: PathBuf,

        /// Read at most this many samples
        #[arg(long)]
        limit: Option<usize>,

        /// JSON file with epochs / batch_size / learning_rate / seed
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        epochs: Option<usize>,

        #[arg(long)]
        batch_size: Option<usize>,

        #[arg(long)]
        learning_rate: Option<f64>,

        #[arg(long)]
        seed: Option<u64>,

        /// Start from these weights instead of random ones
        #[arg(long)]
        load: Option<PathBuf>,

        /// Write the trained weights here
        #[arg(long)]
        save: Option<PathBuf>,

        #[command(flatten)]
        shape: ShapeArgs,
    },

    /// Score saved weights on a dataset
    Eval {
        #[arg(long)]
        weights: PathBuf,

        #[arg(long)]
        csv: PathBuf,

        #[arg(long)]
        limit: Option<usize>,

        /// Label printed in front of the result
        #[arg(long, default_value = "TEST")]
        tag: String,

        #[command(flatten)]
        shape: ShapeArgs,
    },

    /// Print samples as ASCII art with their labeled and predicted classes
    Step {
        #[arg(long)]
        weights: PathBuf,

        #[arg(long)]
        csv: PathBuf,

        /// Only show misclassified samples
        #[arg(long)]
        only_wrong: bool,

        /// Stop after printing this many samples
        #[arg(long, default_value = "10")]
        max: usize,

        #[command(flatten)]
        shape: ShapeArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Train {
            train_csv,
            limit,
            config,
            epochs,
            batch_size,
            learning_rate,
            seed,
            load,
            save,
            shape,
        } => {
            let mut cfg = match config {
                Some(path) => TrainConfig::load_json(&path)
                    .with_context(|| format!("reading config {}", path.display()))?,
                None => TrainConfig::default(),
            };
            if let Some(v) = epochs { cfg.epochs = v; }
            if let Some(v) = batch_size { cfg.batch_size = v; }
            if let Some(v) = learning_rate { cfg.learning_rate = v; }
            if let Some(v) = seed { cfg.seed = v; }
            cfg.validate()?;

            run_train(&train_csv, limit, &cfg, load, save, shape.dims())
        }
        Commands::Eval { weights, csv, limit, tag, shape } => {
            let net = load_network(&weights, shape.dims())?;
            let samples = load_csv(&csv, net.dims(), limit)
                .with_context(|| format!("loading {}", csv.display()))?;
            println!("{} accuracy = {}", tag, net.evaluate(&samples));
            Ok(())
        }
        Commands::Step { weights, csv, only_wrong, max, shape } => {
            let net = load_network(&weights, shape.dims())?;
            let samples = load_csv(&csv, net.dims(), None)
                .with_context(|| format!("loading {}", csv.display()))?;

            let shown: Box<dyn Iterator<Item = Prediction> + '_> = if only_wrong {
                Box::new(misclassified(&net.params, &samples))
            } else {
                Box::new(predictions(&net.params, &samples))
            };
            for p in shown.take(max) {
                let marker = if p.is_correct() { "" } else { "  WRONG" };
                println!("\n#{}{}", p.index, marker);
                print!("{}", to_ascii(samples[p.index].features()));
                println!("LABELED = {} // PREDICTED = {}", p.label, p.predicted);
            }
            Ok(())
        }
    }
}

fn run_train(
    train_csv: &Path,
    limit: Option<usize>,
    cfg: &TrainConfig,
    load: Option<PathBuf>,
    save: Option<PathBuf>,
    dims: NetworkDims,
) -> Result<()> {
    // One generator drives both initialization and shuffling.
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut net = Network::new(dims, cfg.learning_rate, &mut rng)?;
    if let Some(path) = &load {
        net.load(path).with_context(|| format!("loading weights {}", path.display()))?;
        info!(path = %path.display(), "starting from saved weights");
    }

    let samples = load_csv(train_csv, dims, limit)
        .with_context(|| format!("loading {}", train_csv.display()))?;
    info!(samples = samples.len(), dims = %dims, epochs = cfg.epochs, batch_size = cfg.batch_size,
          learning_rate = cfg.learning_rate, "training");

    net.train(&samples, cfg.epochs, cfg.batch_size, &mut rng, |stats| {
        println!("Epoch {:2} Accuracy = {}", stats.epoch, stats.train_accuracy);
    })?;

    if let Some(path) = &save {
        net.save(path).with_context(|| format!("saving weights {}", path.display()))?;
        println!("SAVED {}", path.display());
    }
    Ok(())
}

fn load_network(weights: &Path, dims: NetworkDims) -> Result<Network> {
    dims.validate()?;
    let mut net = Network::from_params(ParameterStore::zeros(dims), TrainConfig::default().learning_rate);
    net.load(weights)
        .with_context(|| format!("loading weights {}", weights.display()))?;
    Ok(net)
}
