use anyhow::{Context, Result};
use clap::Parser;
use detection_data::{
    build_transforms, AugmentConfig, BatchGenerator, Catalog, DirectoryDiscovery, GeneratorConfig,
    PolicyKind, Split,
};
use std::{env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};

/// Iterate a dataset split through its augmentation policy and log every
/// batch, without training anything.
#[derive(Parser, Debug)]
#[command(name = "preview_batches", version)]
struct Args {
    /// Directory holding `train/` and `dev/` image folders
    #[arg(long)]
    image_dir: PathBuf,

    /// Directory holding `train/` and `dev/` annotation folders
    #[arg(long)]
    label_dir: PathBuf,

    /// Split to iterate (`train` uses the augmenting policy)
    #[arg(long, default_value = "train")]
    split: Split,

    #[arg(long, default_value_t = 8)]
    batch_size: usize,

    #[arg(long, default_value_t = 1)]
    epochs: usize,

    /// Base seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding the augmentation parameters
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // setup tracing
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true).compact();
    let filter_layer = {
        let filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            filter.add_directive(LevelFilter::INFO.into())
        } else {
            filter
        }
    };
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let args = Args::parse();

    let augment = match &args.config {
        Some(path) => AugmentConfig::from_json_file(path)
            .with_context(|| format!("failed to load config file '{}'", path.display()))?,
        None => AugmentConfig::default(),
    };
    let kind = match args.split {
        Split::Train => PolicyKind::Train,
        Split::Dev => PolicyKind::Val,
    };

    let discovery = DirectoryDiscovery::new(&args.image_dir, &args.label_dir);
    let catalog = Catalog::discover(&discovery, args.split)?;
    let pipeline = build_transforms(kind, &augment)?;
    for (step, op) in pipeline.describe().iter().enumerate() {
        info!(step, op = %op, "policy");
    }

    let mut config = GeneratorConfig::builder().batch_size(args.batch_size);
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    let generator = BatchGenerator::new(catalog, pipeline, config.build())?;

    for _ in 0..args.epochs {
        let mut samples = 0;
        let iter = generator.epoch()?;
        let epoch = iter.epoch();
        for batch in iter {
            samples += batch?.len();
        }
        info!(epoch, samples, "epoch done");
    }

    Ok(())
}
