use crate::catalog::Catalog;
use crate::config::AugmentConfig;
use crate::discovery::{DirectoryDiscovery, Discovery, Split};
use crate::generator::{BatchGenerator, GeneratorConfig};
use crate::policy::{build_transforms, PolicyKind};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Everything a detection training run needs from disk: the train split
/// with the augmenting policy and the dev split with the load-only policy.
///
/// # Example
/// ```ignore
/// let data = TrainingData::new("data/images", "data/labels", &AugmentConfig::default())?;
/// let train = data.train_generator(GeneratorConfig::builder().batch_size(16).build())?;
/// let val = data.val_generator(GeneratorConfig::builder().batch_size(16).build())?;
/// ```
#[derive(Debug, Clone)]
pub struct TrainingData {
    train: Catalog,
    dev: Catalog,
    config: AugmentConfig,
}

impl TrainingData {
    /// Discovers both splits under `image_dir`/`label_dir` and validates
    /// `config` by building the train policy once.
    pub fn new(
        image_dir: impl Into<PathBuf>,
        label_dir: impl Into<PathBuf>,
        config: &AugmentConfig,
    ) -> Result<Self> {
        let discovery = DirectoryDiscovery::new(image_dir, label_dir);
        Self::with_discovery(&discovery, config)
    }

    pub fn with_discovery(discovery: &impl Discovery, config: &AugmentConfig) -> Result<Self> {
        build_transforms(PolicyKind::Train, config).context("Invalid augmentation config")?;

        Ok(Self {
            train: Catalog::discover(discovery, Split::Train)?,
            dev: Catalog::discover(discovery, Split::Dev)?,
            config: config.clone(),
        })
    }

    pub fn train_catalog(&self) -> &Catalog {
        &self.train
    }

    pub fn dev_catalog(&self) -> &Catalog {
        &self.dev
    }

    /// Generator over the train split with the augmenting policy.
    pub fn train_generator(&self, config: GeneratorConfig) -> Result<BatchGenerator> {
        let pipeline = build_transforms(PolicyKind::Train, &self.config)?;
        BatchGenerator::new(self.train.clone(), pipeline, config)
    }

    /// Generator over the dev split with the load-only policy.
    pub fn val_generator(&self, config: GeneratorConfig) -> Result<BatchGenerator> {
        let pipeline = build_transforms(PolicyKind::Val, &self.config)?;
        BatchGenerator::new(self.dev.clone(), pipeline, config)
    }
}
