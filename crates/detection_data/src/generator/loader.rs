//! src/generator/loader.rs
//!
//! The `BatchGenerator` ties a [`Catalog`] to a [`Pipeline`].
//!
//! # Seeding
//!
//! Every epoch derives its own RNG as `StdRng::seed_from_u64(base_seed + epoch)`.
//! The same stream shuffles the catalog and then drives every random
//! operation of that epoch, so with a fixed seed an epoch is a pure function
//! of `(catalog, pipeline, batch_size, epoch)`:
//!
//! ```ignore
//! let generator = BatchGenerator::new(catalog, pipeline, config)?;
//! let first: Vec<Batch> = generator.iter_epoch(0, 8)?.collect::<Result<_>>()?;
//! let again: Vec<Batch> = generator.iter_epoch(0, 8)?.collect::<Result<_>>()?;
//! assert_eq!(first, again);
//! ```

use crate::catalog::Catalog;
use crate::error::DataError;
use crate::policy::Pipeline;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

use super::config::GeneratorConfig;
use super::iterator::BatchIter;

/// Produces shuffled, augmented batches from a catalog, one epoch per
/// iterator.
///
/// # Thread safety
/// - `BatchGenerator` is Send + Sync; the catalog and pipeline are only
///   read.
/// - Each [`BatchIter`] owns its RNG and is driven by a single thread.
/// - Any number of iterators may be alive at once; each gets the next
///   epoch number.
#[derive(Debug)]
pub struct BatchGenerator {
    catalog: Catalog,
    pipeline: Pipeline,
    batch_size: usize,
    base_seed: u64,
    current_epoch: AtomicUsize,
}

impl BatchGenerator {
    /// Creates a generator starting at epoch 0.
    ///
    /// # Errors
    /// A configuration error if `config.batch_size` is `Some(0)`.
    pub fn new(catalog: Catalog, pipeline: Pipeline, config: GeneratorConfig) -> Result<Self> {
        let batch_size = config.batch_size.unwrap_or(1);
        check_batch_size(batch_size)?;

        let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());
        info!(
            policy = %pipeline.kind(),
            samples = catalog.len(),
            base_seed,
            "batch generator ready"
        );

        Ok(Self {
            catalog,
            pipeline,
            batch_size,
            base_seed,
            current_epoch: AtomicUsize::new(0),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Number of batches one epoch yields for `batch_size`.
    pub fn num_batches(&self, batch_size: usize) -> usize {
        if batch_size == 0 {
            return 0;
        }
        self.catalog.len().div_ceil(batch_size)
    }

    /// Starts the next epoch with the configured batch size.
    pub fn epoch(&self) -> Result<BatchIter<'_>> {
        self.iter(self.batch_size)
    }

    /// Starts the next epoch with the given batch size.
    ///
    /// # Errors
    /// A configuration error if `batch_size` is 0.
    pub fn iter(&self, batch_size: usize) -> Result<BatchIter<'_>> {
        check_batch_size(batch_size)?;
        let epoch = self.current_epoch.fetch_add(1, Ordering::Relaxed);
        self.iter_epoch(epoch, batch_size)
    }

    /// Replays a specific epoch without advancing the epoch counter.
    pub fn iter_epoch(&self, epoch: usize, batch_size: usize) -> Result<BatchIter<'_>> {
        check_batch_size(batch_size)?;

        let mut rng = StdRng::seed_from_u64(self.base_seed.wrapping_add(epoch as u64));
        let mut order: Vec<usize> = (0..self.catalog.len()).collect();
        order.shuffle(&mut rng);

        Ok(BatchIter::new(
            &self.catalog,
            &self.pipeline,
            order,
            batch_size,
            epoch,
            rng,
        ))
    }
}

fn check_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(DataError::config("batch size must be greater than 0").into());
    }
    Ok(())
}
