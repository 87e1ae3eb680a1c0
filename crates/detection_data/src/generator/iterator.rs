//! src/generator/iterator.rs
//!
//! One pass over a shuffled catalog.
//!
//! Each call to `next()` runs `batch_size` samples through the pipeline and
//! stacks them. Nothing is prefetched: dropping the iterator halfway through
//! an epoch leaves nothing behind but the samples of the current batch.

use crate::batch::Batch;
use crate::catalog::Catalog;
use crate::policy::Pipeline;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use std::iter::FusedIterator;
use std::ops::Range;
use tracing::{debug, info, warn};

/// Iterator over the batches of a single epoch.
///
/// The last batch holds the remaining `len % batch_size` samples when the
/// catalog does not divide evenly; it is never dropped or padded.
///
/// The first error ends the epoch: it is yielded once and every later call
/// returns `None`.
pub struct BatchIter<'a> {
    catalog: &'a Catalog,
    pipeline: &'a Pipeline,
    order: Vec<usize>,
    batch_size: usize,
    cursor: usize,
    batch_index: usize,
    epoch: usize,
    rng: StdRng,
    failed: bool,
}

impl<'a> BatchIter<'a> {
    pub(crate) fn new(
        catalog: &'a Catalog,
        pipeline: &'a Pipeline,
        order: Vec<usize>,
        batch_size: usize,
        epoch: usize,
        rng: StdRng,
    ) -> Self {
        Self {
            catalog,
            pipeline,
            order,
            batch_size,
            cursor: 0,
            batch_index: 0,
            epoch,
            rng,
            failed: false,
        }
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Catalog indices in the order this epoch visits them.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    fn remaining(&self) -> usize {
        if self.failed {
            return 0;
        }
        (self.order.len() - self.cursor).div_ceil(self.batch_size)
    }

    fn assemble(&mut self, range: Range<usize>) -> Result<Batch> {
        let mut processed = Vec::with_capacity(range.len());

        for &index in &self.order[range] {
            let sample = self.catalog.samples()[index].clone();
            let out = self
                .pipeline
                .run(sample, &mut self.rng)
                .with_context(|| format!("Failed to process catalog entry {}", index))?;
            debug!(
                epoch = self.epoch,
                index,
                path = ?out.path,
                "sample processed"
            );
            processed.push(out);
        }

        Batch::collate(processed)
    }
}

impl Iterator for BatchIter<'_> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor >= self.order.len() {
            return None;
        }

        let start = self.cursor;
        let end = (start + self.batch_size).min(self.order.len());
        self.cursor = end;
        let batch_index = self.batch_index;
        self.batch_index += 1;

        match self.assemble(start..end) {
            Ok(batch) => {
                info!(
                    epoch = self.epoch,
                    batch = batch_index,
                    size = batch.len(),
                    shape = ?batch.shape(),
                    "applied ... ok"
                );
                Some(Ok(batch))
            }
            Err(e) => {
                self.failed = true;
                warn!(
                    epoch = self.epoch,
                    batch = batch_index,
                    error = %e,
                    "batch failed, ending epoch"
                );
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl FusedIterator for BatchIter<'_> {}
