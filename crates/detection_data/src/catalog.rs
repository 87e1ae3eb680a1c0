use crate::discovery::{Discovery, Split};
use crate::error::DataError;
use crate::sample::Sample;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Ordered, read-only list of samples that make up a split.
///
/// Every sample starts unloaded (`ImageSource::Path`). The annotation
/// reference produced by discovery is stored as the sample's ground truth
/// and the class label starts absent.
///
/// The catalog is never mutated after construction. Each epoch of the
/// batch generator shuffles its own copy of the order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    samples: Vec<Sample>,
}

impl Catalog {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Pairs `filenames[i]` with `labels[i]`.
    ///
    /// # Errors
    /// A configuration error if the two lists differ in length.
    pub fn from_parts(filenames: Vec<PathBuf>, labels: Vec<String>) -> Result<Self> {
        if filenames.len() != labels.len() {
            return Err(DataError::config(format!(
                "{} filenames but {} labels",
                filenames.len(),
                labels.len()
            ))
            .into());
        }

        let samples = filenames
            .into_iter()
            .zip(labels)
            .map(|(filename, label)| Sample::from_path(filename).with_ground_truth(label))
            .collect();
        Ok(Self { samples })
    }

    /// Builds the catalog of `split` from whatever `discovery` reports.
    pub fn discover(discovery: &impl Discovery, split: Split) -> Result<Self> {
        let (filenames, labels) = discovery
            .filenames_and_labels(split)
            .with_context(|| format!("Failed to discover the {} split", split))?;
        Self::from_parts(filenames, labels)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }
}

impl FromIterator<Sample> for Catalog {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
