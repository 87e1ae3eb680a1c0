//! src/generator/config.rs
//!
//! Configuration for the batch generator.
//!
//! Example:
//! ```ignore
//! let config = GeneratorConfig::builder()
//!     .batch_size(16)
//!     .seed(42)
//!     .build();
//! ```

/// Configuration for [`BatchGenerator`](super::BatchGenerator)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Batch size used by `BatchGenerator::epoch()` (defaults to 1 if not
    /// specified). `BatchGenerator::iter()` takes its own.
    pub batch_size: Option<usize>,
    /// Base seed for shuffling and augmentation. Drawn from the thread RNG
    /// when absent, so runs differ.
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }
}

/// Builder for GeneratorConfig with method chaining
#[derive(Default)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    /// Set the default batch size (must be > 0)
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = Some(size);
        self
    }

    /// Set the base seed.
    ///
    /// Epoch `e` shuffles and augments with an RNG seeded from
    /// `seed + e`, so a fixed seed replays every epoch exactly.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}
