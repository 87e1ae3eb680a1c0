//! src/generator/mod.rs
//!
//! Lazy, restartable batch generation.
//!
//! ```text
//!        ┌─────────┐
//!        │ Catalog │ (ordered, read-only samples)
//!        └────┬────┘
//!             │ epoch e: copy + shuffle with StdRng(seed + e)
//!             ↓
//!      ┌──────────────┐
//!      │   Pipeline   │ (train / val policy, same RNG stream)
//!      └──────┬───────┘
//!             │ one sample at a time, pulled by next()
//!             ↓
//!        ┌─────────┐
//!        │  Batch  │ [batch, height, width, channel] + parallel lists
//!        └─────────┘
//! ```
//!
//! # Module Structure
//!
//! ```text
//! src/generator/
//! ├── mod.rs        # Public API exports
//! ├── config.rs     # GeneratorConfig and builder
//! ├── loader.rs     # BatchGenerator, epoch seeding
//! └── iterator.rs   # BatchIter, one epoch
//! ```
//!
//! # Example Usage
//! ```ignore
//! let catalog = Catalog::discover(&DirectoryDiscovery::new(images, labels), Split::Train)?;
//! let pipeline = build_transforms(PolicyKind::Train, &AugmentConfig::default())?;
//! let config = GeneratorConfig::builder().batch_size(8).seed(42).build();
//! let generator = BatchGenerator::new(catalog, pipeline, config)?;
//!
//! for epoch in 0..10 {
//!     for batch in generator.epoch()? {
//!         let batch = batch?;
//!         // batch.images: [8, H, W, 3]
//!     }
//! }
//! ```

mod config;
mod iterator;
mod loader;

pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use iterator::BatchIter;
pub use loader::BatchGenerator;
