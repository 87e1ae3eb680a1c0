//! src/transforms/mod.rs
//!
//! Augmentation operations and the combinators that compose them.
//!
//! # Module Organization
//!
//! ```text
//! transforms/
//! ├── core.rs          → `Transform` trait, `Applied`, `Operation` enum
//! ├── io.rs            → Image loading (path → BGR buffer)
//! ├── photometric.rs   → Brightness, contrast, hue, saturation, channel reorder
//! ├── color.rs         → BGR <-> HSV conversion used by hue/saturation
//! └── combinators.rs   → Sequential, ProbabilisticGate, RandomPick
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::transforms::*;
//!
//! let policy = Operation::from(LoadImage::new())
//!     .then(ProbabilisticGate::new(0.5, Brightness::new(100)?)?)
//!     .then(ProbabilisticGate::new(0.5, ChannelReorder::new())?);
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let applied = policy.apply(Sample::from_path("cat.jpg"), &mut rng)?;
//! ```

pub mod color;
pub mod combinators;
pub mod core;
pub mod io;
pub mod photometric;

pub use self::core::{Applied, Operation, Transform};
pub use combinators::{ProbabilisticGate, RandomPick, Sequential};
pub use io::LoadImage;
pub use photometric::{Brightness, ChannelReorder, Contrast, Hue, Saturation};
