use crate::sample::Sample;
use anyhow::Result;
use rand::Rng;

use super::combinators::{ProbabilisticGate, RandomPick, Sequential};
use super::io::LoadImage;
use super::photometric::{Brightness, ChannelReorder, Contrast, Hue, Saturation};

/// Defines the core `Transform` trait for augmentation pipelines.
///
/// A `Transform` maps one `(image, label, ground_truth)` [`Sample`] to
/// another. Every call:
/// - takes the sample by value, so a buffer the caller still holds is never
///   mutated behind its back,
/// - draws all of its randomness from the `rng` handed in, so a seeded
///   generator makes the whole pipeline reproducible,
/// - returns an [`Applied`] carrying the description of the path actually
///   taken (which branch a random pick chose, for example).
///
/// `describe()` is the configuration-level description and never depends on
/// earlier calls.
pub trait Transform: Send + Sync {
    /// Applies the transformation to the sample.
    fn apply<R>(&self, sample: Sample, rng: &mut R) -> Result<Applied>
    where
        R: Rng + ?Sized;

    /// Human-readable name of this operation.
    fn describe(&self) -> String;
}

/// Result of a single [`Transform::apply`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub sample: Sample,
    /// Description of the operation that produced `sample`.
    pub description: String,
}

impl Applied {
    pub fn new(sample: Sample, description: impl Into<String>) -> Self {
        Self {
            sample,
            description: description.into(),
        }
    }
}

/// The closed set of operations a pipeline is built from.
///
/// Each variant holds its own typed configuration. Combinators own their
/// children as `Operation`s, so arbitrarily nested policies are plain
/// values that are `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub enum Operation {
    Load(LoadImage),
    Brightness(Brightness),
    Contrast(Contrast),
    Hue(Hue),
    Saturation(Saturation),
    ChannelReorder(ChannelReorder),
    Sequential(Sequential),
    Gate(ProbabilisticGate),
    Pick(RandomPick),
}

impl Operation {
    /// Chains `next` after `self` into a [`Sequential`].
    ///
    /// Chaining onto an existing `Sequential` appends to it instead of
    /// nesting.
    pub fn then(self, next: impl Into<Operation>) -> Operation {
        match self {
            Operation::Sequential(seq) => Operation::Sequential(seq.push(next.into())),
            first => Operation::Sequential(Sequential::new(vec![first, next.into()])),
        }
    }
}

impl Transform for Operation {
    fn apply<R>(&self, sample: Sample, rng: &mut R) -> Result<Applied>
    where
        R: Rng + ?Sized,
    {
        match self {
            Operation::Load(op) => op.apply(sample, rng),
            Operation::Brightness(op) => op.apply(sample, rng),
            Operation::Contrast(op) => op.apply(sample, rng),
            Operation::Hue(op) => op.apply(sample, rng),
            Operation::Saturation(op) => op.apply(sample, rng),
            Operation::ChannelReorder(op) => op.apply(sample, rng),
            Operation::Sequential(op) => op.apply(sample, rng),
            Operation::Gate(op) => op.apply(sample, rng),
            Operation::Pick(op) => op.apply(sample, rng),
        }
    }

    fn describe(&self) -> String {
        match self {
            Operation::Load(op) => op.describe(),
            Operation::Brightness(op) => op.describe(),
            Operation::Contrast(op) => op.describe(),
            Operation::Hue(op) => op.describe(),
            Operation::Saturation(op) => op.describe(),
            Operation::ChannelReorder(op) => op.describe(),
            Operation::Sequential(op) => op.describe(),
            Operation::Gate(op) => op.describe(),
            Operation::Pick(op) => op.describe(),
        }
    }
}

macro_rules! impl_into_operation {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Operation {
                fn from(op: $ty) -> Self {
                    Operation::$variant(op)
                }
            }
        )*
    };
}

impl_into_operation! {
    LoadImage => Load,
    Brightness => Brightness,
    Contrast => Contrast,
    Hue => Hue,
    Saturation => Saturation,
    ChannelReorder => ChannelReorder,
    Sequential => Sequential,
    ProbabilisticGate => Gate,
    RandomPick => Pick,
}
