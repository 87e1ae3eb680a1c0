//! src/policy.rs
//!
//! Fixed augmentation policies for the training and evaluation splits.
//!
//! ```text
//! train: Load
//!        → Gate(0.5, Brightness(100))
//!        → Pick[ Compose(Contrast(0.5, 1.8), Hue(100)),
//!                Compose(Hue(100), Saturation(0.5, 1.8)) ]
//!        → Gate(0.5, ChannelReorder)
//!
//! val:   Load
//! ```
//!
//! Evaluation only decodes the image so results are reproducible across
//! runs.

use crate::config::AugmentConfig;
use crate::sample::Sample;
use crate::transforms::{
    Brightness, ChannelReorder, Contrast, Hue, LoadImage, Operation, ProbabilisticGate,
    RandomPick, Saturation, Sequential, Transform,
};
use anyhow::{Context, Result};
use rand::Rng;
use std::fmt;
use tracing::debug;

/// Which policy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Train,
    Val,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Train => write!(f, "train"),
            PolicyKind::Val => write!(f, "val"),
        }
    }
}

/// Ordered list of operations applied to every sample of a split.
///
/// Built once and only read afterwards, so one `Pipeline` can be shared by
/// every epoch (and every thread).
#[derive(Debug, Clone)]
pub struct Pipeline {
    kind: PolicyKind,
    ops: Vec<Operation>,
}

/// A sample after the whole pipeline ran, with one description per
/// top-level operation naming what actually ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub sample: Sample,
    pub path: Vec<String>,
}

impl Pipeline {
    pub fn new(kind: PolicyKind, ops: Vec<Operation>) -> Self {
        Self { kind, ops }
    }

    pub fn kind(&self) -> PolicyKind {
        self.kind
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Configuration-level description of every top-level operation.
    pub fn describe(&self) -> Vec<String> {
        self.ops.iter().map(Transform::describe).collect()
    }

    /// Threads `sample` through every operation in order.
    pub fn run<R>(&self, sample: Sample, rng: &mut R) -> Result<Processed>
    where
        R: Rng + ?Sized,
    {
        let mut sample = sample;
        let mut path = Vec::with_capacity(self.ops.len());

        for op in &self.ops {
            let applied = op
                .apply(sample, rng)
                .with_context(|| format!("{} failed in {} policy", op.describe(), self.kind))?;
            debug!(policy = %self.kind, op = %applied.description, "applied ... ok");
            path.push(applied.description);
            sample = applied.sample;
        }

        Ok(Processed { sample, path })
    }
}

/// Wraps `op` in a gate unless it would always fire.
fn gated(p: f64, op: impl Into<Operation>) -> Result<Operation> {
    if p >= 1.0 {
        Ok(op.into())
    } else {
        Ok(ProbabilisticGate::new(p, op)?.into())
    }
}

/// Builds the policy for `kind` from `config`.
///
/// Fails with a configuration error if any bound or probability in
/// `config` is invalid.
pub fn build_transforms(kind: PolicyKind, config: &AugmentConfig) -> Result<Pipeline> {
    let ops = match kind {
        PolicyKind::Val => vec![LoadImage::new().into()],
        PolicyKind::Train => {
            let brightness = ProbabilisticGate::new(
                config.brightness_prob,
                Brightness::new(config.brightness_delta)?,
            )?;

            let (c_lo, c_hi) = config.contrast_range;
            let (s_lo, s_hi) = config.saturation_range;
            let contrast = gated(config.distort_prob, Contrast::new(c_lo, c_hi)?)?;
            let hue = gated(config.distort_prob, Hue::new(config.hue_delta)?)?;
            let saturation = gated(config.distort_prob, Saturation::new(s_lo, s_hi)?)?;

            let distort = RandomPick::new(vec![
                Sequential::new(vec![contrast, hue.clone()]).into(),
                Sequential::new(vec![hue, saturation]).into(),
            ])?;

            let channels_reorder =
                ProbabilisticGate::new(config.channel_reorder_prob, ChannelReorder::new())?;

            vec![
                LoadImage::new().into(),
                brightness.into(),
                distort.into(),
                channels_reorder.into(),
            ]
        }
    };

    Ok(Pipeline::new(kind, ops))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::sample::Image;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_val_policy_is_load_only() -> Result<()> {
        let pipeline = build_transforms(PolicyKind::Val, &AugmentConfig::default())?;
        assert_eq!(pipeline.describe(), vec!["ImageLoader Transform"]);

        let mut rng = StdRng::seed_from_u64(0);
        let image = Image::from_elem((2, 2, 3), 9);
        let processed = pipeline.run(Sample::from_image(image.clone()), &mut rng)?;
        assert_eq!(processed.sample.image.as_decoded(), Some(&image));
        Ok(())
    }

    #[test]
    fn test_train_policy_layout() -> Result<()> {
        let pipeline = build_transforms(PolicyKind::Train, &AugmentConfig::default())?;
        assert_eq!(
            pipeline.describe(),
            vec![
                "ImageLoader Transform",
                "Brightness Transform",
                "Random Pick [Compose Transform [Contrast Transform, Hue Transform] \
                 | Compose Transform [Hue Transform, Saturation Transform]]",
                "Channels Reorder Transform",
            ]
        );
        assert!(matches!(pipeline.ops()[1], Operation::Gate(ref g) if g.probability() == 0.5));
        assert!(matches!(pipeline.ops()[3], Operation::Gate(ref g) if g.probability() == 0.5));
        Ok(())
    }

    #[test]
    fn test_gated_distortions() -> Result<()> {
        let config = AugmentConfig {
            distort_prob: 0.5,
            ..AugmentConfig::default()
        };
        let pipeline = build_transforms(PolicyKind::Train, &config)?;
        let Operation::Pick(pick) = &pipeline.ops()[2] else {
            panic!("expected a random pick");
        };
        for branch in pick.ops() {
            let Operation::Sequential(seq) = branch else {
                panic!("expected a sequence");
            };
            assert!(seq.ops().iter().all(|op| matches!(op, Operation::Gate(_))));
        }
        Ok(())
    }

    #[test]
    fn test_train_path_names_the_branch_taken() -> Result<()> {
        let pipeline = build_transforms(PolicyKind::Train, &AugmentConfig::default())?;
        let mut rng = StdRng::seed_from_u64(21);
        let image = Image::from_shape_fn((4, 4, 3), |(y, x, c)| (y * 50 + x * 20 + c * 10) as u8);

        for _ in 0..50 {
            let processed = pipeline.run(Sample::from_image(image.clone()), &mut rng)?;
            assert_eq!(processed.path.len(), 4);
            assert!(
                processed.path[2] == "Compose Transform [Contrast Transform, Hue Transform]"
                    || processed.path[2] == "Compose Transform [Hue Transform, Saturation Transform]"
            );
            assert_eq!(processed.sample.image.as_decoded().unwrap().dim(), (4, 4, 3));
        }
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AugmentConfig {
            brightness_prob: 2.0,
            ..AugmentConfig::default()
        };
        let err = build_transforms(PolicyKind::Train, &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::Configuration(_))
        ));
    }
}
