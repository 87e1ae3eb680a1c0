//! Operations that compose other operations.
//!
//! - [`Sequential`]: runs a fixed list in order.
//! - [`ProbabilisticGate`]: runs its child with probability `p`.
//! - [`RandomPick`]: runs exactly one child, picked uniformly.

use crate::error::DataError;
use crate::sample::Sample;
use crate::transforms::core::{Applied, Operation, Transform};
use anyhow::{Context, Result};
use rand::Rng;

// ============================================================================
// Sequential
// ============================================================================

/// Applies a fixed list of operations in order, threading the sample
/// through each. An empty list is the identity.
///
/// The description is the combinator's own, listing its children by their
/// configured names.
#[derive(Debug, Clone, Default)]
pub struct Sequential {
    ops: Vec<Operation>,
}

impl Sequential {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    pub(crate) fn push(mut self, op: Operation) -> Self {
        self.ops.push(op);
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }
}

impl Transform for Sequential {
    fn apply<R>(&self, sample: Sample, rng: &mut R) -> Result<Applied>
    where
        R: Rng + ?Sized,
    {
        let mut sample = sample;
        for (step, op) in self.ops.iter().enumerate() {
            sample = op
                .apply(sample, rng)
                .with_context(|| format!("step {} ({}) failed", step, op.describe()))?
                .sample;
        }
        Ok(Applied::new(sample, self.describe()))
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.ops.iter().map(Transform::describe).collect();
        format!("Compose Transform [{}]", names.join(", "))
    }
}

// ============================================================================
// ProbabilisticGate
// ============================================================================

/// Applies the wrapped operation with probability `p`, otherwise passes the
/// sample through unchanged.
///
/// Exactly one uniform value in `[0, 1)` is drawn per call, whether or not
/// the child fires. The description is always the child's.
///
/// # Example
/// ```ignore
/// let gate = ProbabilisticGate::new(0.5, Brightness::new(100)?)?;
/// ```
#[derive(Debug, Clone)]
pub struct ProbabilisticGate {
    p: f64,
    op: Box<Operation>,
}

impl ProbabilisticGate {
    pub fn new(p: f64, op: impl Into<Operation>) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(DataError::config(format!(
                "Probability must be in [0.0, 1.0] range (got {})",
                p
            ))
            .into());
        }
        Ok(Self {
            p,
            op: Box::new(op.into()),
        })
    }

    pub fn probability(&self) -> f64 {
        self.p
    }

    pub fn inner(&self) -> &Operation {
        &self.op
    }
}

impl Transform for ProbabilisticGate {
    fn apply<R>(&self, sample: Sample, rng: &mut R) -> Result<Applied>
    where
        R: Rng + ?Sized,
    {
        let draw: f64 = rng.random();
        if draw < self.p {
            self.op.apply(sample, rng)
        } else {
            Ok(Applied::new(sample, self.describe()))
        }
    }

    fn describe(&self) -> String {
        self.op.describe()
    }
}

// ============================================================================
// RandomPick
// ============================================================================

/// Applies exactly one operation chosen uniformly at random.
///
/// The [`Applied::description`] returned from each call names the branch
/// that actually ran, so concurrent callers never see each other's choice.
#[derive(Debug, Clone)]
pub struct RandomPick {
    ops: Vec<Operation>,
}

impl RandomPick {
    /// Fails with [`DataError::Configuration`] if `ops` is empty.
    pub fn new(ops: Vec<Operation>) -> Result<Self> {
        if ops.is_empty() {
            return Err(DataError::config("RandomPick needs at least one operation").into());
        }
        Ok(Self { ops })
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }
}

impl Transform for RandomPick {
    fn apply<R>(&self, sample: Sample, rng: &mut R) -> Result<Applied>
    where
        R: Rng + ?Sized,
    {
        let pick = rng.random_range(0..self.ops.len());
        self.ops[pick].apply(sample, rng)
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.ops.iter().map(Transform::describe).collect();
        format!("Random Pick [{}]", names.join(" | "))
    }
}
