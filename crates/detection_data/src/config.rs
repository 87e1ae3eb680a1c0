//! src/config.rs
//!
//! Augmentation parameters for the training policy.
//!
//! The defaults are the values the detection models were trained with.
//! Every field can be overridden from a JSON file; missing fields keep their
//! default:
//!
//! ```json
//! { "brightness_delta": 32, "saturation_range": [0.5, 1.5] }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Configuration for the `train` augmentation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Max brightness offset, drawn from `[-delta, delta]`.
    pub brightness_delta: i32,
    /// Probability of applying the brightness jitter.
    pub brightness_prob: f64,
    /// Contrast factor bounds `[lower, upper]`.
    pub contrast_range: (f32, f32),
    /// Max hue offset, drawn from `[-delta, delta]`.
    pub hue_delta: i32,
    /// Saturation factor bounds `[lower, upper]`.
    pub saturation_range: (f32, f32),
    /// Probability of applying each step inside the two distortion
    /// sequences. At 1.0 the steps are applied unconditionally.
    pub distort_prob: f64,
    /// Probability of shuffling the color channels.
    pub channel_reorder_prob: f64,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            brightness_delta: 100,
            brightness_prob: 0.5,
            contrast_range: (0.5, 1.8),
            hue_delta: 100,
            saturation_range: (0.5, 1.8),
            distort_prob: 1.0,
            channel_reorder_prob: 0.5,
        }
    }
}

impl AugmentConfig {
    /// Parses a JSON document. Validation of the values happens when the
    /// policy is built.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse augmentation config")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
