//! Randomized photometric jitter operations.
//!
//! All operations here work on a decoded `[H, W, 3]` BGR buffer, do their
//! arithmetic in a wider type, and hand back a `u8` buffer of the same shape
//! with every value clamped into `[0, 255]`. Label and ground truth are
//! passed through untouched.

use crate::error::DataError;
use crate::sample::{Image, Sample};
use crate::transforms::color::{bgr_to_hsv, hsv_to_bgr, HUE_PERIOD};
use crate::transforms::core::{Applied, Transform};
use anyhow::Result;
use ndarray::Axis;
use rand::seq::SliceRandom;
use rand::Rng;

fn check_delta(name: &str, delta: i32) -> Result<()> {
    if delta < 0 {
        return Err(DataError::config(format!(
            "{} delta must be non-negative (got {})",
            name, delta
        ))
        .into());
    }
    Ok(())
}

fn check_scale_range(name: &str, lower: f32, upper: f32) -> Result<()> {
    if !(lower.is_finite() && upper.is_finite() && 0.0 <= lower && lower <= upper) {
        return Err(DataError::config(format!(
            "{} range must satisfy 0 <= lower <= upper (got [{}, {}])",
            name, lower, upper
        ))
        .into());
    }
    Ok(())
}

/// Folds a value that left `[0, 180]` back by one hue period.
fn wrap_hue(value: f32) -> f32 {
    if value > HUE_PERIOD {
        value - HUE_PERIOD
    } else if value < 0.0 {
        value + HUE_PERIOD
    } else {
        value
    }
}

// ============================================================================
// Brightness
// ============================================================================

/// Adds a random integer offset in `[-delta, delta]` to every channel of
/// every pixel.
///
/// # Example
/// ```ignore
/// let brightness = Brightness::new(32)?;
/// let applied = brightness.apply(sample, &mut rng)?;
/// ```
#[derive(Debug, Clone)]
pub struct Brightness {
    delta: i32,
}

impl Brightness {
    pub fn new(delta: i32) -> Result<Self> {
        check_delta("Brightness", delta)?;
        Ok(Self { delta })
    }

    /// Shifts every value by `offset`, saturating at the `u8` bounds.
    pub fn shift(image: &Image, offset: i32) -> Image {
        image.mapv(|value| (value as i32).saturating_add(offset).clamp(0, 255) as u8)
    }
}

impl Transform for Brightness {
    fn apply<R>(&self, sample: Sample, rng: &mut R) -> Result<Applied>
    where
        R: Rng + ?Sized,
    {
        let offset = rng.random_range(-self.delta..=self.delta);
        let sample = sample.map_image(|image| Ok(Self::shift(&image, offset)))?;
        Ok(Applied::new(sample, self.describe()))
    }

    fn describe(&self) -> String {
        "Brightness Transform".to_string()
    }
}

// ============================================================================
// Contrast
// ============================================================================

/// Multiplies every pixel by a random scalar in `[lower, upper]`.
#[derive(Debug, Clone)]
pub struct Contrast {
    lower: f32,
    upper: f32,
}

impl Contrast {
    pub fn new(lower: f32, upper: f32) -> Result<Self> {
        check_scale_range("Contrast", lower, upper)?;
        Ok(Self { lower, upper })
    }

    /// Scales every value by `factor`. Results are clamped, then truncated
    /// to `u8`.
    pub fn scale(image: &Image, factor: f32) -> Image {
        image.mapv(|value| (value as f32 * factor).clamp(0.0, 255.0) as u8)
    }
}

impl Transform for Contrast {
    fn apply<R>(&self, sample: Sample, rng: &mut R) -> Result<Applied>
    where
        R: Rng + ?Sized,
    {
        let factor = rng.random_range(self.lower..=self.upper);
        let sample = sample.map_image(|image| Ok(Self::scale(&image, factor)))?;
        Ok(Applied::new(sample, self.describe()))
    }

    fn describe(&self) -> String {
        "Contrast Transform".to_string()
    }
}

// ============================================================================
// Hue
// ============================================================================

/// Rotates the hue channel by a random integer in `[-delta, delta]`.
///
/// The image goes through HSV, the hue channel is shifted and folded back
/// into range by one period of 180, then converted back to BGR.
#[derive(Debug, Clone)]
pub struct Hue {
    delta: i32,
}

impl Hue {
    pub fn new(delta: i32) -> Result<Self> {
        check_delta("Hue", delta)?;
        Ok(Self { delta })
    }

    pub fn rotate(image: &Image, offset: f32) -> Image {
        let mut hsv = bgr_to_hsv(image);
        hsv.index_axis_mut(Axis(2), 0)
            .mapv_inplace(|h| wrap_hue(h + offset));
        hsv_to_bgr(&hsv)
    }
}

impl Transform for Hue {
    fn apply<R>(&self, sample: Sample, rng: &mut R) -> Result<Applied>
    where
        R: Rng + ?Sized,
    {
        let offset = rng.random_range(-self.delta..=self.delta) as f32;
        let sample = sample.map_image(|image| Ok(Self::rotate(&image, offset)))?;
        Ok(Applied::new(sample, self.describe()))
    }

    fn describe(&self) -> String {
        "Hue Transform".to_string()
    }
}

// ============================================================================
// Saturation
// ============================================================================

/// Scales the saturation channel by a random factor in `[lower, upper]`.
///
/// After scaling, the saturation channel gets the same 180-period fold as
/// [`Hue`] before being clamped to `[0, 255]`. Saturation is not periodic,
/// so a strongly saturated pixel pushed above 180 loses saturation instead
/// of gaining it. Even a factor of 1.0 folds pixels whose saturation is
/// already above 180.
#[derive(Debug, Clone)]
pub struct Saturation {
    lower: f32,
    upper: f32,
}

impl Saturation {
    pub fn new(lower: f32, upper: f32) -> Result<Self> {
        check_scale_range("Saturation", lower, upper)?;
        Ok(Self { lower, upper })
    }

    pub fn scale(image: &Image, factor: f32) -> Image {
        let mut hsv = bgr_to_hsv(image);
        hsv.index_axis_mut(Axis(2), 1)
            .mapv_inplace(|s| wrap_hue(s * factor).clamp(0.0, 255.0));
        hsv_to_bgr(&hsv)
    }
}

impl Transform for Saturation {
    fn apply<R>(&self, sample: Sample, rng: &mut R) -> Result<Applied>
    where
        R: Rng + ?Sized,
    {
        let factor = rng.random_range(self.lower..=self.upper);
        let sample = sample.map_image(|image| Ok(Self::scale(&image, factor)))?;
        Ok(Applied::new(sample, self.describe()))
    }

    fn describe(&self) -> String {
        "Saturation Transform".to_string()
    }
}

// ============================================================================
// ChannelReorder
// ============================================================================

/// Shuffles the three color channels into one of the 3! orderings, chosen
/// uniformly. The identity ordering is one of them.
#[derive(Debug, Clone, Default)]
pub struct ChannelReorder;

impl ChannelReorder {
    pub fn new() -> Self {
        Self
    }

    /// Output channel `i` is input channel `order[i]`.
    pub fn permute(image: &Image, order: [usize; 3]) -> Image {
        image.select(Axis(2), &order)
    }
}

impl Transform for ChannelReorder {
    fn apply<R>(&self, sample: Sample, rng: &mut R) -> Result<Applied>
    where
        R: Rng + ?Sized,
    {
        let mut order = [0, 1, 2];
        order.shuffle(rng);
        let sample = sample.map_image(|image| Ok(Self::permute(&image, order)))?;
        Ok(Applied::new(sample, self.describe()))
    }

    fn describe(&self) -> String {
        "Channels Reorder Transform".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use rand::{rngs::StdRng, SeedableRng};

    fn gradient_image() -> Image {
        Array3::from_shape_fn((6, 5, 3), |(y, x, c)| ((y * 40 + x * 11 + c * 70) % 256) as u8)
    }

    /// Low-saturation image: every pixel has saturation below the fold at 180.
    fn pastel_image() -> Image {
        Array3::from_shape_fn((6, 5, 3), |(y, x, c)| (150 + (y * 13 + x * 7 + c * 31) % 100) as u8)
    }

    fn decoded(applied: &Applied) -> &Image {
        applied.sample.image.as_decoded().unwrap()
    }

    #[test]
    fn test_outputs_keep_shape_for_every_leaf() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(3);
        let image = gradient_image();
        let ops: Vec<crate::transforms::Operation> = vec![
            Brightness::new(100)?.into(),
            Contrast::new(0.5, 1.8)?.into(),
            Hue::new(100)?.into(),
            Saturation::new(0.5, 1.8)?.into(),
            ChannelReorder::new().into(),
        ];

        for op in &ops {
            for _ in 0..20 {
                let applied = op.apply(Sample::from_image(image.clone()), &mut rng)?;
                assert_eq!(decoded(&applied).dim(), image.dim(), "{}", op.describe());
            }
        }
        Ok(())
    }

    #[test]
    fn test_brightness_on_mid_gray_spreads_both_ways() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let brightness = Brightness::new(100)?;
        let (mut above, mut below) = (0, 0);

        for _ in 0..1000 {
            let sample = Sample::from_image(Image::from_elem((2, 2, 3), 128));
            let applied = brightness.apply(sample, &mut rng)?;
            let value = decoded(&applied)[[0, 0, 0]];
            above += (value > 128) as usize;
            below += (value < 128) as usize;
        }

        assert!(above > 0 && below > 0);
        Ok(())
    }

    #[test]
    fn test_brightness_and_contrast_clamp() {
        let image = Image::from_elem((1, 2, 3), 200);
        assert!(Brightness::shift(&image, 100).iter().all(|&v| v == 255));
        assert!(Brightness::shift(&image, -255).iter().all(|&v| v == 0));
        assert!(Brightness::shift(&image, i32::MAX).iter().all(|&v| v == 255));
        assert!(Brightness::shift(&image, i32::MIN).iter().all(|&v| v == 0));
        assert!(Contrast::scale(&image, 1.8).iter().all(|&v| v == 255));
        assert!(Contrast::scale(&image, 0.5).iter().all(|&v| v == 100));
    }

    #[test]
    fn test_hue_and_saturation_identity_round_trip() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(5);
        let image = pastel_image();

        let hue = Hue::new(0)?.apply(Sample::from_image(image.clone()), &mut rng)?;
        let sat = Saturation::new(1.0, 1.0)?.apply(Sample::from_image(image.clone()), &mut rng)?;

        for out in [decoded(&hue), decoded(&sat)] {
            for (a, b) in image.iter().zip(out.iter()) {
                assert!((*a as i16 - *b as i16).abs() <= 1);
            }
        }
        Ok(())
    }

    #[test]
    fn test_hue_rotation_shifts_and_wraps() {
        // pure blue, green, red in BGR
        let image = Array3::from_shape_vec(
            (1, 3, 3),
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255],
        )
        .unwrap();
        assert_eq!(Hue::rotate(&image, 0.0), image);
        // red (hue 0) shifted by +60 (120 degrees) becomes green
        let shifted = Hue::rotate(&image, 60.0);
        assert_eq!(shifted.slice(ndarray::s![0, 2, ..]).to_vec(), vec![0, 255, 0]);

        // red (hue 0) shifted by -60 folds up to 120, which is blue
        let shifted = Hue::rotate(&image, -60.0);
        assert_eq!(shifted.slice(ndarray::s![0, 2, ..]).to_vec(), vec![255, 0, 0]);

        // blue (hue 120) shifted by +100 folds down to 40
        let shifted = Hue::rotate(&image, 100.0);
        assert_eq!(shifted.slice(ndarray::s![0, 0, ..]).to_vec(), vec![0, 255, 170]);
    }

    #[test]
    fn test_saturation_wraps_like_hue() {
        // Pure red has saturation 255; x1.5 gives 382.5, folded to 202.5.
        let red = Array3::from_shape_vec((1, 1, 3), vec![0u8, 0, 255]).unwrap();
        let out = Saturation::scale(&red, 1.5);

        assert_eq!(out[[0, 0, 2]], 255);
        assert!((52..=53).contains(&out[[0, 0, 0]]));
        assert!((52..=53).contains(&out[[0, 0, 1]]));
    }

    #[test]
    fn test_channel_reorder_inverse_restores_image() {
        let image = gradient_image();
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

        for order in orders {
            let mut inverse = [0; 3];
            for (i, &o) in order.iter().enumerate() {
                inverse[o] = i;
            }
            let permuted = ChannelReorder::permute(&image, order);
            assert_eq!(ChannelReorder::permute(&permuted, inverse), image);
        }

        let identity = ChannelReorder::permute(&image, [0, 1, 2]);
        assert_eq!(ChannelReorder::permute(&identity, [0, 1, 2]), image);
    }

    #[test]
    fn test_channel_reorder_visits_every_ordering() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(17);
        let image = Array3::from_shape_vec((1, 1, 3), vec![0u8, 1, 2]).unwrap();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            let applied = ChannelReorder::new().apply(Sample::from_image(image.clone()), &mut rng)?;
            seen.insert(decoded(&applied).iter().copied().collect::<Vec<_>>());
        }
        assert_eq!(seen.len(), 6);
        Ok(())
    }

    #[test]
    fn test_leaves_pass_annotations_through() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(1);
        let sample = Sample::from_image(gradient_image())
            .with_label("person")
            .with_ground_truth("boxes.txt");
        let applied = Hue::new(30)?.apply(sample, &mut rng)?;

        assert_eq!(applied.sample.label.as_deref(), Some("person"));
        assert_eq!(applied.sample.ground_truth.as_deref(), Some("boxes.txt"));
        Ok(())
    }

    #[test]
    fn test_invalid_parameters_and_inputs() {
        let config_err = |r: Result<()>| {
            matches!(
                r.unwrap_err().downcast_ref::<DataError>(),
                Some(DataError::Configuration(_))
            )
        };
        assert!(config_err(Brightness::new(-1).map(|_| ())));
        assert!(config_err(Hue::new(-5).map(|_| ())));
        assert!(config_err(Contrast::new(1.5, 0.5).map(|_| ())));
        assert!(config_err(Saturation::new(-0.1, 1.0).map(|_| ())));

        let mut rng = StdRng::seed_from_u64(0);
        let err = Brightness::new(10)
            .unwrap()
            .apply(Sample::from_path("missing.jpg"), &mut rng)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::InvalidImage(_))
        ));
    }
}
