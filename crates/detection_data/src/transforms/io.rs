use crate::error::DataError;
use crate::sample::{check_channels, Image, ImageSource, Sample, NUM_CHANNELS};
use crate::transforms::core::{Applied, Transform};
use anyhow::Result;
use image::{DynamicImage, ImageReader};
use ndarray::{Array3, Axis};
use rand::Rng;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use tracing::trace;

// ============================================================================
// LoadImage
// ============================================================================

/// Loads images from file paths.
///
/// Reads the file with a buffered reader, lets the `image` crate guess the
/// format from the content, and stores the pixels as a `[H, W, 3]` array in
/// BGR order. Alpha is dropped and grayscale is expanded to three channels.
///
/// Samples whose image is already decoded pass through untouched, so the
/// loader can sit at the head of any policy. They must still be
/// `[H, W, 3]`, otherwise [`DataError::InvalidImage`] is returned.
///
/// # Example
/// ```ignore
/// let loader = LoadImage::new();
/// let applied = loader.apply(Sample::from_path("photo.jpg"), &mut rng)?;
/// ```
#[derive(Debug, Clone)]
pub struct LoadImage {
    buffer_size: usize,
}

impl Default for LoadImage {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadImage {
    /// Creates a new image loader with an 8KB read buffer.
    pub fn new() -> Self {
        Self { buffer_size: 8192 }
    }

    /// Reads and decodes `path` into a BGR buffer.
    ///
    /// Every failure (missing file, I/O error, unknown format, corrupt
    /// data) is reported as [`DataError::Load`].
    pub fn load(&self, path: &Path) -> Result<Image> {
        let load_error = |reason: String| DataError::Load {
            path: path.to_path_buf(),
            reason,
        };

        let buffer = self
            .read_bytes(path)
            .map_err(|e| load_error(format!("failed to read file: {}", e)))?;

        let decoded = ImageReader::new(Cursor::new(buffer))
            .with_guessed_format()
            .map_err(|e| load_error(format!("failed to guess format: {}", e)))?
            .decode()
            .map_err(|e| load_error(format!("failed to decode: {}", e)))?;

        let image = to_bgr(decoded).map_err(|e| load_error(e.to_string()))?;
        trace!(path = %path.display(), shape = ?image.dim(), "image decoded");
        Ok(image)
    }

    fn read_bytes(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len() as usize;
        let mut reader = BufReader::with_capacity(self.buffer_size, file);
        let mut buffer = Vec::with_capacity(file_size);
        reader.read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

/// Converts a decoded image into a `[H, W, 3]` BGR array.
pub fn to_bgr(image: DynamicImage) -> Result<Image> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let rgb = Array3::from_shape_vec(
        (height as usize, width as usize, NUM_CHANNELS),
        rgb.into_raw(),
    )?;
    Ok(rgb.select(Axis(2), &[2, 1, 0]))
}

impl Transform for LoadImage {
    fn apply<R>(&self, sample: Sample, _rng: &mut R) -> Result<Applied>
    where
        R: Rng + ?Sized,
    {
        let Sample {
            image,
            label,
            ground_truth,
        } = sample;

        let image = match image {
            ImageSource::Path(path) => ImageSource::Decoded(self.load(&path)?),
            ImageSource::Decoded(image) => {
                check_channels(&image)?;
                ImageSource::Decoded(image)
            }
        };

        Ok(Applied::new(
            Sample {
                image,
                label,
                ground_truth,
            },
            self.describe(),
        ))
    }

    fn describe(&self) -> String {
        "ImageLoader Transform".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
