use crate::error::DataError;
use anyhow::Result;
use ndarray::Array3;
use std::path::{Path, PathBuf};

/// A decoded image: `[height, width, channel]` with 8-bit samples.
///
/// Channels are in BGR order straight out of [`LoadImage`](crate::transforms::LoadImage)
/// and stay that way until a channel reorder shuffles them.
pub type Image = Array3<u8>;

/// Number of color channels every photometric operation expects.
pub const NUM_CHANNELS: usize = 3;

/// The image slot of a [`Sample`].
///
/// Samples start out holding the path of the file on disk. The load
/// operation replaces the path by the decoded pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Path(PathBuf),
    Decoded(Image),
}

impl ImageSource {
    /// Returns the decoded buffer, or `None` if the image is still a path.
    pub fn as_decoded(&self) -> Option<&Image> {
        match self {
            ImageSource::Decoded(image) => Some(image),
            ImageSource::Path(_) => None,
        }
    }

    /// Returns the source path, or `None` once the image has been decoded.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ImageSource::Path(path) => Some(path),
            ImageSource::Decoded(_) => None,
        }
    }
}

/// The `Sample` struct is the `(image, label, ground_truth)` triple that
/// flows through every operation of a pipeline.
///
/// - `image`: file path before loading, decoded buffer afterwards.
/// - `label`: opaque class identifier; absent until something resolves it.
/// - `ground_truth`: opaque detection annotation (e.g. the path of a box
///   file). Photometric operations never touch it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub image: ImageSource,
    pub label: Option<String>,
    pub ground_truth: Option<String>,
}

impl Sample {
    /// Creates a not-yet-loaded sample pointing at an image file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            image: ImageSource::Path(path.into()),
            label: None,
            ground_truth: None,
        }
    }

    /// Creates a sample around an already decoded buffer.
    pub fn from_image(image: Image) -> Self {
        Self {
            image: ImageSource::Decoded(image),
            label: None,
            ground_truth: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_ground_truth(mut self, ground_truth: impl Into<String>) -> Self {
        self.ground_truth = Some(ground_truth.into());
        self
    }

    /// Replaces the decoded image by `f(image)`, keeping label and ground
    /// truth as they are.
    ///
    /// Fails with [`DataError::InvalidImage`] if the image has not been
    /// loaded yet or is not a 3-channel buffer.
    pub fn map_image<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(Image) -> Result<Image>,
    {
        let Sample {
            image,
            label,
            ground_truth,
        } = self;

        let image = match image {
            ImageSource::Decoded(image) => image,
            ImageSource::Path(path) => {
                return Err(DataError::InvalidImage(format!(
                    "{} has not been loaded yet",
                    path.display()
                ))
                .into())
            }
        };
        check_channels(&image)?;

        Ok(Self {
            image: ImageSource::Decoded(f(image)?),
            label,
            ground_truth,
        })
    }
}

/// Ensures the buffer is `[height, width, 3]`.
pub(crate) fn check_channels(image: &Image) -> Result<()> {
    let channels = image.dim().2;
    if channels != NUM_CHANNELS {
        return Err(DataError::InvalidImage(format!(
            "expected {} channels, got {}",
            NUM_CHANNELS, channels
        ))
        .into());
    }
    Ok(())
}
