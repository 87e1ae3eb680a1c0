use crate::error::DataError;
use crate::policy::Processed;
use crate::sample::ImageSource;
use anyhow::Result;
use ndarray::{stack, Array4, ArrayView3, Axis};

/// The `Batch` struct groups consecutive processed samples for model input.
///
/// Images are stacked along a new leading axis into a
/// `[batch, height, width, channel]` array. The other components are kept
/// as parallel lists, so `labels[i]`, `ground_truth[i]` and
/// `descriptions[i]` all belong to `images[i]`.
///
/// # Example
/// Five `[480, 640, 3]` images collated together give
/// - `images` -> shape `[5, 480, 640, 3]`
/// - `labels`, `ground_truth`, `descriptions` -> 5 entries each
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub images: Array4<u8>,
    pub labels: Vec<Option<String>>,
    pub ground_truth: Vec<Option<String>>,
    /// Per sample, the description of every top-level operation that ran.
    pub descriptions: Vec<Vec<String>>,
}

impl Batch {
    /// Stacks the decoded images of `samples` into one batch.
    ///
    /// # Errors
    /// - Configuration error on an empty list.
    /// - [`DataError::InvalidImage`] if a sample was never loaded.
    /// - [`DataError::ShapeMismatch`] if an image's shape differs from the
    ///   first one.
    pub fn collate(samples: Vec<Processed>) -> Result<Self> {
        if samples.is_empty() {
            return Err(DataError::config("cannot collate an empty sample list").into());
        }

        let mut views: Vec<ArrayView3<'_, u8>> = Vec::with_capacity(samples.len());
        for processed in &samples {
            match &processed.sample.image {
                ImageSource::Decoded(image) => views.push(image.view()),
                ImageSource::Path(path) => {
                    return Err(DataError::InvalidImage(format!(
                        "{} reached the batch without being loaded",
                        path.display()
                    ))
                    .into())
                }
            }
        }

        let expected = shape_of(&views[0]);
        for (index, view) in views.iter().enumerate().skip(1) {
            let found = shape_of(view);
            if found != expected {
                return Err(DataError::ShapeMismatch {
                    index,
                    expected,
                    found,
                }
                .into());
            }
        }

        // Shapes were checked above so stacking cannot fail on them.
        let images = stack(Axis(0), &views)?;

        let mut labels = Vec::with_capacity(samples.len());
        let mut ground_truth = Vec::with_capacity(samples.len());
        let mut descriptions = Vec::with_capacity(samples.len());
        for processed in samples {
            labels.push(processed.sample.label);
            ground_truth.push(processed.sample.ground_truth);
            descriptions.push(processed.path);
        }

        Ok(Self {
            images,
            labels,
            ground_truth,
            descriptions,
        })
    }

    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `[batch, height, width, channel]`
    pub fn shape(&self) -> [usize; 4] {
        let (b, h, w, c) = self.images.dim();
        [b, h, w, c]
    }

    /// The images converted to `f32`, values still in `[0, 255]`.
    pub fn images_f32(&self) -> Array4<f32> {
        self.images.mapv(f32::from)
    }
}

fn shape_of(view: &ArrayView3<'_, u8>) -> [usize; 3] {
    let (h, w, c) = view.dim();
    [h, w, c]
}
