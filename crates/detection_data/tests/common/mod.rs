#![allow(dead_code)]

use anyhow::Result;
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// On-disk dataset laid out as `images/<split>/*.png` + `labels/<split>/*.txt`.
pub struct TestDataset {
    pub dir: TempDir,
}

impl TestDataset {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn image_dir(&self) -> PathBuf {
        self.dir.path().join("images")
    }

    pub fn label_dir(&self) -> PathBuf {
        self.dir.path().join("labels")
    }

    pub fn image_path(&self, split: &str, index: usize) -> PathBuf {
        self.image_dir().join(split).join(format!("img_{:03}.png", index))
    }

    /// Writes `n` images of `width x height` to `split`. Image `i` carries the
    /// marker `i` in the red channel of its top-left pixel (the last channel
    /// once loaded as BGR).
    pub fn add_images(&self, split: &str, n: usize, width: u32, height: u32) -> Result<()> {
        self.add_images_from(split, 0, n, width, height)
    }

    pub fn add_images_from(
        &self,
        split: &str,
        first: usize,
        n: usize,
        width: u32,
        height: u32,
    ) -> Result<()> {
        for i in first..first + n {
            let mut img = RgbImage::from_pixel(width, height, Rgb([40, 90, 140]));
            img.put_pixel(0, 0, Rgb([i as u8, 0, 0]));
            self.write_image(split, &format!("img_{:03}", i), &img)?;
        }
        Ok(())
    }

    pub fn write_image(&self, split: &str, stem: &str, img: &RgbImage) -> Result<()> {
        let path = self.image_dir().join(split).join(format!("{}.png", stem));
        ensure_parent(&path)?;
        img.save(&path)?;
        self.write_label(split, stem)
    }

    /// Writes bytes that no decoder accepts, plus a matching label file.
    pub fn write_corrupt(&self, split: &str, stem: &str) -> Result<()> {
        let path = self.image_dir().join(split).join(format!("{}.png", stem));
        ensure_parent(&path)?;
        fs::write(&path, b"not an image at all")?;
        self.write_label(split, stem)
    }

    fn write_label(&self, split: &str, stem: &str) -> Result<()> {
        let path = self.label_dir().join(split).join(format!("{}.txt", stem));
        ensure_parent(&path)?;
        fs::write(&path, "0 0.5 0.5 0.2 0.2\n")?;
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Reads back the marker of every image in a batch, in batch order.
pub fn markers(batch: &detection_data::Batch) -> Vec<u8> {
    (0..batch.len()).map(|i| batch.images[[i, 0, 0, 2]]).collect()
}
