use crate::error::DataError;
use anyhow::{bail, Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Dataset split on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Dev,
}

impl Split {
    /// Name of the split's sub-directory.
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Dev => "dev",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Split {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "train" => Ok(Split::Train),
            "dev" => Ok(Split::Dev),
            other => bail!("unknown split '{}', expected 'train' or 'dev'", other),
        }
    }
}

/// Produces the index-aligned image files and annotation references of a
/// split.
///
/// Implementations must return two lists of equal length where
/// `labels[i]` describes `filenames[i]`.
pub trait Discovery {
    fn filenames_and_labels(&self, split: Split) -> Result<(Vec<PathBuf>, Vec<String>)>;
}

/// Discovers samples laid out as
///
/// ```text
/// image_dir/<split>/**/<name>.<jpg|jpeg|png>
/// label_dir/<split>/**/<name>.txt
/// ```
///
/// Images are found recursively and returned sorted by path. Each image
/// must have an annotation file with the same relative path and a `.txt`
/// extension.
///
/// # Example
/// ```ignore
/// let discovery = DirectoryDiscovery::new("data/images", "data/labels");
/// let (filenames, labels) = discovery.filenames_and_labels(Split::Train)?;
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryDiscovery {
    image_dir: PathBuf,
    label_dir: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryDiscovery {
    pub fn new(image_dir: impl Into<PathBuf>, label_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            label_dir: label_dir.into(),
            extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
        }
    }

    /// Replaces the accepted image extensions (case-insensitive).
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|s| s.to_lowercase()).collect();
        self
    }

    fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.contains(&e.to_lowercase()))
    }
}

impl Discovery for DirectoryDiscovery {
    fn filenames_and_labels(&self, split: Split) -> Result<(Vec<PathBuf>, Vec<String>)> {
        let image_root = self.image_dir.join(split.as_str());
        let label_root = self.label_dir.join(split.as_str());

        let metadata = fs::metadata(&image_root)
            .with_context(|| format!("Failed to access directory: {}", image_root.display()))?;
        if !metadata.is_dir() {
            bail!("Path is not a directory: {}", image_root.display());
        }

        let mut filenames = Vec::new();
        for entry in WalkDir::new(&image_root) {
            let entry = entry.context("Failed to read directory entry")?;
            if entry.file_type().is_file() && self.is_image(entry.path()) {
                filenames.push(entry.into_path());
            }
        }
        filenames.sort();

        let labels = filenames
            .iter()
            .map(|image_path| -> Result<String> {
                let relative = image_path
                    .strip_prefix(&image_root)
                    .context("walked outside of the image directory")?;
                let label_path = label_root.join(relative).with_extension("txt");
                if !label_path.is_file() {
                    return Err(DataError::config(format!(
                        "missing annotation {} for image {}",
                        label_path.display(),
                        image_path.display()
                    ))
                    .into());
                }
                Ok(label_path.to_string_lossy().into_owned())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((filenames, labels))
    }
}

/// Free-function form of [`DirectoryDiscovery`].
pub fn get_filenames_and_labels(
    image_dir: impl AsRef<Path>,
    label_dir: impl AsRef<Path>,
    split: Split,
) -> Result<(Vec<PathBuf>, Vec<String>)> {
    DirectoryDiscovery::new(image_dir.as_ref(), label_dir.as_ref()).filenames_and_labels(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_directory_discovery() -> Result<()> {
        let dir = tempdir()?;
        let images = dir.path().join("images/train/nested");
        let labels = dir.path().join("labels/train/nested");
        fs::create_dir_all(&images)?;
        fs::create_dir_all(&labels)?;

        // zero-byte files are fine, nothing is decoded here
        for name in ["b.JPG", "a.png"] {
            File::create(images.join(name))?;
        }
        File::create(images.join("notes.txt"))?; // skipped
        for name in ["a.txt", "b.txt"] {
            File::create(labels.join(name))?;
        }

        let (files, annotations) =
            get_filenames_and_labels(dir.path().join("images"), dir.path().join("labels"), Split::Train)?;

        assert_eq!(files, vec![images.join("a.png"), images.join("b.JPG")]);
        assert_eq!(
            annotations,
            vec![
                labels.join("a.txt").to_string_lossy().into_owned(),
                labels.join("b.txt").to_string_lossy().into_owned(),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_missing_annotation_and_split_dir() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("images/dev"))?;
        fs::create_dir_all(dir.path().join("labels/dev"))?;
        File::create(dir.path().join("images/dev/x.jpg"))?;

        let discovery = DirectoryDiscovery::new(dir.path().join("images"), dir.path().join("labels"));
        let err = discovery.filenames_and_labels(Split::Dev).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::Configuration(_))
        ));

        assert!(discovery.filenames_and_labels(Split::Train).is_err());
        Ok(())
    }

    #[test]
    fn test_split_parsing() -> Result<()> {
        assert_eq!("train".parse::<Split>()?, Split::Train);
        assert_eq!("dev".parse::<Split>()?, Split::Dev);
        assert!("test".parse::<Split>().is_err());
        assert_eq!(Split::Dev.to_string(), "dev");
        Ok(())
    }
}
