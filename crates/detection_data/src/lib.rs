pub mod batch;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod generator;
pub mod policy;
pub mod sample;
pub mod training_data;
pub mod transforms;

pub use batch::Batch;
pub use catalog::Catalog;
pub use config::AugmentConfig;
pub use discovery::{get_filenames_and_labels, DirectoryDiscovery, Discovery, Split};
pub use error::DataError;
pub use generator::{BatchGenerator, BatchIter, GeneratorConfig};
pub use policy::{build_transforms, Pipeline, PolicyKind, Processed};
pub use sample::{Image, ImageSource, Sample};
pub use training_data::TrainingData;
