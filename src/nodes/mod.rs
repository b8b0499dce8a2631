pub mod data_replicate;
pub mod file;
pub mod interpolate;
pub mod segmenter;
pub mod split;

pub use data_replicate::{DataReplicate, DataReplicateConfig};
pub use file::{
    CsvFile, CsvFileArray, CsvFileArrayConfig, CsvFileConfig, CsvFileOutput, CsvFileOutputConfig,
};
pub use interpolate::{Interpolate, InterpolateConfig, InterpolationMode};
pub use segmenter::{FillingValue, Segmenter, SlidingWindowConfig, SlidingWindowSegmenter};
pub use split::{Split, SplitConfig};

use crate::registry::NodeMetadata;

/// Metadata of every node type shipped with the crate
pub fn builtin() -> Vec<NodeMetadata> {
    vec![
        NodeMetadata::of::<SlidingWindowSegmenter>(),
        NodeMetadata::of::<Interpolate>(),
        NodeMetadata::of::<DataReplicate>(),
        NodeMetadata::of::<Split>(),
        NodeMetadata::of::<CsvFile>(),
        NodeMetadata::of::<CsvFileArray>(),
        NodeMetadata::of::<CsvFileOutput>(),
    ]
}
