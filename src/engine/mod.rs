pub mod config;
pub mod pipeline;
pub mod streaming;

pub use config::{ConnectionConfig, NodeConfig, PipelineConfig};
pub use pipeline::{Connection, Emission, Pipeline, Tick};
pub use streaming::StreamingPipeline;
