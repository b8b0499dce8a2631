//! Node-based processing of multi-channel biosignal streams.
//!
//! Nodes buffer data per input port, process once their condition holds and
//! hand results to downstream nodes through a [`engine::Pipeline`].

pub mod core;
pub mod engine;
pub mod nodes;
pub mod registry;

pub use crate::core::{
    ChannelKey, DataFrame, EpochSeries, NodeError, NodeResult, ProcessingNode, SampleSeries,
};
pub use crate::engine::{Emission, Pipeline, PipelineConfig, StreamingPipeline};
