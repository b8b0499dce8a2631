pub mod dataframe;
pub mod error;
pub mod node;
pub mod params;
pub mod series;
pub mod state;

pub use dataframe::{DataFrame, FrameKind, PortBuffer, PortSpec};
pub use error::{NodeError, NodeResult};
pub use node::{Node, NodeDescriptor, ProcessingNode, RunOutcome, Transform};
pub use params::{BufferOptions, Parameters};
pub use series::{ChannelKey, ChannelSeries, EpochSeries, SampleSeries};
pub use state::NodeState;
