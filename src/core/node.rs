use super::dataframe::{DataFrame, PortBuffer, PortSpec};
use super::error::{NodeError, NodeResult};
use super::params::{BufferOptions, Parameters};
use super::state::NodeState;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, trace};

/// Static identity and port layout of a node type.
///
/// Usually generated by `#[derive(PipelineNode)]`.
pub trait NodeDescriptor {
    const TYPE_NAME: &'static str;
    const MODULE: &'static str;
    const CATEGORY: &'static str;
    const INPUTS: &'static [PortSpec];
    const OUTPUTS: &'static [PortSpec];
}

/// The transformation a node performs, separated from buffering.
///
/// Implementors validate their parameters into a typed `Config` once, then
/// turn buffered input into output. [`Node`] drives the buffering lifecycle
/// around them.
pub trait Transform: NodeDescriptor + Send + Sized + 'static {
    type Config;

    /// Check the raw parameters and convert them into the typed configuration
    fn validate_parameters(params: &Parameters<'_>) -> NodeResult<Self::Config>;

    /// Build the transformation from an already validated configuration
    fn initialize_parameter_fields(config: Self::Config) -> Self;

    fn inputs(&self) -> Vec<PortSpec> {
        Self::INPUTS.to_vec()
    }

    fn outputs(&self) -> Vec<String> {
        Self::OUTPUTS.iter().map(|port| port.name.to_string()).collect()
    }

    fn is_processing_condition_satisfied(&self, input: &PortBuffer) -> bool;

    fn is_next_node_call_enabled(&self, _output: &PortBuffer) -> bool {
        true
    }

    fn process(&mut self, input: &PortBuffer) -> NodeResult<PortBuffer>;

    /// Release resources held by the transformation
    fn dispose(&mut self) {}
}

/// Result of one `run` of a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    /// Processing condition held and `process` ran
    pub processed: bool,
    /// Output handed to downstream nodes, if the next-node gate was open
    pub emitted: Option<PortBuffer>,
}

/// Object-safe interface the pipeline uses to drive nodes
pub trait ProcessingNode: Send {
    fn name(&self) -> &str;

    fn type_name(&self) -> &'static str;

    fn module(&self) -> &'static str;

    fn inputs(&self) -> Vec<PortSpec>;

    fn outputs(&self) -> Vec<String>;

    fn state(&self) -> NodeState;

    fn buffer_options(&self) -> BufferOptions;

    fn input_buffer(&self) -> &PortBuffer;

    fn output_buffer(&self) -> &PortBuffer;

    /// Buffer a frame on an input port
    fn push(&mut self, port: &str, frame: DataFrame) -> NodeResult<()>;

    /// Evaluate the processing condition and process if it holds
    fn run(&mut self) -> NodeResult<RunOutcome>;

    fn dispose(&mut self);
}

/// A transformation wrapped with its name, buffers and clearing policy
pub struct Node<T: Transform> {
    name: String,
    transform: T,
    buffer_options: BufferOptions,
    input_buffer: PortBuffer,
    output_buffer: PortBuffer,
    output_pending: bool,
    state: NodeState,
}

impl<T: Transform> Node<T> {
    /// Validate `raw` and build the node. No node exists if validation fails.
    pub fn from_parameters(name: &str, raw: &Value) -> NodeResult<Self> {
        let params = Parameters::new(T::MODULE, name, raw)?;
        let buffer_options = BufferOptions::from_parameters(&params)?;
        let config = T::validate_parameters(&params)?;
        let transform = T::initialize_parameter_fields(config);

        info!(node = name, node_type = T::TYPE_NAME, "Node constructed");

        Ok(Self {
            name: name.to_string(),
            transform,
            buffer_options,
            input_buffer: PortBuffer::new(),
            output_buffer: PortBuffer::new(),
            output_pending: false,
            state: NodeState::Idle,
        })
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    fn set_state(&mut self, next: NodeState) {
        if self.state == next {
            return;
        }
        debug_assert!(
            self.state.can_transition_to(&next),
            "invalid transition {} -> {}",
            self.state.name(),
            next.name()
        );
        trace!(node = %self.name, from = self.state.name(), to = next.name(), "State transition");
        self.state = next;
    }

    fn resting_state(&self) -> NodeState {
        if self.input_buffer.is_empty() {
            NodeState::Idle
        } else {
            NodeState::Buffering
        }
    }

    fn clear_output_buffer(&mut self) {
        self.output_buffer.clear();
        self.output_pending = false;
    }
}

impl<T: Transform> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("type_name", &T::TYPE_NAME)
            .field("state", &self.state)
            .field("output_pending", &self.output_pending)
            .finish_non_exhaustive()
    }
}

impl<T: Transform> ProcessingNode for Node<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn module(&self) -> &'static str {
        T::MODULE
    }

    fn inputs(&self) -> Vec<PortSpec> {
        self.transform.inputs()
    }

    fn outputs(&self) -> Vec<String> {
        self.transform.outputs()
    }

    fn state(&self) -> NodeState {
        self.state
    }

    fn buffer_options(&self) -> BufferOptions {
        self.buffer_options
    }

    fn input_buffer(&self) -> &PortBuffer {
        &self.input_buffer
    }

    fn output_buffer(&self) -> &PortBuffer {
        &self.output_buffer
    }

    fn push(&mut self, port: &str, frame: DataFrame) -> NodeResult<()> {
        let spec = self
            .transform
            .inputs()
            .into_iter()
            .find(|spec| spec.name == port)
            .ok_or_else(|| NodeError::UnknownPort {
                node: self.name.clone(),
                port: port.to_string(),
            })?;

        let expected = self
            .input_buffer
            .get(port)
            .map(DataFrame::kind)
            .unwrap_or(spec.kind);
        if !expected.accepts(frame.kind()) {
            return Err(NodeError::PortKindMismatch {
                node: self.name.clone(),
                port: port.to_string(),
                expected,
                found: frame.kind(),
            });
        }

        if self.buffer_options.clear_output_buffer_on_data_input {
            self.clear_output_buffer();
        }

        trace!(node = %self.name, port, count = frame.data_count(), "Input buffered");
        self.input_buffer
            .append(port, frame)
            .map_err(|found| NodeError::PortKindMismatch {
                node: self.name.clone(),
                port: port.to_string(),
                expected,
                found,
            })?;

        let next = self.resting_state();
        self.set_state(next);
        Ok(())
    }

    fn run(&mut self) -> NodeResult<RunOutcome> {
        let processed = if self.transform.is_processing_condition_satisfied(&self.input_buffer) {
            self.set_state(NodeState::Processing);
            let output = self.transform.process(&self.input_buffer)?;

            if self.buffer_options.clear_input_buffer_after_process {
                self.input_buffer.clear();
            }
            for (port, frame) in output.into_frames() {
                self.output_buffer
                    .append(&port, frame)
                    .map_err(|found| NodeError::PortKindMismatch {
                        node: self.name.clone(),
                        port: port.clone(),
                        expected: self
                            .output_buffer
                            .get(&port)
                            .map(DataFrame::kind)
                            .unwrap_or(found),
                        found,
                    })?;
                self.output_pending = true;
            }
            debug!(node = %self.name, "Processed input buffer");
            true
        } else {
            debug!(node = %self.name, "Processing condition not satisfied");
            false
        };

        let emitted = if self.output_pending
            && self.transform.is_next_node_call_enabled(&self.output_buffer)
        {
            self.output_pending = false;
            Some(self.output_buffer.clone())
        } else {
            None
        };

        // withheld output stays pending until the gate opens
        if emitted.is_some() && self.buffer_options.clear_output_buffer_after_process {
            self.clear_output_buffer();
        }

        let next = if emitted.is_some() {
            NodeState::Emitted
        } else {
            self.resting_state()
        };
        self.set_state(next);

        Ok(RunOutcome { processed, emitted })
    }

    fn dispose(&mut self) {
        self.input_buffer.clear();
        self.clear_output_buffer();
        self.transform.dispose();
        self.set_state(NodeState::Idle);
        debug!(node = %self.name, "Node disposed");
    }
}
