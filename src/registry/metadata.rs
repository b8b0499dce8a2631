use crate::core::{FrameKind, Node, NodeResult, PortSpec, ProcessingNode, Transform};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata describing a port (input or output)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMetadata {
    pub name: String,
    pub data_type: FrameKind,
}

impl From<&PortSpec> for PortMetadata {
    fn from(spec: &PortSpec) -> Self {
        Self {
            name: spec.name.to_string(),
            data_type: spec.kind,
        }
    }
}

/// Factory function type for creating validated node instances
pub type NodeFactory = fn(&str, &Value) -> NodeResult<Box<dyn ProcessingNode>>;

/// Complete metadata for a node type
#[derive(Clone)]
pub struct NodeMetadata {
    pub type_name: String,
    pub module: String,
    pub category: String,
    pub inputs: Vec<PortMetadata>,
    /// Statically declared outputs; nodes with configurable outputs list none
    pub outputs: Vec<PortMetadata>,
    pub factory: NodeFactory,
}

fn build_node<T: Transform>(name: &str, parameters: &Value) -> NodeResult<Box<dyn ProcessingNode>> {
    Ok(Box::new(Node::<T>::from_parameters(name, parameters)?))
}

impl NodeMetadata {
    pub fn of<T: Transform>() -> Self {
        Self {
            type_name: T::TYPE_NAME.to_string(),
            module: T::MODULE.to_string(),
            category: T::CATEGORY.to_string(),
            inputs: T::INPUTS.iter().map(PortMetadata::from).collect(),
            outputs: T::OUTPUTS.iter().map(PortMetadata::from).collect(),
            factory: build_node::<T>,
        }
    }

    /// Validate `parameters` and create a new instance of this node type
    pub fn create_instance(&self, name: &str, parameters: &Value) -> NodeResult<Box<dyn ProcessingNode>> {
        (self.factory)(name, parameters)
    }

    /// Module-qualified type name, e.g. `node.processing.interpolate.Interpolate`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.type_name)
    }
}

impl std::fmt::Debug for NodeMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeMetadata")
            .field("type_name", &self.type_name)
            .field("module", &self.module)
            .field("category", &self.category)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

// Factory type for creating node metadata at runtime
pub type NodeMetadataFactory = fn() -> NodeMetadata;

// Wrapper for inventory collection
pub struct NodeMetadataFactoryWrapper(pub NodeMetadataFactory);

// Inventory submission type
inventory::collect!(NodeMetadataFactoryWrapper);
