//! Node type lookup.
//!
//! Built-in nodes are always listed. Node types defined elsewhere register
//! themselves through `inventory` via `#[derive(PipelineNode)]`.

pub mod metadata;

pub use metadata::{
    NodeFactory, NodeMetadata, NodeMetadataFactory, NodeMetadataFactoryWrapper, PortMetadata,
};

/// Every known node type, built-ins first, each type name listed once
pub fn all() -> Vec<NodeMetadata> {
    let mut nodes = crate::nodes::builtin();
    for wrapper in inventory::iter::<NodeMetadataFactoryWrapper> {
        let metadata = (wrapper.0)();
        if !nodes.iter().any(|known| known.type_name == metadata.type_name) {
            nodes.push(metadata);
        }
    }
    nodes
}

/// Find a node type by type name (`Interpolate`) or module-qualified name
pub fn lookup(type_name: &str) -> Option<NodeMetadata> {
    all()
        .into_iter()
        .find(|metadata| metadata.type_name == type_name || metadata.qualified_name() == type_name)
}
