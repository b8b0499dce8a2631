use super::config::{ConnectionConfig, PipelineConfig};
use crate::core::{DataFrame, ProcessingNode};
use crate::registry;
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use tracing::{debug, info};

/// A directed edge from one node's output port to another node's input port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub from: String,
    pub output: String,
    pub to: String,
    pub input: String,
}

/// Output that left the pipeline through a port with no downstream connection
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub node: String,
    pub port: String,
    pub frame: DataFrame,
}

/// Outcome of one pass over all nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tick {
    /// Number of nodes whose processing condition held
    pub processed: usize,
    pub emissions: Vec<Emission>,
}

/// A graph of processing nodes driven tick by tick.
///
/// Nodes run in topological order, so data emitted by a node reaches its
/// downstream nodes within the same tick.
#[derive(Default)]
pub struct Pipeline {
    nodes: Vec<Box<dyn ProcessingNode>>,
    index: HashMap<String, usize>,
    connections: Vec<Connection>,
    order: Vec<usize>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(config: Value) -> Result<Self> {
        let config: PipelineConfig =
            serde_json::from_value(config).context("Invalid pipeline configuration")?;
        Self::from_config(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline file {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid pipeline configuration in {}", path.display()))?;
        Self::from_config(config)
    }

    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        let mut pipeline = Self::new();

        for node in &config.nodes {
            let metadata = registry::lookup(&node.node_type)
                .ok_or_else(|| anyhow!("Unknown node type: {}", node.node_type))?;
            let instance = metadata
                .create_instance(&node.id, &node.config)
                .with_context(|| format!("Failed to create node `{}`", node.id))?;
            pipeline.add_node(instance)?;
        }

        for ConnectionConfig { from, output, to, input } in &config.connections {
            pipeline.connect(from, output, to, input)?;
        }

        info!(
            nodes = pipeline.nodes.len(),
            connections = pipeline.connections.len(),
            "Pipeline built"
        );
        Ok(pipeline)
    }

    pub fn add_node(&mut self, node: Box<dyn ProcessingNode>) -> Result<()> {
        let name = node.name().to_string();
        if self.index.contains_key(&name) {
            bail!("Duplicate node name: {}", name);
        }

        self.index.insert(name, self.nodes.len());
        self.order.push(self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn connect(&mut self, from: &str, output: &str, to: &str, input: &str) -> Result<()> {
        let source = self.position(from)?;
        let target = self.position(to)?;

        if !self.nodes[source].outputs().iter().any(|port| port == output) {
            bail!("Node `{}` has no output port `{}`", from, output);
        }
        if !self.nodes[target].inputs().iter().any(|port| port.name == input) {
            bail!("Node `{}` has no input port `{}`", to, input);
        }

        let connection = Connection {
            from: from.to_string(),
            output: output.to_string(),
            to: to.to_string(),
            input: input.to_string(),
        };
        if self.connections.contains(&connection) {
            bail!("Already connected: {}.{} -> {}.{}", from, output, to, input);
        }

        self.connections.push(connection);
        match self.topological_order() {
            Some(order) => self.order = order,
            None => {
                self.connections.pop();
                bail!("Connecting `{}` to `{}` would create a cycle", from, to);
            }
        }

        debug!(from, output, to, input, "Nodes connected");
        Ok(())
    }

    /// Kahn's algorithm, ties broken by insertion order
    fn topological_order(&self) -> Option<Vec<usize>> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        for connection in &self.connections {
            in_degree[self.index[&connection.to]] += 1;
        }

        let mut ready: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&node| in_degree[node] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(node) = ready.pop_front() {
            order.push(node);
            let name = self.nodes[node].name();
            for connection in self.connections.iter().filter(|c| c.from == name) {
                let target = self.index[&connection.to];
                in_degree[target] -= 1;
                if in_degree[target] == 0 {
                    ready.push_back(target);
                }
            }
        }

        (order.len() == self.nodes.len()).then_some(order)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("Unknown node: {}", name))
    }

    pub fn node(&self, name: &str) -> Option<&dyn ProcessingNode> {
        self.index.get(name).map(|&position| self.nodes[position].as_ref())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &dyn ProcessingNode> {
        self.nodes.iter().map(|node| node.as_ref())
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Node names in execution order
    pub fn execution_order(&self) -> Vec<&str> {
        self.order.iter().map(|&node| self.nodes[node].name()).collect()
    }

    /// Feed data into a node from outside the pipeline
    pub fn push(&mut self, node: &str, port: &str, frame: DataFrame) -> Result<()> {
        let position = self.position(node)?;
        self.nodes[position]
            .push(port, frame)
            .with_context(|| format!("Failed to push to `{}.{}`", node, port))
    }

    /// Run every node once and return the emissions leaving the pipeline
    pub fn execute_once(&mut self) -> Result<Vec<Emission>> {
        Ok(self.tick()?.emissions)
    }

    pub fn tick(&mut self) -> Result<Tick> {
        let mut tick = Tick::default();

        for step in 0..self.order.len() {
            let position = self.order[step];
            let node = &mut self.nodes[position];
            let outcome = node
                .run()
                .with_context(|| format!("Node `{}` failed", node.name()))?;
            if outcome.processed {
                tick.processed += 1;
            }
            let Some(emitted) = outcome.emitted else {
                continue;
            };
            let name = node.name().to_string();

            for (port, frame) in emitted.into_frames() {
                let targets: Vec<(usize, String)> = self
                    .connections
                    .iter()
                    .filter(|c| c.from == name && c.output == port)
                    .map(|c| (self.index[&c.to], c.input.clone()))
                    .collect();

                if targets.is_empty() {
                    tick.emissions.push(Emission {
                        node: name.clone(),
                        port,
                        frame,
                    });
                    continue;
                }
                for (target, input) in targets {
                    let target_node = &mut self.nodes[target];
                    target_node.push(&input, frame.clone()).with_context(|| {
                        format!("Failed to deliver `{}.{}` to `{}.{}`", name, port, target_node.name(), input)
                    })?;
                }
            }
        }

        debug!(processed = tick.processed, emissions = tick.emissions.len(), "Tick complete");
        Ok(tick)
    }

    /// Tick until no node processes anymore, or `max_ticks` is reached
    pub fn run_until_idle(&mut self, max_ticks: usize) -> Result<Vec<Emission>> {
        let mut emissions = Vec::new();
        for _ in 0..max_ticks {
            let tick = self.tick()?;
            emissions.extend(tick.emissions);
            if tick.processed == 0 {
                break;
            }
        }
        Ok(emissions)
    }

    pub fn dispose(&mut self) {
        for node in &mut self.nodes {
            node.dispose();
        }
        info!(nodes = self.nodes.len(), "Pipeline disposed");
    }
}
