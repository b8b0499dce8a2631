use serde::{Deserialize, Serialize};
use serde_json::Value;

fn main_port() -> String {
    "main".to_string()
}

/// JSON description of a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    /// Registered type name, plain (`Interpolate`) or module-qualified
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub config: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub from: String,
    #[serde(default = "main_port")]
    pub output: String,
    pub to: String,
    #[serde(default = "main_port")]
    pub input: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ports_default_to_main() {
        let config: PipelineConfig = serde_json::from_value(json!({
            "nodes": [
                {"id": "a", "type": "DataReplicate"},
                {"id": "b", "type": "Interpolate", "config": {"window_size": 2}}
            ],
            "connections": [{"from": "a", "to": "b"}]
        }))
        .unwrap();

        assert_eq!(config.nodes[0].config, Value::Null);
        assert_eq!(config.connections[0].output, "main");
        assert_eq!(config.connections[0].input, "main");
    }
}
