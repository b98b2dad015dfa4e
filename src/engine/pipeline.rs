use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use crate::core::{DataFrame, ProcessingNode};
use crate::nodes::GainNode;
use crate::observability::NodeMetrics;

/// Linear chain of nodes built from a JSON description
pub struct Pipeline {
    nodes: HashMap<String, Box<dyn ProcessingNode>>,
    metrics: HashMap<String, Arc<NodeMetrics>>,
    order: Vec<String>,
}

impl Pipeline {
    pub async fn from_json(config: Value) -> Result<Self> {
        let mut nodes: HashMap<String, Box<dyn ProcessingNode>> = HashMap::new();
        let mut metrics = HashMap::new();
        let mut connections = Vec::new();

        // Parse nodes
        if let Some(nodes_array) = config["nodes"].as_array() {
            for node_config in nodes_array {
                let id = node_config["id"].as_str()
                    .ok_or(anyhow!("Node missing id"))?
                    .to_string();
                let node_type = node_config["type"].as_str()
                    .ok_or(anyhow!("Node '{}' missing type", id))?;
                let node_cfg = node_config["config"].clone();

                if nodes.contains_key(&id) {
                    return Err(anyhow!("Duplicate node id: {}", id));
                }

                let mut node: Box<dyn ProcessingNode> = match node_type {
                    "Gain" => {
                        let gain = GainNode::with_id(id.clone());
                        metrics.insert(id.clone(), gain.metrics());
                        Box::new(gain)
                    }
                    _ => return Err(anyhow!("Unknown node type: {}", node_type)),
                };

                node.on_create(node_cfg).await
                    .with_context(|| format!("Failed to create node '{}'", id))?;
                nodes.insert(id, node);
            }
        }

        if nodes.is_empty() {
            return Err(anyhow!("Pipeline has no nodes"));
        }

        // Parse connections
        if let Some(conns_array) = config["connections"].as_array() {
            for conn in conns_array {
                let from = conn["from"].as_str()
                    .ok_or(anyhow!("Connection missing from"))?
                    .to_string();
                let to = conn["to"].as_str()
                    .ok_or(anyhow!("Connection missing to"))?
                    .to_string();
                for id in [&from, &to] {
                    if !nodes.contains_key(id) {
                        return Err(anyhow!("Connection references unknown node: {}", id));
                    }
                }
                connections.push((from, to));
            }
        }

        let order = Self::execution_order(&nodes, &connections)?;
        log::debug!("Pipeline built: {}", order.join(" -> "));

        Ok(Self { nodes, metrics, order })
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await
            .with_context(|| format!("Failed to read pipeline config {}", path.display()))?;
        let config: Value = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        Self::from_json(config).await
    }

    /// Resolve the single chain from source to sink
    fn execution_order(
        nodes: &HashMap<String, Box<dyn ProcessingNode>>,
        connections: &[(String, String)],
    ) -> Result<Vec<String>> {
        let mut next: HashMap<&str, &str> = HashMap::new();
        let mut has_incoming = HashSet::new();

        for (from, to) in connections {
            if next.insert(from.as_str(), to.as_str()).is_some() {
                return Err(anyhow!("Node '{}' has more than one outgoing connection", from));
            }
            if !has_incoming.insert(to.as_str()) {
                return Err(anyhow!("Node '{}' has more than one incoming connection", to));
            }
        }

        let sources: Vec<&str> = nodes.keys()
            .map(|id| id.as_str())
            .filter(|id| !has_incoming.contains(id))
            .collect();
        let source = match sources.as_slice() {
            [source] => *source,
            [] => return Err(anyhow!("Pipeline has no source node (cycle)")),
            _ => return Err(anyhow!("Pipeline has {} source nodes, expected one", sources.len())),
        };

        let mut order = vec![source.to_string()];
        let mut current = source;
        while let Some(&to) = next.get(current) {
            if order.iter().any(|id| id == to) {
                return Err(anyhow!("Pipeline contains a cycle at '{}'", to));
            }
            order.push(to.to_string());
            current = to;
        }

        if order.len() != nodes.len() {
            return Err(anyhow!(
                "Pipeline is not a single chain: reached {} of {} nodes",
                order.len(),
                nodes.len()
            ));
        }

        Ok(order)
    }

    /// Node ids in execution order
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn metrics(&self, node_id: &str) -> Option<Arc<NodeMetrics>> {
        self.metrics.get(node_id).cloned()
    }

    /// Run one frame through every node in order
    pub async fn execute(&self, frame: DataFrame) -> Result<DataFrame> {
        let mut current_frame = frame;
        for node_id in &self.order {
            let node = self.nodes.get(node_id)
                .ok_or_else(|| anyhow!("Node '{}' missing from pipeline", node_id))?;
            current_frame = node.process(current_frame).await
                .with_context(|| format!("Node '{}' failed", node_id))?;
        }
        Ok(current_frame)
    }
}
