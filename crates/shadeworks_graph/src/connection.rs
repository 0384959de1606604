// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// A directed edge from an output port to an input port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Source node id.
    pub from_node: NodeId,
    /// Output port index on the source node.
    pub from_port: usize,
    /// Destination node id.
    pub to_node: NodeId,
    /// Input port index on the destination node.
    pub to_port: usize,
}

impl Connection {
    /// Create a new connection.
    pub fn new(from_node: NodeId, from_port: usize, to_node: NodeId, to_port: usize) -> Self {
        Self {
            from_node,
            from_port,
            to_node,
            to_port,
        }
    }

    /// Check if this connection touches a specific node on either side.
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involves_node() {
        let conn = Connection::new(NodeId(2), 0, NodeId(0), 1);
        assert!(conn.involves_node(NodeId(2)));
        assert!(conn.involves_node(NodeId(0)));
        assert!(!conn.involves_node(NodeId(5)));
    }

    #[test]
    fn test_serialization() {
        let conn = Connection::new(NodeId(3), 1, NodeId(4), 0);
        let ron_str = ron::to_string(&conn).unwrap();
        let loaded: Connection = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, conn);
    }
}
