// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-stage graph model: node CRUD, connection validation, lazy generation.

use crate::codegen::{self, GeneratedShader};
use crate::connection::Connection;
use crate::node::{NodeId, ShaderNode};
use crate::nodes::{InputNode, OutputNode};
use crate::port::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Shader program phase. Each stage owns an independent graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Per-vertex computation.
    Vertex,
    /// Per-fragment computation.
    Fragment,
    /// Per-light computation.
    Light,
}

impl Stage {
    /// All stages, in generation order.
    pub const ALL: [Stage; 3] = [Stage::Vertex, Stage::Fragment, Stage::Light];

    /// Index into per-stage storage.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Vertex => 0,
            Self::Fragment => 1,
            Self::Light => 2,
        }
    }

    /// Name of the stage's entry function in generated source.
    pub fn function_name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Light => "light",
        }
    }

    /// Short tag used inside generated identifiers.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Vertex => "vtx",
            Self::Fragment => "frg",
            Self::Light => "lgt",
        }
    }
}

/// Kind of material the shader targets; selects the `shader_type` header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderMode {
    /// 3D material.
    #[default]
    Spatial,
    /// 2D material.
    CanvasItem,
    /// Particle processing material.
    Particles,
}

impl ShaderMode {
    /// Keyword emitted in the `shader_type` header line.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Spatial => "spatial",
            Self::CanvasItem => "canvas_item",
            Self::Particles => "particles",
        }
    }
}

/// A node registered in a stage graph: the polymorphic kind plus the
/// per-instance state the editor mutates (position, default overrides,
/// preview port).
pub(crate) struct GraphNode {
    node: Box<dyn ShaderNode>,
    position: [f32; 2],
    defaults: BTreeMap<usize, Value>,
    preview_port: Option<usize>,
}

impl GraphNode {
    fn new(node: Box<dyn ShaderNode>, position: [f32; 2]) -> Self {
        Self {
            node,
            position,
            defaults: BTreeMap::new(),
            preview_port: None,
        }
    }

    pub(crate) fn node(&self) -> &dyn ShaderNode {
        self.node.as_ref()
    }

    fn node_mut(&mut self) -> &mut dyn ShaderNode {
        self.node.as_mut()
    }

    /// Caller override if present, otherwise the kind's built-in default.
    pub(crate) fn default_input_value(&self, port: usize) -> Value {
        match self.defaults.get(&port) {
            Some(value) => *value,
            None => self.node.input_port_default_value(port),
        }
    }

    pub(crate) fn preview_output_port(&self) -> Option<usize> {
        self.preview_port
    }
}

/// One stage's nodes and connections.
#[derive(Default)]
pub(crate) struct StageGraph {
    pub(crate) nodes: IndexMap<NodeId, GraphNode>,
    pub(crate) connections: Vec<Connection>,
}

impl StageGraph {
    /// Whether `target` is `start` itself or a transitive producer of it.
    fn feeds_into(&self, target: NodeId, start: NodeId) -> bool {
        let mut stack = vec![start];
        let mut visited = Vec::new();
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if visited.contains(&current) {
                continue;
            }
            visited.push(current);
            for conn in &self.connections {
                if conn.to_node == current {
                    stack.push(conn.from_node);
                }
            }
        }
        false
    }
}

/// Error from a graph mutation or generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Node id is already in use in this stage.
    #[error("node id {0:?} is already in use")]
    DuplicateId(NodeId),

    /// Node id does not exist in this stage.
    #[error("node id {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// Port index out of range for the node.
    #[error("port {port} out of range for node {node:?}")]
    PortNotFound {
        /// Node id.
        node: NodeId,
        /// Port index.
        port: usize,
    },

    /// The stage's output node cannot be removed.
    #[error("the output node cannot be removed")]
    ProtectedNode,

    /// Connection failed validation (range, type, self-loop, duplicate or
    /// cycle).
    #[error("invalid connection {0:?}")]
    InvalidConnection(Connection),

    /// No such connection to disconnect.
    #[error("no such connection {0:?}")]
    ConnectionNotFound(Connection),

    /// Generation re-entered a node still being written.
    #[error("cycle detected while generating node {0:?}")]
    CycleDetected(NodeId),
}

/// A visual shader: one node graph per stage, compiled on demand into
/// shading-language source.
///
/// All mutation is single-writer; generation caches its result and any
/// structural change invalidates the cache (position and pan changes are
/// exempt).
pub struct ShaderGraph {
    mode: ShaderMode,
    pub(crate) stages: [StageGraph; 3],
    graph_offset: [f32; 2],
    dirty: bool,
    cached: Option<GeneratedShader>,
}

impl ShaderGraph {
    /// Create a shader graph with an output node (id 0) in every stage.
    pub fn new() -> Self {
        let mut stages: [StageGraph; 3] = Default::default();
        for stage in Stage::ALL {
            stages[stage.index()].nodes.insert(
                NodeId::OUTPUT,
                GraphNode::new(Box::new(OutputNode::new(stage)), [400.0, 150.0]),
            );
        }
        Self {
            mode: ShaderMode::Spatial,
            stages,
            graph_offset: [0.0, 0.0],
            dirty: true,
            cached: None,
        }
    }

    fn stage(&self, stage: Stage) -> &StageGraph {
        &self.stages[stage.index()]
    }

    fn stage_mut(&mut self, stage: Stage) -> &mut StageGraph {
        &mut self.stages[stage.index()]
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether the cached source is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current shader mode.
    pub fn mode(&self) -> ShaderMode {
        self.mode
    }

    /// Change the shader mode; invalidates generated source.
    pub fn set_mode(&mut self, mode: ShaderMode) {
        if self.mode != mode {
            self.mode = mode;
            self.mark_dirty();
        }
    }

    /// Editor pan offset. Pure metadata.
    pub fn graph_offset(&self) -> [f32; 2] {
        self.graph_offset
    }

    /// Set the editor pan offset. Does not invalidate generated source.
    pub fn set_graph_offset(&mut self, offset: [f32; 2]) {
        self.graph_offset = offset;
    }

    /// Register `node` under the caller-chosen `id`.
    ///
    /// Input and output nodes are bound to `stage` so their port tables
    /// resolve against the right built-ins.
    pub fn add_node(
        &mut self,
        stage: Stage,
        mut node: Box<dyn ShaderNode>,
        position: [f32; 2],
        id: NodeId,
    ) -> Result<(), GraphError> {
        if !id.is_valid() || self.stage(stage).nodes.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        if let Some(input) = node.as_any_mut().downcast_mut::<InputNode>() {
            input.set_stage(stage);
        }
        if let Some(output) = node.as_any_mut().downcast_mut::<OutputNode>() {
            output.set_stage(stage);
        }
        debug!(?stage, ?id, kind = node.kind(), "adding node");
        self.stage_mut(stage)
            .nodes
            .insert(id, GraphNode::new(node, position));
        self.mark_dirty();
        Ok(())
    }

    /// Smallest id strictly greater than every id in use. Never 0.
    pub fn get_valid_node_id(&self, stage: Stage) -> NodeId {
        let max = self.stage(stage).nodes.keys().map(|id| id.0).max();
        NodeId(max.map_or(1, |m| m + 1))
    }

    /// Delete a node and every connection touching it.
    pub fn remove_node(&mut self, stage: Stage, id: NodeId) -> Result<(), GraphError> {
        if id == NodeId::OUTPUT {
            return Err(GraphError::ProtectedNode);
        }
        let sg = self.stage_mut(stage);
        if sg.nodes.shift_remove(&id).is_none() {
            return Err(GraphError::NodeNotFound(id));
        }
        sg.connections.retain(|conn| !conn.involves_node(id));
        debug!(?stage, ?id, "removed node");
        self.mark_dirty();
        Ok(())
    }

    /// Borrow a node's kind object.
    pub fn get_node(&self, stage: Stage, id: NodeId) -> Option<&dyn ShaderNode> {
        self.stage(stage).nodes.get(&id).map(GraphNode::node)
    }

    /// Mutably borrow a node's kind object.
    ///
    /// Conservatively invalidates generated source, since property edits
    /// (operators, uniform names, input selections) change the output.
    pub fn get_node_mut(&mut self, stage: Stage, id: NodeId) -> Option<&mut dyn ShaderNode> {
        self.mark_dirty();
        self.stage_mut(stage).nodes.get_mut(&id).map(GraphNode::node_mut)
    }

    /// Move a node. Pure metadata.
    pub fn set_node_position(
        &mut self,
        stage: Stage,
        id: NodeId,
        position: [f32; 2],
    ) -> Result<(), GraphError> {
        let gnode = self
            .stage_mut(stage)
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?;
        gnode.position = position;
        Ok(())
    }

    /// Current editor position of a node.
    pub fn get_node_position(&self, stage: Stage, id: NodeId) -> Option<[f32; 2]> {
        self.stage(stage).nodes.get(&id).map(|gnode| gnode.position)
    }

    /// All node ids in the stage, ascending.
    pub fn get_node_list(&self, stage: Stage) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.stage(stage).nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Reverse lookup by node identity. Returns [`NodeId::INVALID`] when the
    /// object is not registered in the stage.
    pub fn find_node_id(&self, stage: Stage, node: &dyn ShaderNode) -> NodeId {
        for (id, gnode) in &self.stage(stage).nodes {
            if std::ptr::addr_eq(gnode.node(), node) {
                return *id;
            }
        }
        NodeId::INVALID
    }

    /// Default value override (or the kind's built-in default) for an input
    /// port. `Absent` when the node is missing or the port has no default.
    pub fn default_input_value(&self, stage: Stage, id: NodeId, port: usize) -> Value {
        self.stage(stage)
            .nodes
            .get(&id)
            .map_or(Value::Absent, |gnode| gnode.default_input_value(port))
    }

    /// Override an input port's default. `Value::Absent` clears the override,
    /// falling back to the kind's built-in default.
    pub fn set_default_input_value(
        &mut self,
        stage: Stage,
        id: NodeId,
        port: usize,
        value: Value,
    ) -> Result<(), GraphError> {
        let gnode = self
            .stage_mut(stage)
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?;
        if value.is_absent() {
            gnode.defaults.remove(&port);
        } else {
            gnode.defaults.insert(port, value);
        }
        self.mark_dirty();
        Ok(())
    }

    /// Output port representing this node in whole-graph previews.
    pub fn preview_output_port(&self, stage: Stage, id: NodeId) -> Option<usize> {
        self.stage(stage)
            .nodes
            .get(&id)
            .and_then(GraphNode::preview_output_port)
    }

    /// Select which output port represents this node in whole-graph previews.
    pub fn set_preview_output_port(
        &mut self,
        stage: Stage,
        id: NodeId,
        port: Option<usize>,
    ) -> Result<(), GraphError> {
        let gnode = self
            .stage_mut(stage)
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound(id))?;
        gnode.preview_port = port;
        Ok(())
    }

    /// Whether a connection would be accepted by [`connect_nodes`].
    ///
    /// False when either node is missing, a port is out of range, the
    /// connection is a self-loop, the port types are incompatible, the exact
    /// connection already exists, or it would close a cycle.
    ///
    /// [`connect_nodes`]: ShaderGraph::connect_nodes
    pub fn can_connect_nodes(
        &self,
        stage: Stage,
        from_node: NodeId,
        from_port: usize,
        to_node: NodeId,
        to_port: usize,
    ) -> bool {
        let sg = self.stage(stage);
        let (Some(from), Some(to)) = (sg.nodes.get(&from_node), sg.nodes.get(&to_node)) else {
            return false;
        };
        if from_port >= from.node().output_port_count() || to_port >= to.node().input_port_count() {
            return false;
        }
        if from_node == to_node {
            return false;
        }
        let from_type = from.node().output_port_type(from_port);
        let to_type = to.node().input_port_type(to_port);
        if !from_type.can_connect_to(to_type) {
            return false;
        }
        if self.is_node_connection(stage, from_node, from_port, to_node, to_port) {
            return false;
        }
        // Reject edges that would make the destination feed its own producer.
        if sg.feeds_into(to_node, from_node) {
            return false;
        }
        true
    }

    /// Connect an output port to an input port.
    ///
    /// An input accepts one incoming connection; connecting over an occupied
    /// input replaces the previous connection.
    pub fn connect_nodes(
        &mut self,
        stage: Stage,
        from_node: NodeId,
        from_port: usize,
        to_node: NodeId,
        to_port: usize,
    ) -> Result<(), GraphError> {
        let conn = Connection::new(from_node, from_port, to_node, to_port);
        if !self.can_connect_nodes(stage, from_node, from_port, to_node, to_port) {
            warn!(?stage, ?conn, "rejected connection");
            return Err(GraphError::InvalidConnection(conn));
        }
        let sg = self.stage_mut(stage);
        sg.connections
            .retain(|existing| !(existing.to_node == to_node && existing.to_port == to_port));
        sg.connections.push(conn);
        debug!(?stage, ?conn, "connected");
        self.mark_dirty();
        Ok(())
    }

    /// Remove the exact matching connection.
    pub fn disconnect_nodes(
        &mut self,
        stage: Stage,
        from_node: NodeId,
        from_port: usize,
        to_node: NodeId,
        to_port: usize,
    ) -> Result<(), GraphError> {
        let conn = Connection::new(from_node, from_port, to_node, to_port);
        let sg = self.stage_mut(stage);
        let Some(index) = sg.connections.iter().position(|existing| *existing == conn) else {
            return Err(GraphError::ConnectionNotFound(conn));
        };
        sg.connections.remove(index);
        self.mark_dirty();
        Ok(())
    }

    /// Whether the exact connection currently exists.
    pub fn is_node_connection(
        &self,
        stage: Stage,
        from_node: NodeId,
        from_port: usize,
        to_node: NodeId,
        to_port: usize,
    ) -> bool {
        let conn = Connection::new(from_node, from_port, to_node, to_port);
        self.stage(stage).connections.contains(&conn)
    }

    /// Snapshot of the stage's connections, in creation order.
    pub fn get_node_connections(&self, stage: Stage) -> Vec<Connection> {
        self.stage(stage).connections.clone()
    }

    /// Produce a legal, collision-free uniform name from `name`.
    ///
    /// Non-identifier characters are stripped and a leading digit removed;
    /// collisions with reserved words or other uniforms (in any stage) get a
    /// numeric suffix. `exclude` is the uniform being renamed, compared by
    /// identity, so a node may keep its own name.
    pub fn validate_uniform_name(&self, name: &str, exclude: Option<&dyn ShaderNode>) -> String {
        let mut base: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        while base.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            base.remove(0);
        }
        if base.is_empty() {
            base = String::from("unnamed");
        }
        if !self.uniform_name_taken(&base, exclude) {
            return base;
        }
        let mut counter = 2u32;
        loop {
            let candidate = format!("{base}_{counter}");
            if !self.uniform_name_taken(&candidate, exclude) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn uniform_name_taken(&self, candidate: &str, exclude: Option<&dyn ShaderNode>) -> bool {
        if RESERVED_IDENTIFIERS.contains(&candidate) {
            return true;
        }
        self.stages.iter().any(|sg| {
            sg.nodes.values().any(|gnode| {
                let is_excluded =
                    exclude.is_some_and(|node| std::ptr::addr_eq(gnode.node(), node));
                !is_excluded
                    && gnode
                        .node()
                        .as_uniform()
                        .is_some_and(|uniform| uniform.uniform_name() == candidate)
            })
        })
    }

    /// Source text and texture parameters for the whole shader.
    ///
    /// Recomputed only when a structural mutation has occurred since the
    /// last call; otherwise the cached result is returned unchanged.
    pub fn generate_shader(&mut self) -> Result<&GeneratedShader, GraphError> {
        if self.dirty {
            self.cached = None;
            self.dirty = false;
        }
        if self.cached.is_none() {
            let shader = codegen::generate(self.mode, &self.stages)?;
            self.cached = Some(shader);
        }
        Ok(self.cached.as_ref().unwrap())
    }

    /// Shader isolating one node output for inspection.
    ///
    /// `port: None` uses the node's preview output port (or port 0). The
    /// pass is independent of [`generate_shader`](ShaderGraph::generate_shader)
    /// and leaves the cache untouched.
    pub fn generate_preview_shader(
        &self,
        stage: Stage,
        node: NodeId,
        port: Option<usize>,
    ) -> Result<GeneratedShader, GraphError> {
        codegen::generate_preview(self.mode, self.stage(stage), stage, node, port)
    }
}

impl Default for ShaderGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifiers a uniform name may never shadow.
const RESERVED_IDENTIFIERS: &[&str] = &[
    "uniform",
    "varying",
    "const",
    "void",
    "bool",
    "int",
    "float",
    "vec2",
    "vec3",
    "vec4",
    "mat2",
    "mat3",
    "mat4",
    "sampler2D",
    "if",
    "else",
    "for",
    "while",
    "return",
    "true",
    "false",
    "discard",
    "vertex",
    "fragment",
    "light",
];
