// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node abstraction: the code-generation contract and the kind registry.

use crate::graph::{ShaderMode, Stage};
use crate::port::{DefaultTextureParam, PortType, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Identifier of a node within one stage graph. Ids are chosen by the
/// caller; `NodeId::OUTPUT` always exists and `NodeId::INVALID` is the
/// not-found sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Reserved id of the stage's output node.
    pub const OUTPUT: Self = Self(0);
    /// Sentinel returned by reverse lookups that find nothing.
    pub const INVALID: Self = Self(u32::MAX);

    /// Whether this id is not the invalid sentinel.
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Behavior contract of a shader graph node kind.
///
/// The generator resolves every input port to a variable name (producer
/// output, rendered default literal, or empty string) and allocates one
/// output variable per output port; `generate_code` returns the statements
/// that fill those output variables. `generate_global` contributes
/// declarations (uniforms, varyings) emitted once per shader.
pub trait ShaderNode: Any + Send + Sync {
    /// Registry identifier of this kind.
    fn kind(&self) -> &'static str;

    /// Human-readable title shown by editors.
    fn caption(&self) -> &'static str;

    /// Number of input ports.
    fn input_port_count(&self) -> usize;

    /// Type of the given input port.
    fn input_port_type(&self, port: usize) -> PortType;

    /// Display name of the given input port.
    fn input_port_name(&self, port: usize) -> &'static str;

    /// Built-in default for the given input port, consulted when the caller
    /// has not overridden it. `Absent` means an empty input variable is fine.
    fn input_port_default_value(&self, _port: usize) -> Value {
        Value::Absent
    }

    /// Number of output ports.
    fn output_port_count(&self) -> usize;

    /// Type of the given output port.
    fn output_port_type(&self, port: usize) -> PortType;

    /// Display name of the given output port.
    fn output_port_name(&self, port: usize) -> &'static str;

    /// Whether editors should draw a group separator before this port.
    fn is_port_separator(&self, _port: usize) -> bool {
        false
    }

    /// Property identifiers external inspectors may edit on this node.
    fn editable_properties(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Non-fatal problem with this node's current configuration, if any.
    fn get_warning(&self, _mode: ShaderMode, _stage: Stage) -> Option<String> {
        None
    }

    /// Declarations this node contributes to the shader's global section.
    fn generate_global(&self, _mode: ShaderMode, _stage: Stage, _id: NodeId) -> String {
        String::new()
    }

    /// Statements computing this node's outputs from the resolved inputs.
    ///
    /// `input_vars[i]` is the expression feeding input port `i`, or an empty
    /// string when the port is unconnected and has no default.
    /// `output_vars[i]` is the already-declared variable for output port `i`.
    fn generate_code(
        &self,
        mode: ShaderMode,
        stage: Stage,
        id: NodeId,
        input_vars: &[String],
        output_vars: &[String],
    ) -> String;

    /// Preview-pass variant of `generate_code`. Nodes whose code depends on
    /// stage built-ins unavailable in a preview program override this.
    fn generate_code_for_preview(
        &self,
        mode: ShaderMode,
        stage: Stage,
        id: NodeId,
        input_vars: &[String],
        output_vars: &[String],
    ) -> String {
        self.generate_code(mode, stage, id, input_vars, output_vars)
    }

    /// Texture uniforms this node expects the material system to bind.
    fn default_texture_parameters(&self, _stage: Stage, _id: NodeId) -> Vec<DefaultTextureParam> {
        Vec::new()
    }

    /// Downcast support for editors and the graph itself.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// This node viewed as a uniform, when it is one.
    fn as_uniform(&self) -> Option<&dyn UniformNode> {
        None
    }

    /// Mutable uniform view, when this node is one.
    fn as_uniform_mut(&mut self) -> Option<&mut dyn UniformNode> {
        None
    }
}

/// Extra contract of nodes that declare a named shader uniform.
///
/// Names are user-assigned and must pass the graph's
/// [`validate_uniform_name`](crate::graph::ShaderGraph::validate_uniform_name)
/// rule before being stored.
pub trait UniformNode: ShaderNode {
    /// Current uniform name.
    fn uniform_name(&self) -> &str;

    /// Replace the uniform name.
    fn set_uniform_name(&mut self, name: &str);
}

/// Factory producing a fresh node of one kind.
pub type NodeFactory = fn() -> Box<dyn ShaderNode>;

/// Registry of node kinds available to editors.
///
/// Keyed by the kind identifier each node reports from
/// [`ShaderNode::kind`]; registration order is preserved for menus.
#[derive(Default)]
pub struct NodeRegistry {
    factories: IndexMap<&'static str, NodeFactory>,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node kind under its identifier.
    pub fn register(&mut self, kind: &'static str, factory: NodeFactory) {
        debug_assert_eq!(factory().kind(), kind);
        self.factories.insert(kind, factory);
    }

    /// Instantiate a node of the given kind.
    pub fn create(&self, kind: &str) -> Option<Box<dyn ShaderNode>> {
        self.factories.get(kind).map(|factory| factory())
    }

    /// Whether a kind is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// All registered kind identifiers, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::InputNode;

    #[test]
    fn test_node_id_sentinels() {
        assert_eq!(NodeId::OUTPUT, NodeId(0));
        assert!(!NodeId::INVALID.is_valid());
        assert!(NodeId(7).is_valid());
    }

    #[test]
    fn test_registry_create() {
        let mut registry = NodeRegistry::new();
        registry.register("input", || Box::new(InputNode::default()));

        assert!(registry.contains("input"));
        let node = registry.create("input").unwrap();
        assert_eq!(node.kind(), "input");
        assert!(registry.create("no_such_kind").is_none());
    }

    #[test]
    fn test_registry_preserves_order() {
        let mut registry = NodeRegistry::new();
        registry.register("input", || Box::new(InputNode::default()));
        let kinds: Vec<_> = registry.kinds().collect();
        assert_eq!(kinds, vec!["input"]);
    }
}
