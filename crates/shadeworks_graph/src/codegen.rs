// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader source generation: dependency-ordered node emission.

use crate::connection::Connection;
use crate::graph::{GraphError, ShaderMode, Stage, StageGraph};
use crate::node::NodeId;
use crate::port::{DefaultTextureParam, PortType};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Result of a generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedShader {
    /// Complete shading-language source text.
    pub source: String,
    /// Texture uniforms the material system should bind, deduplicated by
    /// name, in first-use order.
    pub default_texture_params: Vec<DefaultTextureParam>,
    /// Non-fatal problems reported by nodes during the pass.
    pub warnings: Vec<ShaderWarning>,
}

/// A node-reported problem that did not stop generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderWarning {
    /// Stage the node lives in.
    pub stage: Stage,
    /// The offending node.
    pub node: NodeId,
    /// Human-readable description.
    pub message: String,
}

/// Variable holding output `port` of `node` in generated source.
fn output_var(node: NodeId, port: usize) -> String {
    format!("n{}_p{}", node.0, port)
}

/// Per-stage emission state. Walks the dependency graph depth-first from a
/// root, emitting every reachable node exactly once, producers before
/// consumers.
struct Emitter<'a> {
    mode: ShaderMode,
    stage: Stage,
    graph: &'a StageGraph,
    /// `(to_node, to_port)` -> the connection feeding that input.
    input_index: HashMap<(NodeId, usize), Connection>,
    globals: &'a mut Vec<String>,
    params: &'a mut Vec<DefaultTextureParam>,
    warnings: &'a mut Vec<ShaderWarning>,
    processed: HashSet<NodeId>,
    in_flight: HashSet<NodeId>,
    for_preview: bool,
}

impl<'a> Emitter<'a> {
    fn new(
        mode: ShaderMode,
        stage: Stage,
        graph: &'a StageGraph,
        globals: &'a mut Vec<String>,
        params: &'a mut Vec<DefaultTextureParam>,
        warnings: &'a mut Vec<ShaderWarning>,
        for_preview: bool,
    ) -> Self {
        let input_index = graph
            .connections
            .iter()
            .map(|conn| ((conn.to_node, conn.to_port), *conn))
            .collect();
        Self {
            mode,
            stage,
            graph,
            input_index,
            globals,
            params,
            warnings,
            processed: HashSet::new(),
            in_flight: HashSet::new(),
            for_preview,
        }
    }

    fn write_node(&mut self, code: &mut String, id: NodeId) -> Result<(), GraphError> {
        if self.processed.contains(&id) {
            return Ok(());
        }
        if !self.in_flight.insert(id) {
            return Err(GraphError::CycleDetected(id));
        }
        let graph = self.graph;
        let gnode = graph.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))?;
        let node = gnode.node();

        // Producers first; their output variables feed this node's inputs.
        let mut input_vars = Vec::with_capacity(node.input_port_count());
        for port in 0..node.input_port_count() {
            if let Some(conn) = self.input_index.get(&(id, port)).copied() {
                self.write_node(code, conn.from_node)?;
                let producer = graph
                    .nodes
                    .get(&conn.from_node)
                    .ok_or(GraphError::NodeNotFound(conn.from_node))?;
                let mut var = output_var(conn.from_node, conn.from_port);
                let src = producer.node().output_port_type(conn.from_port);
                let dst = node.input_port_type(port);
                if src == PortType::Scalar && dst == PortType::Vector {
                    var = format!("vec3({var})");
                }
                input_vars.push(var);
            } else {
                let default = gnode.default_input_value(port);
                input_vars.push(default.to_glsl(node.input_port_type(port)));
            }
        }

        let mut output_vars = Vec::with_capacity(node.output_port_count());
        for port in 0..node.output_port_count() {
            let var = output_var(id, port);
            code.push_str(&format!(
                "\t{} {};\n",
                node.output_port_type(port).glsl_name(),
                var
            ));
            output_vars.push(var);
        }

        let fragment = if self.for_preview {
            node.generate_code_for_preview(self.mode, self.stage, id, &input_vars, &output_vars)
        } else {
            node.generate_code(self.mode, self.stage, id, &input_vars, &output_vars)
        };
        code.push_str(&fragment);

        let global = node.generate_global(self.mode, self.stage, id);
        if !global.is_empty() && !self.globals.contains(&global) {
            self.globals.push(global);
        }
        for param in node.default_texture_parameters(self.stage, id) {
            if !self.params.iter().any(|existing| existing.name == param.name) {
                self.params.push(param);
            }
        }
        if let Some(message) = node.get_warning(self.mode, self.stage) {
            self.warnings.push(ShaderWarning {
                stage: self.stage,
                node: id,
                message,
            });
        }

        self.in_flight.remove(&id);
        self.processed.insert(id);
        Ok(())
    }
}

/// Generate the full shader: one function per stage, rooted at each stage's
/// output node, preceded by the deduplicated global section.
pub(crate) fn generate(
    mode: ShaderMode,
    stages: &[StageGraph; 3],
) -> Result<GeneratedShader, GraphError> {
    debug!("regenerating shader source");
    let mut globals = Vec::new();
    let mut params = Vec::new();
    let mut warnings = Vec::new();
    let mut bodies = Vec::with_capacity(Stage::ALL.len());

    for stage in Stage::ALL {
        let graph = &stages[stage.index()];
        let mut emitter = Emitter::new(
            mode,
            stage,
            graph,
            &mut globals,
            &mut params,
            &mut warnings,
            false,
        );
        let mut body = String::new();
        emitter.write_node(&mut body, NodeId::OUTPUT)?;
        bodies.push(body);
    }

    let mut source = format!("shader_type {};\n", mode.keyword());
    for global in &globals {
        source.push_str(global);
    }
    for (stage, body) in Stage::ALL.iter().zip(bodies) {
        source.push_str(&format!("\nvoid {}() {{\n", stage.function_name()));
        source.push_str(&body);
        source.push_str("}\n");
    }

    Ok(GeneratedShader {
        source,
        default_texture_params: params,
        warnings,
    })
}

/// Generate a preview shader isolating one node output: the subgraph rooted
/// at `node` wrapped in a minimal fragment program writing the value to
/// `COLOR`.
pub(crate) fn generate_preview(
    mode: ShaderMode,
    graph: &StageGraph,
    stage: Stage,
    node: NodeId,
    port: Option<usize>,
) -> Result<GeneratedShader, GraphError> {
    let gnode = graph.nodes.get(&node).ok_or(GraphError::NodeNotFound(node))?;
    let port = port
        .or_else(|| gnode.preview_output_port())
        .unwrap_or(0);
    if port >= gnode.node().output_port_count() {
        return Err(GraphError::PortNotFound { node, port });
    }
    let port_type = gnode.node().output_port_type(port);

    let mut globals = Vec::new();
    let mut params = Vec::new();
    let mut warnings = Vec::new();
    let mut body = String::new();
    let mut emitter = Emitter::new(
        mode,
        stage,
        graph,
        &mut globals,
        &mut params,
        &mut warnings,
        true,
    );
    emitter.write_node(&mut body, node)?;

    let var = output_var(node, port);
    let mut source = format!("shader_type {};\n", mode.keyword());
    for global in &globals {
        source.push_str(global);
    }
    source.push_str("\nvoid fragment() {\n");
    source.push_str(&body);
    match port_type {
        PortType::Scalar => source.push_str(&format!("\tCOLOR = vec4(vec3({var}), 1.0);\n")),
        PortType::Vector => source.push_str(&format!("\tCOLOR = vec4({var}, 1.0);\n")),
        PortType::Transform => source.push_str(&format!("\tCOLOR = vec4({var}[3].xyz, 1.0);\n")),
    }
    source.push_str("}\n");

    Ok(GeneratedShader {
        source,
        default_texture_params: params,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ShaderGraph;
    use crate::node::ShaderNode;
    use crate::nodes::InputNode;
    use crate::port::Value;
    use std::any::Any;

    struct TestScalar(f32);

    impl ShaderNode for TestScalar {
        fn kind(&self) -> &'static str {
            "test_scalar"
        }
        fn caption(&self) -> &'static str {
            "TestScalar"
        }
        fn input_port_count(&self) -> usize {
            0
        }
        fn input_port_type(&self, _port: usize) -> PortType {
            PortType::Scalar
        }
        fn input_port_name(&self, _port: usize) -> &'static str {
            ""
        }
        fn output_port_count(&self) -> usize {
            1
        }
        fn output_port_type(&self, _port: usize) -> PortType {
            PortType::Scalar
        }
        fn output_port_name(&self, _port: usize) -> &'static str {
            "value"
        }
        fn generate_code(
            &self,
            _mode: ShaderMode,
            _stage: Stage,
            _id: NodeId,
            _input_vars: &[String],
            output_vars: &[String],
        ) -> String {
            format!(
                "\t{} = {};\n",
                output_vars[0],
                Value::Scalar(self.0).to_glsl(PortType::Scalar)
            )
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct TestSum;

    impl ShaderNode for TestSum {
        fn kind(&self) -> &'static str {
            "test_sum"
        }
        fn caption(&self) -> &'static str {
            "TestSum"
        }
        fn input_port_count(&self) -> usize {
            2
        }
        fn input_port_type(&self, _port: usize) -> PortType {
            PortType::Scalar
        }
        fn input_port_name(&self, port: usize) -> &'static str {
            if port == 0 {
                "a"
            } else {
                "b"
            }
        }
        fn input_port_default_value(&self, _port: usize) -> Value {
            Value::Scalar(0.0)
        }
        fn output_port_count(&self) -> usize {
            1
        }
        fn output_port_type(&self, _port: usize) -> PortType {
            PortType::Scalar
        }
        fn output_port_name(&self, _port: usize) -> &'static str {
            "sum"
        }
        fn generate_code(
            &self,
            _mode: ShaderMode,
            _stage: Stage,
            _id: NodeId,
            input_vars: &[String],
            output_vars: &[String],
        ) -> String {
            format!(
                "\t{} = {} + {};\n",
                output_vars[0], input_vars[0], input_vars[1]
            )
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_empty_graph_skeleton() {
        let mut graph = ShaderGraph::new();
        let shader = graph.generate_shader().unwrap();
        assert!(shader.source.starts_with("shader_type spatial;\n"));
        assert!(shader.source.contains("\nvoid vertex() {\n"));
        assert!(shader.source.contains("\nvoid fragment() {\n"));
        assert!(shader.source.contains("\nvoid light() {\n"));
        assert!(shader.default_texture_params.is_empty());
        assert!(shader.warnings.is_empty());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut graph = ShaderGraph::new();
        graph
            .add_node(Stage::Fragment, Box::new(TestScalar(0.25)), [0.0, 0.0], NodeId(2))
            .unwrap();
        graph
            .add_node(Stage::Fragment, Box::new(TestSum), [0.0, 0.0], NodeId(3))
            .unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(2), 0, NodeId(3), 0).unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(3), 0, NodeId::OUTPUT, 1).unwrap();

        let first = graph.generate_shader().unwrap().clone();
        // Force a fresh pass over the identical structure.
        graph.get_node_mut(Stage::Fragment, NodeId(2)).unwrap();
        assert!(graph.is_dirty());
        let second = graph.generate_shader().unwrap().clone();
        assert_eq!(first.source, second.source);
        assert_eq!(first.default_texture_params, second.default_texture_params);
    }

    #[test]
    fn test_cached_until_dirty() {
        let mut graph = ShaderGraph::new();
        graph.generate_shader().unwrap();
        assert!(!graph.is_dirty());
        graph
            .add_node(Stage::Fragment, Box::new(TestScalar(1.0)), [0.0, 0.0], NodeId(2))
            .unwrap();
        assert!(graph.is_dirty());
        graph.generate_shader().unwrap();
        assert!(!graph.is_dirty());
    }

    #[test]
    fn test_diamond_emits_shared_producer_once() {
        let mut graph = ShaderGraph::new();
        graph
            .add_node(Stage::Fragment, Box::new(TestScalar(1.0)), [0.0, 0.0], NodeId(2))
            .unwrap();
        graph
            .add_node(Stage::Fragment, Box::new(TestSum), [0.0, 0.0], NodeId(3))
            .unwrap();
        graph
            .add_node(Stage::Fragment, Box::new(TestSum), [0.0, 0.0], NodeId(4))
            .unwrap();
        graph
            .add_node(Stage::Fragment, Box::new(TestSum), [0.0, 0.0], NodeId(5))
            .unwrap();
        // 2 feeds 3 and 4; both feed 5.
        graph.connect_nodes(Stage::Fragment, NodeId(2), 0, NodeId(3), 0).unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(2), 0, NodeId(4), 0).unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(3), 0, NodeId(5), 0).unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(4), 0, NodeId(5), 1).unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(5), 0, NodeId::OUTPUT, 1).unwrap();

        let shader = graph.generate_shader().unwrap();
        let declarations = shader.source.matches("\tfloat n2_p0;\n").count();
        assert_eq!(declarations, 1);
        let assignments = shader.source.matches("\tn2_p0 = 1.000000;\n").count();
        assert_eq!(assignments, 1);
    }

    #[test]
    fn test_cycle_detected_defensively() {
        // Bypass connect-time validation to exercise the generator's guard.
        let mut graph = ShaderGraph::new();
        graph
            .add_node(Stage::Fragment, Box::new(TestSum), [0.0, 0.0], NodeId(2))
            .unwrap();
        graph
            .add_node(Stage::Fragment, Box::new(TestSum), [0.0, 0.0], NodeId(3))
            .unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(3), 0, NodeId::OUTPUT, 1).unwrap();
        let sg = &mut graph.stages[Stage::Fragment.index()];
        sg.connections.push(Connection::new(NodeId(2), 0, NodeId(3), 0));
        sg.connections.push(Connection::new(NodeId(3), 0, NodeId(2), 0));

        assert!(matches!(
            graph.generate_shader(),
            Err(GraphError::CycleDetected(_))
        ));
    }

    #[test]
    fn test_defaults_render_as_literals() {
        let mut graph = ShaderGraph::new();
        graph
            .add_node(Stage::Fragment, Box::new(TestSum), [0.0, 0.0], NodeId(2))
            .unwrap();
        graph
            .set_default_input_value(Stage::Fragment, NodeId(2), 1, Value::Scalar(0.5))
            .unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(2), 0, NodeId::OUTPUT, 1).unwrap();

        let shader = graph.generate_shader().unwrap();
        assert!(shader.source.contains("\tn2_p0 = 0.000000 + 0.500000;\n"));
    }

    #[test]
    fn test_scalar_output_widens_into_vector_input() {
        let mut graph = ShaderGraph::new();
        graph
            .add_node(Stage::Fragment, Box::new(TestScalar(1.0)), [0.0, 0.0], NodeId(2))
            .unwrap();
        // Fragment output port 0 ("albedo") is a vector input.
        graph.connect_nodes(Stage::Fragment, NodeId(2), 0, NodeId::OUTPUT, 0).unwrap();
        let shader = graph.generate_shader().unwrap();
        assert!(shader.source.contains("\tALBEDO = vec3(n2_p0);\n"));
    }

    #[test]
    fn test_node_warnings_are_collected() {
        let mut graph = ShaderGraph::new();
        graph
            .add_node(Stage::Fragment, Box::new(InputNode::new("bogus")), [0.0, 0.0], NodeId(2))
            .unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(2), 0, NodeId::OUTPUT, 1).unwrap();

        let shader = graph.generate_shader().unwrap();
        assert!(shader.source.contains("\tn2_p0 = 0.0;\n"));
        assert_eq!(shader.warnings.len(), 1);
        assert_eq!(shader.warnings[0].node, NodeId(2));
        assert_eq!(shader.warnings[0].stage, Stage::Fragment);
        assert!(shader.warnings[0].message.contains("bogus"));
    }

    #[test]
    fn test_preview_matches_full_expression() {
        let mut graph = ShaderGraph::new();
        graph
            .add_node(Stage::Fragment, Box::new(TestScalar(0.25)), [0.0, 0.0], NodeId(2))
            .unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(2), 0, NodeId::OUTPUT, 1).unwrap();

        let expression = "\tn2_p0 = 0.250000;\n";
        let full = graph.generate_shader().unwrap().clone();
        assert!(full.source.contains(expression));

        let preview = graph
            .generate_preview_shader(Stage::Fragment, NodeId(2), Some(0))
            .unwrap();
        assert!(preview.source.contains(expression));
        assert!(preview.source.contains("\tCOLOR = vec4(vec3(n2_p0), 1.0);\n"));
        assert!(preview.source.contains("\nvoid fragment() {\n"));
    }

    #[test]
    fn test_preview_defaults_to_preview_port() {
        let mut graph = ShaderGraph::new();
        graph
            .add_node(Stage::Fragment, Box::new(TestScalar(0.5)), [0.0, 0.0], NodeId(2))
            .unwrap();
        graph
            .set_preview_output_port(Stage::Fragment, NodeId(2), Some(0))
            .unwrap();
        let preview = graph
            .generate_preview_shader(Stage::Fragment, NodeId(2), None)
            .unwrap();
        assert!(preview.source.contains("\tCOLOR = vec4(vec3(n2_p0), 1.0);\n"));
    }

    #[test]
    fn test_preview_rejects_bad_port() {
        let mut graph = ShaderGraph::new();
        graph
            .add_node(Stage::Fragment, Box::new(TestScalar(0.5)), [0.0, 0.0], NodeId(2))
            .unwrap();
        assert_eq!(
            graph.generate_preview_shader(Stage::Fragment, NodeId(2), Some(3)),
            Err(GraphError::PortNotFound { node: NodeId(2), port: 3 })
        );
        assert!(matches!(
            graph.generate_preview_shader(Stage::Fragment, NodeId(9), Some(0)),
            Err(GraphError::NodeNotFound(_))
        ));
    }
}
