// SPDX-License-Identifier: MIT OR Apache-2.0
//! Output node: writes connected inputs to the stage's built-in results.

use crate::graph::{ShaderMode, Stage};
use crate::node::{NodeId, ShaderNode};
use crate::port::PortType;
use std::any::Any;

struct StageOutput {
    stage: Stage,
    name: &'static str,
    port_type: PortType,
    target: &'static str,
    swizzle: &'static str,
}

/// Results each stage can write, and the built-in receiving them.
const OUTPUT_PORTS: &[StageOutput] = &[
    // Vertex
    StageOutput { stage: Stage::Vertex, name: "vertex", port_type: PortType::Vector, target: "VERTEX", swizzle: "" },
    StageOutput { stage: Stage::Vertex, name: "normal", port_type: PortType::Vector, target: "NORMAL", swizzle: "" },
    StageOutput { stage: Stage::Vertex, name: "uv", port_type: PortType::Vector, target: "UV", swizzle: "xy" },
    // Fragment
    StageOutput { stage: Stage::Fragment, name: "albedo", port_type: PortType::Vector, target: "ALBEDO", swizzle: "" },
    StageOutput { stage: Stage::Fragment, name: "alpha", port_type: PortType::Scalar, target: "ALPHA", swizzle: "" },
    StageOutput { stage: Stage::Fragment, name: "metallic", port_type: PortType::Scalar, target: "METALLIC", swizzle: "" },
    StageOutput { stage: Stage::Fragment, name: "roughness", port_type: PortType::Scalar, target: "ROUGHNESS", swizzle: "" },
    StageOutput { stage: Stage::Fragment, name: "normal", port_type: PortType::Vector, target: "NORMAL", swizzle: "" },
    StageOutput { stage: Stage::Fragment, name: "emission", port_type: PortType::Vector, target: "EMISSION", swizzle: "" },
    // Light
    StageOutput { stage: Stage::Light, name: "diffuse", port_type: PortType::Vector, target: "DIFFUSE_LIGHT", swizzle: "" },
    StageOutput { stage: Stage::Light, name: "specular", port_type: PortType::Vector, target: "SPECULAR_LIGHT", swizzle: "" },
    StageOutput { stage: Stage::Light, name: "alpha", port_type: PortType::Scalar, target: "ALPHA", swizzle: "" },
];

/// The stage's sink node. Occupies id 0 in every stage graph and cannot be
/// removed; unconnected inputs are simply not written.
pub struct OutputNode {
    stage: Stage,
}

impl OutputNode {
    /// Create the output node for a stage.
    pub fn new(stage: Stage) -> Self {
        Self { stage }
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    fn rows(&self) -> impl Iterator<Item = &'static StageOutput> {
        let stage = self.stage;
        OUTPUT_PORTS.iter().filter(move |row| row.stage == stage)
    }

    fn row(&self, port: usize) -> Option<&'static StageOutput> {
        self.rows().nth(port)
    }
}

impl ShaderNode for OutputNode {
    fn kind(&self) -> &'static str {
        "output"
    }

    fn caption(&self) -> &'static str {
        "Output"
    }

    fn input_port_count(&self) -> usize {
        self.rows().count()
    }

    fn input_port_type(&self, port: usize) -> PortType {
        self.row(port).map_or(PortType::Scalar, |row| row.port_type)
    }

    fn input_port_name(&self, port: usize) -> &'static str {
        self.row(port).map_or("", |row| row.name)
    }

    fn is_port_separator(&self, port: usize) -> bool {
        // Group surface parameters away from the color ports.
        self.stage == Stage::Fragment && port == 2
    }

    fn output_port_count(&self) -> usize {
        0
    }

    fn output_port_type(&self, _port: usize) -> PortType {
        PortType::Scalar
    }

    fn output_port_name(&self, _port: usize) -> &'static str {
        ""
    }

    fn generate_code(
        &self,
        _mode: ShaderMode,
        _stage: Stage,
        _id: NodeId,
        input_vars: &[String],
        _output_vars: &[String],
    ) -> String {
        let mut code = String::new();
        for (port, row) in self.rows().enumerate() {
            let Some(var) = input_vars.get(port) else {
                break;
            };
            if var.is_empty() {
                continue;
            }
            if row.swizzle.is_empty() {
                code.push_str(&format!("\t{} = {};\n", row.target, var));
            } else {
                code.push_str(&format!("\t{} = {}.{};\n", row.target, var, row.swizzle));
            }
        }
        code
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_ports() {
        let output = OutputNode::new(Stage::Fragment);
        assert_eq!(output.input_port_count(), 6);
        assert_eq!(output.input_port_name(0), "albedo");
        assert_eq!(output.input_port_type(0), PortType::Vector);
        assert_eq!(output.input_port_name(1), "alpha");
        assert_eq!(output.input_port_type(1), PortType::Scalar);
        assert_eq!(output.output_port_count(), 0);
    }

    #[test]
    fn test_unconnected_inputs_are_skipped() {
        let output = OutputNode::new(Stage::Fragment);
        let inputs = vec![
            String::from("n2_p0"),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ];
        let code = output.generate_code(
            ShaderMode::Spatial,
            Stage::Fragment,
            NodeId::OUTPUT,
            &inputs,
            &[],
        );
        assert_eq!(code, "\tALBEDO = n2_p0;\n");
    }

    #[test]
    fn test_vertex_uv_swizzles() {
        let output = OutputNode::new(Stage::Vertex);
        let inputs = vec![String::new(), String::new(), String::from("n4_p0")];
        let code = output.generate_code(
            ShaderMode::Spatial,
            Stage::Vertex,
            NodeId::OUTPUT,
            &inputs,
            &[],
        );
        assert_eq!(code, "\tUV = n4_p0.xy;\n");
    }
}
