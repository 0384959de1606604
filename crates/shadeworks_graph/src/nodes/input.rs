// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input node: exposes one stage built-in selected by name.

use crate::graph::{ShaderMode, Stage};
use crate::node::{NodeId, ShaderNode};
use crate::port::PortType;
use std::any::Any;

struct BuiltinInput {
    stage: Stage,
    name: &'static str,
    port_type: PortType,
    code: &'static str,
}

/// Built-ins addressable per stage, with the expression that reads them.
const INPUT_PORTS: &[BuiltinInput] = &[
    // Vertex
    BuiltinInput { stage: Stage::Vertex, name: "vertex", port_type: PortType::Vector, code: "VERTEX" },
    BuiltinInput { stage: Stage::Vertex, name: "normal", port_type: PortType::Vector, code: "NORMAL" },
    BuiltinInput { stage: Stage::Vertex, name: "uv", port_type: PortType::Vector, code: "vec3(UV, 0.0)" },
    BuiltinInput { stage: Stage::Vertex, name: "color", port_type: PortType::Vector, code: "COLOR.rgb" },
    BuiltinInput { stage: Stage::Vertex, name: "time", port_type: PortType::Scalar, code: "TIME" },
    BuiltinInput { stage: Stage::Vertex, name: "world", port_type: PortType::Transform, code: "WORLD_MATRIX" },
    BuiltinInput { stage: Stage::Vertex, name: "projection", port_type: PortType::Transform, code: "PROJECTION_MATRIX" },
    // Fragment
    BuiltinInput { stage: Stage::Fragment, name: "vertex", port_type: PortType::Vector, code: "VERTEX" },
    BuiltinInput { stage: Stage::Fragment, name: "normal", port_type: PortType::Vector, code: "NORMAL" },
    BuiltinInput { stage: Stage::Fragment, name: "uv", port_type: PortType::Vector, code: "vec3(UV, 0.0)" },
    BuiltinInput { stage: Stage::Fragment, name: "color", port_type: PortType::Vector, code: "COLOR.rgb" },
    BuiltinInput { stage: Stage::Fragment, name: "screen_uv", port_type: PortType::Vector, code: "vec3(SCREEN_UV, 0.0)" },
    BuiltinInput { stage: Stage::Fragment, name: "view", port_type: PortType::Vector, code: "VIEW" },
    BuiltinInput { stage: Stage::Fragment, name: "time", port_type: PortType::Scalar, code: "TIME" },
    BuiltinInput { stage: Stage::Fragment, name: "world", port_type: PortType::Transform, code: "WORLD_MATRIX" },
    // Light
    BuiltinInput { stage: Stage::Light, name: "normal", port_type: PortType::Vector, code: "NORMAL" },
    BuiltinInput { stage: Stage::Light, name: "view", port_type: PortType::Vector, code: "VIEW" },
    BuiltinInput { stage: Stage::Light, name: "light", port_type: PortType::Vector, code: "LIGHT" },
    BuiltinInput { stage: Stage::Light, name: "light_color", port_type: PortType::Vector, code: "LIGHT_COLOR" },
    BuiltinInput { stage: Stage::Light, name: "attenuation", port_type: PortType::Vector, code: "ATTENUATION" },
    BuiltinInput { stage: Stage::Light, name: "albedo", port_type: PortType::Vector, code: "ALBEDO" },
    BuiltinInput { stage: Stage::Light, name: "time", port_type: PortType::Scalar, code: "TIME" },
];

/// Substitutes used while generating preview programs, where most stage
/// built-ins do not exist. Falls back to `INPUT_PORTS` when a name has no
/// row here.
const PREVIEW_PORTS: &[BuiltinInput] = &[
    BuiltinInput { stage: Stage::Vertex, name: "vertex", port_type: PortType::Vector, code: "vec3(0.0)" },
    BuiltinInput { stage: Stage::Vertex, name: "normal", port_type: PortType::Vector, code: "vec3(0.0, 0.0, 1.0)" },
    BuiltinInput { stage: Stage::Vertex, name: "world", port_type: PortType::Transform, code: "mat4(1.0)" },
    BuiltinInput { stage: Stage::Vertex, name: "projection", port_type: PortType::Transform, code: "mat4(1.0)" },
    BuiltinInput { stage: Stage::Fragment, name: "view", port_type: PortType::Vector, code: "vec3(0.0, 0.0, 1.0)" },
    BuiltinInput { stage: Stage::Fragment, name: "world", port_type: PortType::Transform, code: "mat4(1.0)" },
    BuiltinInput { stage: Stage::Light, name: "normal", port_type: PortType::Vector, code: "vec3(0.0, 0.0, 1.0)" },
    BuiltinInput { stage: Stage::Light, name: "view", port_type: PortType::Vector, code: "vec3(0.0, 0.0, 1.0)" },
    BuiltinInput { stage: Stage::Light, name: "light", port_type: PortType::Vector, code: "vec3(1.0)" },
    BuiltinInput { stage: Stage::Light, name: "light_color", port_type: PortType::Vector, code: "vec3(1.0)" },
    BuiltinInput { stage: Stage::Light, name: "attenuation", port_type: PortType::Vector, code: "vec3(1.0)" },
    BuiltinInput { stage: Stage::Light, name: "albedo", port_type: PortType::Vector, code: "vec3(1.0)" },
];

/// Reads one stage built-in, selected by [`input_name`](InputNode::input_name).
///
/// The node is bound to its stage when added to the graph; an unknown name
/// degrades to a zero scalar and a warning so the editor keeps rendering.
pub struct InputNode {
    stage: Stage,
    input_name: String,
}

impl InputNode {
    /// Create an input reading the named built-in.
    pub fn new(input_name: impl Into<String>) -> Self {
        Self {
            stage: Stage::Fragment,
            input_name: input_name.into(),
        }
    }

    /// Currently selected built-in name.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Select a different built-in.
    pub fn set_input_name(&mut self, name: impl Into<String>) {
        self.input_name = name.into();
    }

    /// Built-in names usable in the given stage.
    pub fn available_inputs(stage: Stage) -> Vec<&'static str> {
        INPUT_PORTS
            .iter()
            .filter(|row| row.stage == stage)
            .map(|row| row.name)
            .collect()
    }

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    fn row(&self) -> Option<&'static BuiltinInput> {
        INPUT_PORTS
            .iter()
            .find(|row| row.stage == self.stage && row.name == self.input_name)
    }

    fn preview_row(&self) -> Option<&'static BuiltinInput> {
        PREVIEW_PORTS
            .iter()
            .find(|row| row.stage == self.stage && row.name == self.input_name)
    }
}

impl Default for InputNode {
    fn default() -> Self {
        Self::new("")
    }
}

impl ShaderNode for InputNode {
    fn kind(&self) -> &'static str {
        "input"
    }

    fn caption(&self) -> &'static str {
        "Input"
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
        self.row().map_or(PortType::Scalar, |row| row.port_type)
    }

    fn output_port_name(&self, _port: usize) -> &'static str {
        ""
    }

    fn editable_properties(&self) -> Vec<&'static str> {
        vec!["input_name"]
    }

    fn get_warning(&self, _mode: ShaderMode, stage: Stage) -> Option<String> {
        if self.row().is_some() {
            None
        } else {
            Some(format!(
                "'{}' is not a valid input for the {} stage",
                self.input_name,
                stage.function_name()
            ))
        }
    }

    fn generate_code(
        &self,
        _mode: ShaderMode,
        _stage: Stage,
        _id: NodeId,
        _input_vars: &[String],
        output_vars: &[String],
    ) -> String {
        match self.row() {
            Some(row) => format!("\t{} = {};\n", output_vars[0], row.code),
            None => format!("\t{} = 0.0;\n", output_vars[0]),
        }
    }

    fn generate_code_for_preview(
        &self,
        mode: ShaderMode,
        stage: Stage,
        id: NodeId,
        input_vars: &[String],
        output_vars: &[String],
    ) -> String {
        match self.preview_row() {
            Some(row) => format!("\t{} = {};\n", output_vars[0], row.code),
            None => self.generate_code(mode, stage, id, input_vars, output_vars),
        }
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
    fn test_port_type_follows_selection() {
        let mut input = InputNode::new("time");
        assert_eq!(input.output_port_type(0), PortType::Scalar);
        input.set_input_name("normal");
        assert_eq!(input.output_port_type(0), PortType::Vector);
        input.set_stage(Stage::Vertex);
        input.set_input_name("world");
        assert_eq!(input.output_port_type(0), PortType::Transform);
    }

    #[test]
    fn test_unknown_name_degrades() {
        let input = InputNode::new("bogus");
        let warning = input.get_warning(ShaderMode::Spatial, Stage::Fragment).unwrap();
        assert!(warning.contains("bogus"));
        let code = input.generate_code(
            ShaderMode::Spatial,
            Stage::Fragment,
            NodeId(2),
            &[],
            &[String::from("n2_p0")],
        );
        assert_eq!(code, "\tn2_p0 = 0.0;\n");
    }

    #[test]
    fn test_preview_substitutes_builtin() {
        let mut input = InputNode::new("light_color");
        input.set_stage(Stage::Light);
        let out = [String::from("n3_p0")];
        let full = input.generate_code(ShaderMode::Spatial, Stage::Light, NodeId(3), &[], &out);
        let preview =
            input.generate_code_for_preview(ShaderMode::Spatial, Stage::Light, NodeId(3), &[], &out);
        assert_eq!(full, "\tn3_p0 = LIGHT_COLOR;\n");
        assert_eq!(preview, "\tn3_p0 = vec3(1.0);\n");
    }

    #[test]
    fn test_available_inputs_per_stage() {
        let names = InputNode::available_inputs(Stage::Light);
        assert!(names.contains(&"light"));
        assert!(!names.contains(&"uv"));
    }
}
