// SPDX-License-Identifier: MIT OR Apache-2.0
//! Constant nodes: fixed values baked into the generated source.

use shadeworks_graph::{NodeId, PortType, ShaderMode, ShaderNode, Stage, Value};
use std::any::Any;

/// A fixed scalar value.
#[derive(Debug, Default)]
pub struct ScalarConstant {
    /// Emitted value.
    pub value: f32,
}

impl ScalarConstant {
    /// Create a constant with the given value.
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl ShaderNode for ScalarConstant {
    fn kind(&self) -> &'static str {
        "scalar_constant"
    }

    fn caption(&self) -> &'static str {
        "Scalar"
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
        ""
    }

    fn editable_properties(&self) -> Vec<&'static str> {
        vec!["value"]
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
            Value::Scalar(self.value).to_glsl(PortType::Scalar)
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A fixed vector value.
#[derive(Debug, Default)]
pub struct VectorConstant {
    /// Emitted value.
    pub value: [f32; 3],
}

impl VectorConstant {
    /// Create a constant with the given value.
    pub fn new(value: [f32; 3]) -> Self {
        Self { value }
    }
}

impl ShaderNode for VectorConstant {
    fn kind(&self) -> &'static str {
        "vector_constant"
    }

    fn caption(&self) -> &'static str {
        "Vector"
    }

    fn input_port_count(&self) -> usize {
        0
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn input_port_name(&self, _port: usize) -> &'static str {
        ""
    }

    fn output_port_count(&self) -> usize {
        1
    }

    fn output_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn output_port_name(&self, _port: usize) -> &'static str {
        ""
    }

    fn editable_properties(&self) -> Vec<&'static str> {
        vec!["value"]
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
            Value::Vector(self.value).to_glsl(PortType::Vector)
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A fixed transform value.
#[derive(Debug)]
pub struct TransformConstant {
    /// Emitted value.
    pub value: [[f32; 4]; 4],
}

impl TransformConstant {
    /// Create a constant with the given value.
    pub fn new(value: [[f32; 4]; 4]) -> Self {
        Self { value }
    }
}

impl Default for TransformConstant {
    fn default() -> Self {
        Self {
            value: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

impl ShaderNode for TransformConstant {
    fn kind(&self) -> &'static str {
        "transform_constant"
    }

    fn caption(&self) -> &'static str {
        "Transform"
    }

    fn input_port_count(&self) -> usize {
        0
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Transform
    }

    fn input_port_name(&self, _port: usize) -> &'static str {
        ""
    }

    fn output_port_count(&self) -> usize {
        1
    }

    fn output_port_type(&self, _port: usize) -> PortType {
        PortType::Transform
    }

    fn output_port_name(&self, _port: usize) -> &'static str {
        ""
    }

    fn editable_properties(&self) -> Vec<&'static str> {
        vec!["value"]
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
            Value::Transform(self.value).to_glsl(PortType::Transform)
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
