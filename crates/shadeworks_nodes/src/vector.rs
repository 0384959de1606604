// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vector composition, decomposition and transform application.

use serde::{Deserialize, Serialize};
use shadeworks_graph::{NodeId, PortType, ShaderMode, ShaderNode, Stage, Value};
use std::any::Any;

/// Builds a vector from three scalar components.
#[derive(Debug, Default)]
pub struct VectorCompose;

impl ShaderNode for VectorCompose {
    fn kind(&self) -> &'static str {
        "vector_compose"
    }

    fn caption(&self) -> &'static str {
        "VectorCompose"
    }

    fn input_port_count(&self) -> usize {
        3
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Scalar
    }

    fn input_port_name(&self, port: usize) -> &'static str {
        match port {
            0 => "x",
            1 => "y",
            _ => "z",
        }
    }

    fn input_port_default_value(&self, _port: usize) -> Value {
        Value::Scalar(0.0)
    }

    fn output_port_count(&self) -> usize {
        1
    }

    fn output_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn output_port_name(&self, _port: usize) -> &'static str {
        "vec"
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
            "\t{} = vec3({}, {}, {});\n",
            output_vars[0], input_vars[0], input_vars[1], input_vars[2]
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Splits a vector into three scalar components.
#[derive(Debug, Default)]
pub struct VectorDecompose;

impl ShaderNode for VectorDecompose {
    fn kind(&self) -> &'static str {
        "vector_decompose"
    }

    fn caption(&self) -> &'static str {
        "VectorDecompose"
    }

    fn input_port_count(&self) -> usize {
        1
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn input_port_name(&self, _port: usize) -> &'static str {
        "vec"
    }

    fn input_port_default_value(&self, _port: usize) -> Value {
        Value::Vector([0.0, 0.0, 0.0])
    }

    fn output_port_count(&self) -> usize {
        3
    }

    fn output_port_type(&self, _port: usize) -> PortType {
        PortType::Scalar
    }

    fn output_port_name(&self, port: usize) -> &'static str {
        match port {
            0 => "x",
            1 => "y",
            _ => "z",
        }
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
            "\t{} = {}.x;\n\t{} = {}.y;\n\t{} = {}.z;\n",
            output_vars[0],
            input_vars[0],
            output_vars[1],
            input_vars[0],
            output_vars[2],
            input_vars[0]
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Operand order for [`TransformVecMult`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformMultOrder {
    /// `transform * vector`
    #[default]
    TransformVector,
    /// `vector * transform`
    VectorTransform,
}

/// Applies a transform to a vector (as a point, w = 1).
#[derive(Debug, Default)]
pub struct TransformVecMult {
    /// Operand order.
    pub order: TransformMultOrder,
}

impl TransformVecMult {
    /// Create a multiply node with the given operand order.
    pub fn new(order: TransformMultOrder) -> Self {
        Self { order }
    }
}

impl ShaderNode for TransformVecMult {
    fn kind(&self) -> &'static str {
        "transform_vec_mult"
    }

    fn caption(&self) -> &'static str {
        "TransformVectorMult"
    }

    fn input_port_count(&self) -> usize {
        2
    }

    fn input_port_type(&self, port: usize) -> PortType {
        if port == 0 {
            PortType::Transform
        } else {
            PortType::Vector
        }
    }

    fn input_port_name(&self, port: usize) -> &'static str {
        if port == 0 {
            "transform"
        } else {
            "vec"
        }
    }

    fn input_port_default_value(&self, port: usize) -> Value {
        if port == 0 {
            Value::identity_transform()
        } else {
            Value::Vector([0.0, 0.0, 0.0])
        }
    }

    fn output_port_count(&self) -> usize {
        1
    }

    fn output_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn output_port_name(&self, _port: usize) -> &'static str {
        "vec"
    }

    fn editable_properties(&self) -> Vec<&'static str> {
        vec!["order"]
    }

    fn generate_code(
        &self,
        _mode: ShaderMode,
        _stage: Stage,
        _id: NodeId,
        input_vars: &[String],
        output_vars: &[String],
    ) -> String {
        match self.order {
            TransformMultOrder::TransformVector => format!(
                "\t{} = ({} * vec4({}, 1.0)).xyz;\n",
                output_vars[0], input_vars[0], input_vars[1]
            ),
            TransformMultOrder::VectorTransform => format!(
                "\t{} = (vec4({}, 1.0) * {}).xyz;\n",
                output_vars[0], input_vars[1], input_vars[0]
            ),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
