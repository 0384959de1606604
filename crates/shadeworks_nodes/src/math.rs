// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scalar and vector arithmetic nodes.

use serde::{Deserialize, Serialize};
use shadeworks_graph::{NodeId, PortType, ShaderMode, ShaderNode, Stage, Value};
use std::any::Any;

/// Binary operation applied by [`ScalarOp`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarOperator {
    /// `a + b`
    #[default]
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
    /// `mod(a, b)`
    Mod,
    /// `pow(a, b)`
    Pow,
    /// `max(a, b)`
    Max,
    /// `min(a, b)`
    Min,
    /// `atan(a, b)`
    Atan2,
}

impl ScalarOperator {
    fn expr(self, a: &str, b: &str) -> String {
        match self {
            Self::Add => format!("{a} + {b}"),
            Self::Sub => format!("{a} - {b}"),
            Self::Mul => format!("{a} * {b}"),
            Self::Div => format!("{a} / {b}"),
            Self::Mod => format!("mod({a}, {b})"),
            Self::Pow => format!("pow({a}, {b})"),
            Self::Max => format!("max({a}, {b})"),
            Self::Min => format!("min({a}, {b})"),
            Self::Atan2 => format!("atan({a}, {b})"),
        }
    }
}

/// Binary operation over two scalars.
#[derive(Debug, Default)]
pub struct ScalarOp {
    /// Selected operation.
    pub op: ScalarOperator,
}

impl ScalarOp {
    /// Create an operator node.
    pub fn new(op: ScalarOperator) -> Self {
        Self { op }
    }
}

impl ShaderNode for ScalarOp {
    fn kind(&self) -> &'static str {
        "scalar_op"
    }

    fn caption(&self) -> &'static str {
        "ScalarOp"
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
        "op"
    }

    fn editable_properties(&self) -> Vec<&'static str> {
        vec!["op"]
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
            "\t{} = {};\n",
            output_vars[0],
            self.op.expr(&input_vars[0], &input_vars[1])
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Binary operation applied by [`VectorOp`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VectorOperator {
    /// `a + b`
    #[default]
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
    /// `cross(a, b)`
    Cross,
    /// `max(a, b)`
    Max,
    /// `min(a, b)`
    Min,
}

impl VectorOperator {
    fn expr(self, a: &str, b: &str) -> String {
        match self {
            Self::Add => format!("{a} + {b}"),
            Self::Sub => format!("{a} - {b}"),
            Self::Mul => format!("{a} * {b}"),
            Self::Div => format!("{a} / {b}"),
            Self::Cross => format!("cross({a}, {b})"),
            Self::Max => format!("max({a}, {b})"),
            Self::Min => format!("min({a}, {b})"),
        }
    }
}

/// Binary operation over two vectors.
#[derive(Debug, Default)]
pub struct VectorOp {
    /// Selected operation.
    pub op: VectorOperator,
}

impl VectorOp {
    /// Create an operator node.
    pub fn new(op: VectorOperator) -> Self {
        Self { op }
    }
}

impl ShaderNode for VectorOp {
    fn kind(&self) -> &'static str {
        "vector_op"
    }

    fn caption(&self) -> &'static str {
        "VectorOp"
    }

    fn input_port_count(&self) -> usize {
        2
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn input_port_name(&self, port: usize) -> &'static str {
        if port == 0 {
            "a"
        } else {
            "b"
        }
    }

    fn input_port_default_value(&self, _port: usize) -> Value {
        Value::Vector([0.0, 0.0, 0.0])
    }

    fn output_port_count(&self) -> usize {
        1
    }

    fn output_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn output_port_name(&self, _port: usize) -> &'static str {
        "op"
    }

    fn editable_properties(&self) -> Vec<&'static str> {
        vec!["op"]
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
            "\t{} = {};\n",
            output_vars[0],
            self.op.expr(&input_vars[0], &input_vars[1])
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Unary function applied by [`ScalarFunc`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarFunction {
    /// `sin(x)`
    #[default]
    Sin,
    /// `cos(x)`
    Cos,
    /// `tan(x)`
    Tan,
    /// `abs(x)`
    Abs,
    /// `sqrt(x)`
    Sqrt,
    /// `floor(x)`
    Floor,
    /// `ceil(x)`
    Ceil,
    /// `fract(x)`
    Fract,
    /// `-x`
    Negate,
}

impl ScalarFunction {
    fn expr(self, x: &str) -> String {
        match self {
            Self::Sin => format!("sin({x})"),
            Self::Cos => format!("cos({x})"),
            Self::Tan => format!("tan({x})"),
            Self::Abs => format!("abs({x})"),
            Self::Sqrt => format!("sqrt({x})"),
            Self::Floor => format!("floor({x})"),
            Self::Ceil => format!("ceil({x})"),
            Self::Fract => format!("fract({x})"),
            Self::Negate => format!("-({x})"),
        }
    }
}

/// Unary function over a scalar.
#[derive(Debug, Default)]
pub struct ScalarFunc {
    /// Selected function.
    pub func: ScalarFunction,
}

impl ScalarFunc {
    /// Create a function node.
    pub fn new(func: ScalarFunction) -> Self {
        Self { func }
    }
}

impl ShaderNode for ScalarFunc {
    fn kind(&self) -> &'static str {
        "scalar_func"
    }

    fn caption(&self) -> &'static str {
        "ScalarFunc"
    }

    fn input_port_count(&self) -> usize {
        1
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Scalar
    }

    fn input_port_name(&self, _port: usize) -> &'static str {
        ""
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
        ""
    }

    fn editable_properties(&self) -> Vec<&'static str> {
        vec!["func"]
    }

    fn generate_code(
        &self,
        _mode: ShaderMode,
        _stage: Stage,
        _id: NodeId,
        input_vars: &[String],
        output_vars: &[String],
    ) -> String {
        format!("\t{} = {};\n", output_vars[0], self.func.expr(&input_vars[0]))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Unary function applied by [`VectorFunc`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VectorFunction {
    /// `normalize(v)`
    #[default]
    Normalize,
    /// `abs(v)`
    Abs,
    /// `floor(v)`
    Floor,
    /// `fract(v)`
    Fract,
    /// `-v`
    Negate,
}

impl VectorFunction {
    fn expr(self, v: &str) -> String {
        match self {
            Self::Normalize => format!("normalize({v})"),
            Self::Abs => format!("abs({v})"),
            Self::Floor => format!("floor({v})"),
            Self::Fract => format!("fract({v})"),
            Self::Negate => format!("-({v})"),
        }
    }
}

/// Unary function over a vector.
#[derive(Debug, Default)]
pub struct VectorFunc {
    /// Selected function.
    pub func: VectorFunction,
}

impl VectorFunc {
    /// Create a function node.
    pub fn new(func: VectorFunction) -> Self {
        Self { func }
    }
}

impl ShaderNode for VectorFunc {
    fn kind(&self) -> &'static str {
        "vector_func"
    }

    fn caption(&self) -> &'static str {
        "VectorFunc"
    }

    fn input_port_count(&self) -> usize {
        1
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn input_port_name(&self, _port: usize) -> &'static str {
        ""
    }

    fn input_port_default_value(&self, _port: usize) -> Value {
        Value::Vector([0.0, 0.0, 0.0])
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
        vec!["func"]
    }

    fn generate_code(
        &self,
        _mode: ShaderMode,
        _stage: Stage,
        _id: NodeId,
        input_vars: &[String],
        output_vars: &[String],
    ) -> String {
        format!("\t{} = {};\n", output_vars[0], self.func.expr(&input_vars[0]))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Linear interpolation between two scalars.
#[derive(Debug, Default)]
pub struct ScalarInterp;

impl ShaderNode for ScalarInterp {
    fn kind(&self) -> &'static str {
        "scalar_interp"
    }

    fn caption(&self) -> &'static str {
        "ScalarMix"
    }

    fn input_port_count(&self) -> usize {
        3
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Scalar
    }

    fn input_port_name(&self, port: usize) -> &'static str {
        match port {
            0 => "a",
            1 => "b",
            _ => "weight",
        }
    }

    fn input_port_default_value(&self, port: usize) -> Value {
        match port {
            0 => Value::Scalar(0.0),
            1 => Value::Scalar(1.0),
            _ => Value::Scalar(0.5),
        }
    }

    fn output_port_count(&self) -> usize {
        1
    }

    fn output_port_type(&self, _port: usize) -> PortType {
        PortType::Scalar
    }

    fn output_port_name(&self, _port: usize) -> &'static str {
        "mix"
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
            "\t{} = mix({}, {}, {});\n",
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

/// Linear interpolation between two vectors.
#[derive(Debug, Default)]
pub struct VectorInterp;

impl ShaderNode for VectorInterp {
    fn kind(&self) -> &'static str {
        "vector_interp"
    }

    fn caption(&self) -> &'static str {
        "VectorMix"
    }

    fn input_port_count(&self) -> usize {
        3
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn input_port_name(&self, port: usize) -> &'static str {
        match port {
            0 => "a",
            1 => "b",
            _ => "weight",
        }
    }

    fn input_port_default_value(&self, port: usize) -> Value {
        match port {
            0 => Value::Vector([0.0, 0.0, 0.0]),
            1 => Value::Vector([1.0, 1.0, 1.0]),
            _ => Value::Vector([0.5, 0.5, 0.5]),
        }
    }

    fn output_port_count(&self) -> usize {
        1
    }

    fn output_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn output_port_name(&self, _port: usize) -> &'static str {
        "mix"
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
            "\t{} = mix({}, {}, {});\n",
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

/// Dot product of two vectors, producing a scalar.
#[derive(Debug, Default)]
pub struct DotProduct;

impl ShaderNode for DotProduct {
    fn kind(&self) -> &'static str {
        "dot_product"
    }

    fn caption(&self) -> &'static str {
        "DotProduct"
    }

    fn input_port_count(&self) -> usize {
        2
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn input_port_name(&self, port: usize) -> &'static str {
        if port == 0 {
            "a"
        } else {
            "b"
        }
    }

    fn input_port_default_value(&self, _port: usize) -> Value {
        Value::Vector([0.0, 0.0, 0.0])
    }

    fn output_port_count(&self) -> usize {
        1
    }

    fn output_port_type(&self, _port: usize) -> PortType {
        PortType::Scalar
    }

    fn output_port_name(&self, _port: usize) -> &'static str {
        "dot"
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
            "\t{} = dot({}, {});\n",
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

/// Length of a vector, producing a scalar.
#[derive(Debug, Default)]
pub struct VectorLen;

impl ShaderNode for VectorLen {
    fn kind(&self) -> &'static str {
        "vector_len"
    }

    fn caption(&self) -> &'static str {
        "Length"
    }

    fn input_port_count(&self) -> usize {
        1
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn input_port_name(&self, _port: usize) -> &'static str {
        ""
    }

    fn input_port_default_value(&self, _port: usize) -> Value {
        Value::Vector([0.0, 0.0, 0.0])
    }

    fn output_port_count(&self) -> usize {
        1
    }

    fn output_port_type(&self, _port: usize) -> PortType {
        PortType::Scalar
    }

    fn output_port_name(&self, _port: usize) -> &'static str {
        "length"
    }

    fn generate_code(
        &self,
        _mode: ShaderMode,
        _stage: Stage,
        _id: NodeId,
        input_vars: &[String],
        output_vars: &[String],
    ) -> String {
        format!("\t{} = length({});\n", output_vars[0], input_vars[0])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
