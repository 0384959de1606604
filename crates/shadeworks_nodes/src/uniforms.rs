// SPDX-License-Identifier: MIT OR Apache-2.0
//! Uniform nodes: externally-bound shader parameters with user-assigned names.
//!
//! A uniform with an empty name still generates (the value degrades to a
//! neutral constant) and reports a warning, so the editor keeps rendering
//! while the user types.

use shadeworks_graph::{
    DefaultTextureParam, NodeId, PortType, ShaderMode, ShaderNode, Stage, TextureHandle,
    UniformNode,
};
use std::any::Any;

/// A named scalar uniform.
#[derive(Debug, Default)]
pub struct ScalarUniform {
    name: String,
}

impl ScalarUniform {
    /// Create a uniform with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ShaderNode for ScalarUniform {
    fn kind(&self) -> &'static str {
        "scalar_uniform"
    }

    fn caption(&self) -> &'static str {
        "ScalarUniform"
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
        vec!["uniform_name"]
    }

    fn get_warning(&self, _mode: ShaderMode, _stage: Stage) -> Option<String> {
        self.name
            .is_empty()
            .then(|| String::from("uniform has no name"))
    }

    fn generate_global(&self, _mode: ShaderMode, _stage: Stage, _id: NodeId) -> String {
        if self.name.is_empty() {
            String::new()
        } else {
            format!("uniform float {};\n", self.name)
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
        if self.name.is_empty() {
            format!("\t{} = 0.0;\n", output_vars[0])
        } else {
            format!("\t{} = {};\n", output_vars[0], self.name)
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_uniform(&self) -> Option<&dyn UniformNode> {
        Some(self)
    }

    fn as_uniform_mut(&mut self) -> Option<&mut dyn UniformNode> {
        Some(self)
    }
}

impl UniformNode for ScalarUniform {
    fn uniform_name(&self) -> &str {
        &self.name
    }

    fn set_uniform_name(&mut self, name: &str) {
        self.name = name.into();
    }
}

/// A named vector uniform.
#[derive(Debug, Default)]
pub struct VectorUniform {
    name: String,
}

impl VectorUniform {
    /// Create a uniform with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ShaderNode for VectorUniform {
    fn kind(&self) -> &'static str {
        "vector_uniform"
    }

    fn caption(&self) -> &'static str {
        "VectorUniform"
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
        vec!["uniform_name"]
    }

    fn get_warning(&self, _mode: ShaderMode, _stage: Stage) -> Option<String> {
        self.name
            .is_empty()
            .then(|| String::from("uniform has no name"))
    }

    fn generate_global(&self, _mode: ShaderMode, _stage: Stage, _id: NodeId) -> String {
        if self.name.is_empty() {
            String::new()
        } else {
            format!("uniform vec3 {};\n", self.name)
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
        if self.name.is_empty() {
            format!("\t{} = vec3(0.0);\n", output_vars[0])
        } else {
            format!("\t{} = {};\n", output_vars[0], self.name)
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_uniform(&self) -> Option<&dyn UniformNode> {
        Some(self)
    }

    fn as_uniform_mut(&mut self) -> Option<&mut dyn UniformNode> {
        Some(self)
    }
}

impl UniformNode for VectorUniform {
    fn uniform_name(&self) -> &str {
        &self.name
    }

    fn set_uniform_name(&mut self, name: &str) {
        self.name = name.into();
    }
}

/// A named transform uniform.
#[derive(Debug, Default)]
pub struct TransformUniform {
    name: String,
}

impl TransformUniform {
    /// Create a uniform with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ShaderNode for TransformUniform {
    fn kind(&self) -> &'static str {
        "transform_uniform"
    }

    fn caption(&self) -> &'static str {
        "TransformUniform"
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
        vec!["uniform_name"]
    }

    fn get_warning(&self, _mode: ShaderMode, _stage: Stage) -> Option<String> {
        self.name
            .is_empty()
            .then(|| String::from("uniform has no name"))
    }

    fn generate_global(&self, _mode: ShaderMode, _stage: Stage, _id: NodeId) -> String {
        if self.name.is_empty() {
            String::new()
        } else {
            format!("uniform mat4 {};\n", self.name)
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
        if self.name.is_empty() {
            format!("\t{} = mat4(1.0);\n", output_vars[0])
        } else {
            format!("\t{} = {};\n", output_vars[0], self.name)
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_uniform(&self) -> Option<&dyn UniformNode> {
        Some(self)
    }

    fn as_uniform_mut(&mut self) -> Option<&mut dyn UniformNode> {
        Some(self)
    }
}

impl UniformNode for TransformUniform {
    fn uniform_name(&self) -> &str {
        &self.name
    }

    fn set_uniform_name(&mut self, name: &str) {
        self.name = name.into();
    }
}

/// A named sampler uniform with an optional default texture the material
/// system binds when nothing else is assigned.
///
/// Inputs: `uv` (falls back to the stage's `UV` built-in when unconnected)
/// and `lod`. Outputs the sampled color as `rgb` plus a separate `alpha`.
#[derive(Debug, Default)]
pub struct TextureUniform {
    name: String,
    /// Texture bound when the material does not override this uniform.
    pub texture: Option<TextureHandle>,
}

impl TextureUniform {
    /// Create a sampler uniform with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture: None,
        }
    }

    /// Attach a default texture.
    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }
}

impl ShaderNode for TextureUniform {
    fn kind(&self) -> &'static str {
        "texture_uniform"
    }

    fn caption(&self) -> &'static str {
        "TextureUniform"
    }

    fn input_port_count(&self) -> usize {
        2
    }

    fn input_port_type(&self, port: usize) -> PortType {
        if port == 0 {
            PortType::Vector
        } else {
            PortType::Scalar
        }
    }

    fn input_port_name(&self, port: usize) -> &'static str {
        if port == 0 {
            "uv"
        } else {
            "lod"
        }
    }

    fn output_port_count(&self) -> usize {
        2
    }

    fn output_port_type(&self, port: usize) -> PortType {
        if port == 0 {
            PortType::Vector
        } else {
            PortType::Scalar
        }
    }

    fn output_port_name(&self, port: usize) -> &'static str {
        if port == 0 {
            "rgb"
        } else {
            "alpha"
        }
    }

    fn editable_properties(&self) -> Vec<&'static str> {
        vec!["uniform_name", "texture"]
    }

    fn get_warning(&self, _mode: ShaderMode, _stage: Stage) -> Option<String> {
        self.name
            .is_empty()
            .then(|| String::from("uniform has no name"))
    }

    fn generate_global(&self, _mode: ShaderMode, _stage: Stage, _id: NodeId) -> String {
        if self.name.is_empty() {
            String::new()
        } else {
            format!("uniform sampler2D {};\n", self.name)
        }
    }

    fn generate_code(
        &self,
        _mode: ShaderMode,
        _stage: Stage,
        id: NodeId,
        input_vars: &[String],
        output_vars: &[String],
    ) -> String {
        if self.name.is_empty() {
            return format!(
                "\t{} = vec3(0.0);\n\t{} = 1.0;\n",
                output_vars[0], output_vars[1]
            );
        }
        let uv = if input_vars[0].is_empty() {
            String::from("UV")
        } else {
            format!("{}.xy", input_vars[0])
        };
        let read = format!("n{}_tex_read", id.0);
        let sample = if input_vars[1].is_empty() {
            format!("texture({}, {uv})", self.name)
        } else {
            format!("textureLod({}, {uv}, {})", self.name, input_vars[1])
        };
        format!(
            "\tvec4 {read} = {sample};\n\t{} = {read}.rgb;\n\t{} = {read}.a;\n",
            output_vars[0], output_vars[1]
        )
    }

    fn default_texture_parameters(&self, _stage: Stage, _id: NodeId) -> Vec<DefaultTextureParam> {
        match self.texture {
            Some(texture) if !self.name.is_empty() => vec![DefaultTextureParam {
                name: self.name.clone(),
                texture,
            }],
            _ => Vec::new(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_uniform(&self) -> Option<&dyn UniformNode> {
        Some(self)
    }

    fn as_uniform_mut(&mut self) -> Option<&mut dyn UniformNode> {
        Some(self)
    }
}

impl UniformNode for TextureUniform {
    fn uniform_name(&self) -> &str {
        &self.name
    }

    fn set_uniform_name(&mut self, name: &str) {
        self.name = name.into();
    }
}
