// SPDX-License-Identifier: MIT OR Apache-2.0
//! Texture sampling with a node-owned texture reference.

use shadeworks_graph::{
    DefaultTextureParam, NodeId, PortType, ShaderMode, ShaderNode, Stage, TextureHandle, Value,
};
use std::any::Any;

/// Samples a texture carried by the node itself.
///
/// Unlike [`TextureUniform`](crate::TextureUniform) the sampler name is not
/// user-assigned: it is derived from the stage and node id, so it can never
/// collide and needs no validation.
#[derive(Debug, Default)]
pub struct TextureSample {
    /// Texture to sample.
    pub texture: Option<TextureHandle>,
}

impl TextureSample {
    /// Create a sampler for the given texture.
    pub fn new(texture: TextureHandle) -> Self {
        Self {
            texture: Some(texture),
        }
    }

    fn sampler_name(stage: Stage, id: NodeId) -> String {
        format!("tex_{}_{}", stage.short_name(), id.0)
    }
}

impl ShaderNode for TextureSample {
    fn kind(&self) -> &'static str {
        "texture_sample"
    }

    fn caption(&self) -> &'static str {
        "Texture"
    }

    fn input_port_count(&self) -> usize {
        1
    }

    fn input_port_type(&self, _port: usize) -> PortType {
        PortType::Vector
    }

    fn input_port_name(&self, _port: usize) -> &'static str {
        "uv"
    }

    fn input_port_default_value(&self, _port: usize) -> Value {
        Value::Absent
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
        vec!["texture"]
    }

    fn get_warning(&self, _mode: ShaderMode, _stage: Stage) -> Option<String> {
        self.texture
            .is_none()
            .then(|| String::from("no texture assigned"))
    }

    fn generate_global(&self, _mode: ShaderMode, stage: Stage, id: NodeId) -> String {
        format!("uniform sampler2D {};\n", Self::sampler_name(stage, id))
    }

    fn generate_code(
        &self,
        _mode: ShaderMode,
        stage: Stage,
        id: NodeId,
        input_vars: &[String],
        output_vars: &[String],
    ) -> String {
        let uv = if input_vars[0].is_empty() {
            String::from("UV")
        } else {
            format!("{}.xy", input_vars[0])
        };
        let read = format!("n{}_tex_read", id.0);
        format!(
            "\tvec4 {read} = texture({}, {uv});\n\t{} = {read}.rgb;\n\t{} = {read}.a;\n",
            Self::sampler_name(stage, id),
            output_vars[0],
            output_vars[1]
        )
    }

    fn default_texture_parameters(&self, stage: Stage, id: NodeId) -> Vec<DefaultTextureParam> {
        match self.texture {
            Some(texture) => vec![DefaultTextureParam {
                name: Self::sampler_name(stage, id),
                texture,
            }],
            None => Vec::new(),
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
    fn test_sampler_name_is_stage_scoped() {
        let node = TextureSample::new(TextureHandle(3));
        assert_eq!(
            node.generate_global(ShaderMode::Spatial, Stage::Fragment, NodeId(4)),
            "uniform sampler2D tex_frg_4;\n"
        );
        assert_eq!(
            node.generate_global(ShaderMode::Spatial, Stage::Vertex, NodeId(4)),
            "uniform sampler2D tex_vtx_4;\n"
        );
    }

    #[test]
    fn test_sampling_code() {
        let node = TextureSample::new(TextureHandle(3));
        let code = node.generate_code(
            ShaderMode::Spatial,
            Stage::Fragment,
            NodeId(4),
            &[String::new()],
            &[String::from("n4_p0"), String::from("n4_p1")],
        );
        assert_eq!(
            code,
            "\tvec4 n4_tex_read = texture(tex_frg_4, UV);\n\tn4_p0 = n4_tex_read.rgb;\n\tn4_p1 = n4_tex_read.a;\n"
        );
    }

    #[test]
    fn test_default_params_follow_assignment() {
        let unassigned = TextureSample::default();
        assert!(unassigned
            .default_texture_parameters(Stage::Fragment, NodeId(4))
            .is_empty());
        assert!(unassigned
            .get_warning(ShaderMode::Spatial, Stage::Fragment)
            .is_some());

        let assigned = TextureSample::new(TextureHandle(9));
        let params = assigned.default_texture_parameters(Stage::Fragment, NodeId(4));
        assert_eq!(params[0].name, "tex_frg_4");
        assert_eq!(params[0].texture, TextureHandle(9));
    }
}
