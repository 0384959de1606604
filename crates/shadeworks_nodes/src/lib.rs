// SPDX-License-Identifier: MIT OR Apache-2.0
//! Standard node library for Shadeworks shader graphs.
//!
//! Concrete [`ShaderNode`] kinds built on the `shadeworks_graph` core:
//! constants, scalar/vector arithmetic, interpolation, vector plumbing,
//! named uniforms and texture sampling. [`standard_registry`] exposes the
//! whole set (plus the core input node) keyed by kind identifier, which is
//! what editors use to populate their "add node" menus.

pub mod constant;
pub mod math;
pub mod texture;
pub mod uniforms;
pub mod vector;

pub use constant::{ScalarConstant, TransformConstant, VectorConstant};
pub use math::{
    DotProduct, ScalarFunc, ScalarFunction, ScalarInterp, ScalarOp, ScalarOperator, VectorFunc,
    VectorFunction, VectorInterp, VectorLen, VectorOp, VectorOperator,
};
pub use texture::TextureSample;
pub use uniforms::{ScalarUniform, TextureUniform, TransformUniform, VectorUniform};
pub use vector::{TransformMultOrder, TransformVecMult, VectorCompose, VectorDecompose};

use shadeworks_graph::{InputNode, NodeRegistry};

/// Registry containing every standard node kind.
///
/// The output node is deliberately absent: each stage owns exactly one,
/// created with the graph, and editors never instantiate it.
pub fn standard_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    registry.register("input", || Box::new(InputNode::default()));
    registry.register("scalar_constant", || Box::new(ScalarConstant::default()));
    registry.register("vector_constant", || Box::new(VectorConstant::default()));
    registry.register("transform_constant", || Box::new(TransformConstant::default()));
    registry.register("scalar_op", || Box::new(ScalarOp::default()));
    registry.register("vector_op", || Box::new(VectorOp::default()));
    registry.register("scalar_func", || Box::new(ScalarFunc::default()));
    registry.register("vector_func", || Box::new(VectorFunc::default()));
    registry.register("scalar_interp", || Box::new(ScalarInterp));
    registry.register("vector_interp", || Box::new(VectorInterp));
    registry.register("dot_product", || Box::new(DotProduct));
    registry.register("vector_len", || Box::new(VectorLen));
    registry.register("vector_compose", || Box::new(VectorCompose));
    registry.register("vector_decompose", || Box::new(VectorDecompose));
    registry.register("transform_vec_mult", || Box::new(TransformVecMult::default()));
    registry.register("scalar_uniform", || Box::new(ScalarUniform::default()));
    registry.register("vector_uniform", || Box::new(VectorUniform::default()));
    registry.register("transform_uniform", || Box::new(TransformUniform::default()));
    registry.register("texture_uniform", || Box::new(TextureUniform::default()));
    registry.register("texture_sample", || Box::new(TextureSample::default()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadeworks_graph::{NodeId, ShaderGraph, ShaderNode, Stage, TextureHandle};

    #[test]
    fn test_registry_has_every_kind() {
        let registry = standard_registry();
        for kind in [
            "input",
            "scalar_constant",
            "vector_constant",
            "transform_constant",
            "scalar_op",
            "vector_op",
            "scalar_func",
            "vector_func",
            "scalar_interp",
            "vector_interp",
            "dot_product",
            "vector_len",
            "vector_compose",
            "vector_decompose",
            "transform_vec_mult",
            "scalar_uniform",
            "vector_uniform",
            "transform_uniform",
            "texture_uniform",
            "texture_sample",
        ] {
            let node = registry.create(kind).unwrap();
            assert_eq!(node.kind(), kind);
        }
        assert!(!registry.contains("output"));
    }

    #[test]
    fn test_material_graph_end_to_end() {
        let mut graph = ShaderGraph::new();

        // Texture modulated by a tint uniform into the albedo output, with
        // a pulsing alpha driven by time.
        graph
            .add_node(
                Stage::Fragment,
                Box::new(TextureSample::new(TextureHandle(7))),
                [0.0, 0.0],
                NodeId(2),
            )
            .unwrap();
        graph
            .add_node(
                Stage::Fragment,
                Box::new(VectorUniform::new("tint")),
                [0.0, 100.0],
                NodeId(3),
            )
            .unwrap();
        graph
            .add_node(
                Stage::Fragment,
                Box::new(VectorOp::new(VectorOperator::Mul)),
                [200.0, 50.0],
                NodeId(4),
            )
            .unwrap();
        graph
            .add_node(
                Stage::Fragment,
                Box::new(InputNode::new("time")),
                [0.0, 200.0],
                NodeId(5),
            )
            .unwrap();
        graph
            .add_node(
                Stage::Fragment,
                Box::new(ScalarFunc::new(ScalarFunction::Sin)),
                [200.0, 200.0],
                NodeId(6),
            )
            .unwrap();

        graph.connect_nodes(Stage::Fragment, NodeId(2), 0, NodeId(4), 0).unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(3), 0, NodeId(4), 1).unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(4), 0, NodeId::OUTPUT, 0).unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(5), 0, NodeId(6), 0).unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(6), 0, NodeId::OUTPUT, 1).unwrap();

        let shader = graph.generate_shader().unwrap();
        assert!(shader.source.contains("uniform sampler2D tex_frg_2;\n"));
        assert!(shader.source.contains("uniform vec3 tint;\n"));
        assert!(shader.source.contains("\tvec4 n2_tex_read = texture(tex_frg_2, UV);\n"));
        assert!(shader.source.contains("\tn4_p0 = n2_p0 * n3_p0;\n"));
        assert!(shader.source.contains("\tALBEDO = n4_p0;\n"));
        assert!(shader.source.contains("\tn5_p0 = TIME;\n"));
        assert!(shader.source.contains("\tn6_p0 = sin(n5_p0);\n"));
        assert!(shader.source.contains("\tALPHA = n6_p0;\n"));
        assert!(shader.warnings.is_empty());

        assert_eq!(shader.default_texture_params.len(), 1);
        assert_eq!(shader.default_texture_params[0].name, "tex_frg_2");
        assert_eq!(shader.default_texture_params[0].texture, TextureHandle(7));
    }

    #[test]
    fn test_texture_params_deduped_by_name() {
        let mut graph = ShaderGraph::new();
        // The same logical sampler referenced from two stages.
        graph
            .add_node(
                Stage::Fragment,
                Box::new(TextureUniform::new("shared_tex").with_texture(TextureHandle(5))),
                [0.0, 0.0],
                NodeId(2),
            )
            .unwrap();
        graph
            .add_node(
                Stage::Light,
                Box::new(TextureUniform::new("shared_tex").with_texture(TextureHandle(5))),
                [0.0, 0.0],
                NodeId(2),
            )
            .unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(2), 0, NodeId::OUTPUT, 0).unwrap();
        graph.connect_nodes(Stage::Light, NodeId(2), 0, NodeId::OUTPUT, 0).unwrap();

        let shader = graph.generate_shader().unwrap();
        assert_eq!(shader.default_texture_params.len(), 1);
        assert_eq!(shader.default_texture_params[0].name, "shared_tex");
        // The declaration is emitted once as well.
        assert_eq!(shader.source.matches("uniform sampler2D shared_tex;\n").count(), 1);
    }

    #[test]
    fn test_uniform_name_validation_against_real_uniforms() {
        let mut graph = ShaderGraph::new();
        graph
            .add_node(
                Stage::Fragment,
                Box::new(ScalarUniform::new("speed")),
                [0.0, 0.0],
                NodeId(2),
            )
            .unwrap();
        assert_eq!(graph.validate_uniform_name("speed", None), "speed_2");
        assert_eq!(graph.validate_uniform_name("velocity", None), "velocity");
    }

    #[test]
    fn test_preview_of_interior_node() {
        let mut graph = ShaderGraph::new();
        graph
            .add_node(
                Stage::Fragment,
                Box::new(VectorConstant::new([1.0, 0.0, 0.0])),
                [0.0, 0.0],
                NodeId(2),
            )
            .unwrap();
        graph
            .add_node(
                Stage::Fragment,
                Box::new(VectorFunc::new(VectorFunction::Normalize)),
                [100.0, 0.0],
                NodeId(3),
            )
            .unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(2), 0, NodeId(3), 0).unwrap();
        graph.connect_nodes(Stage::Fragment, NodeId(3), 0, NodeId::OUTPUT, 0).unwrap();

        let preview = graph
            .generate_preview_shader(Stage::Fragment, NodeId(3), Some(0))
            .unwrap();
        assert!(preview.source.contains("\tn3_p0 = normalize(n2_p0);\n"));
        assert!(preview.source.contains("\tCOLOR = vec4(n3_p0, 1.0);\n"));
        // The output node itself is not part of the preview program.
        assert!(!preview.source.contains("ALBEDO"));
    }
}
