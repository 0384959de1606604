// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port types and the tagged value union used for default inputs.

use serde::{Deserialize, Serialize};

/// Data type carried by a node port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// Single float.
    Scalar,
    /// 3-component vector.
    Vector,
    /// 4x4 matrix.
    Transform,
}

impl PortType {
    /// Shading-language type name used when declaring port variables.
    pub fn glsl_name(self) -> &'static str {
        match self {
            Self::Scalar => "float",
            Self::Vector => "vec3",
            Self::Transform => "mat4",
        }
    }

    /// Check whether an output of this type may feed an input of `other`.
    ///
    /// The table is asymmetric: a scalar output widens into a vector input,
    /// but a vector never narrows into a scalar. Transforms only connect to
    /// transforms.
    pub fn can_connect_to(self, other: PortType) -> bool {
        self == other || matches!((self, other), (Self::Scalar, Self::Vector))
    }
}

/// Default value attached to an input port.
///
/// `Absent` means no default is wanted: when the port is unconnected the
/// node receives an empty input variable and must cope on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Single float.
    Scalar(f32),
    /// 3-component vector.
    Vector([f32; 3]),
    /// 4x4 column-major matrix.
    Transform([[f32; 4]; 4]),
    /// No value.
    Absent,
}

impl Value {
    /// Identity matrix value, the natural default for transform inputs.
    pub fn identity_transform() -> Self {
        Self::Transform([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Whether this is the `Absent` marker.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Port type this value naturally belongs to, if any.
    pub fn port_type(&self) -> Option<PortType> {
        match self {
            Self::Scalar(_) => Some(PortType::Scalar),
            Self::Vector(_) => Some(PortType::Vector),
            Self::Transform(_) => Some(PortType::Transform),
            Self::Absent => None,
        }
    }

    /// Render this value as a shading-language literal for an input port of
    /// type `target`. Scalars splat into vectors; `Absent` renders empty.
    pub fn to_glsl(&self, target: PortType) -> String {
        match self {
            Self::Scalar(v) if target == PortType::Vector => {
                format!("vec3({})", float_literal(*v))
            }
            Self::Scalar(v) => float_literal(*v),
            Self::Vector(v) => format!(
                "vec3({}, {}, {})",
                float_literal(v[0]),
                float_literal(v[1]),
                float_literal(v[2])
            ),
            Self::Transform(m) => format!(
                "mat4(vec4({}, {}, {}, {}), vec4({}, {}, {}, {}), vec4({}, {}, {}, {}), vec4({}, {}, {}, {}))",
                float_literal(m[0][0]),
                float_literal(m[0][1]),
                float_literal(m[0][2]),
                float_literal(m[0][3]),
                float_literal(m[1][0]),
                float_literal(m[1][1]),
                float_literal(m[1][2]),
                float_literal(m[1][3]),
                float_literal(m[2][0]),
                float_literal(m[2][1]),
                float_literal(m[2][2]),
                float_literal(m[2][3]),
                float_literal(m[3][0]),
                float_literal(m[3][1]),
                float_literal(m[3][2]),
                float_literal(m[3][3])
            ),
            Self::Absent => String::new(),
        }
    }
}

/// Format a float as a valid shading-language literal.
pub(crate) fn float_literal(value: f32) -> String {
    format!("{value:.6}")
}

/// Opaque reference to a texture resource owned by the material system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// A texture uniform the generated shader expects the material system to bind.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTextureParam {
    /// Uniform name inside the generated source.
    pub name: String,
    /// Texture to bind by default.
    pub texture: TextureHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatibility_table() {
        assert!(PortType::Scalar.can_connect_to(PortType::Scalar));
        assert!(PortType::Vector.can_connect_to(PortType::Vector));
        assert!(PortType::Transform.can_connect_to(PortType::Transform));

        // Widening only goes one way.
        assert!(PortType::Scalar.can_connect_to(PortType::Vector));
        assert!(!PortType::Vector.can_connect_to(PortType::Scalar));

        assert!(!PortType::Scalar.can_connect_to(PortType::Transform));
        assert!(!PortType::Transform.can_connect_to(PortType::Vector));
        assert!(!PortType::Vector.can_connect_to(PortType::Transform));
    }

    #[test]
    fn test_scalar_literal() {
        assert_eq!(Value::Scalar(0.5).to_glsl(PortType::Scalar), "0.500000");
        assert_eq!(Value::Scalar(1.0).to_glsl(PortType::Scalar), "1.000000");
    }

    #[test]
    fn test_scalar_splats_into_vector() {
        assert_eq!(
            Value::Scalar(2.0).to_glsl(PortType::Vector),
            "vec3(2.000000)"
        );
    }

    #[test]
    fn test_vector_literal() {
        assert_eq!(
            Value::Vector([1.0, 0.5, 0.0]).to_glsl(PortType::Vector),
            "vec3(1.000000, 0.500000, 0.000000)"
        );
    }

    #[test]
    fn test_absent_renders_empty() {
        assert!(Value::Absent.to_glsl(PortType::Scalar).is_empty());
        assert!(Value::Absent.is_absent());
    }

    #[test]
    fn test_identity_transform_literal() {
        let glsl = Value::identity_transform().to_glsl(PortType::Transform);
        assert!(glsl.starts_with("mat4(vec4(1.000000, 0.000000"));
        assert!(glsl.ends_with("0.000000, 1.000000))"));
    }

    #[test]
    fn test_value_serialization() {
        let value = Value::Vector([0.25, 0.5, 0.75]);
        let ron_str = ron::to_string(&value).unwrap();
        let loaded: Value = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, value);
    }
}
