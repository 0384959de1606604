// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visual shader graph core for Shadeworks.
//!
//! This crate owns the material authoring model behind the node editor:
//! - Typed input/output ports with connection validation
//! - One mutable, acyclic node graph per shader stage
//! - Deterministic translation of a graph into shading-language source
//! - Single-node preview generation for editor inspection
//!
//! ## Architecture
//!
//! A [`ShaderGraph`] holds three stage graphs (vertex, fragment, light).
//! Nodes implement the [`ShaderNode`] contract and are registered under
//! caller-chosen integer ids; id 0 is always the stage's output node.
//! Structural mutations mark the shader dirty and the next
//! [`ShaderGraph::generate_shader`] call recompiles the source, walking each
//! stage from its output node so every reachable node is emitted exactly
//! once, producers before consumers. The generated artifact is plain source
//! text plus the texture uniforms an external material system must bind;
//! compiling and linking that source is not this crate's concern.
//!
//! The graph is a single-writer structure: callers serialize mutations, and
//! repeated generation of an unmodified graph is cached and byte-identical.

pub mod codegen;
pub mod connection;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod port;

pub use codegen::{GeneratedShader, ShaderWarning};
pub use connection::Connection;
pub use graph::{GraphError, ShaderGraph, ShaderMode, Stage};
pub use node::{NodeFactory, NodeId, NodeRegistry, ShaderNode, UniformNode};
pub use nodes::{InputNode, OutputNode};
pub use port::{DefaultTextureParam, PortType, TextureHandle, Value};
