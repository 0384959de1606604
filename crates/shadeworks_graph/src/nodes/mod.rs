// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core node kinds every shader graph depends on.

pub mod input;
pub mod output;

pub use input::InputNode;
pub use output::OutputNode;
