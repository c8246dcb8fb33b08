//! Shader-reflection-driven pipeline assembly.
//!
//! `spv` holds everything that only needs the SPIR-V word stream: module
//! persistence, reflection and matrix-layout conversion. `gfx` turns the
//! reflected interface of a set of modules into Vulkan pipeline ingredients.
pub mod spv;
pub mod gfx;
