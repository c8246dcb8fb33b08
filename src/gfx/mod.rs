//! Vulkan Pipeline Interface
//!
//! Merge the reflection of shader modules into the descriptor set layouts,
//! push constant ranges and vertex input a Vulkan pipeline is created with.
use std::result;

mod error;
mod format;
mod query;
mod uniform;
mod layout;
mod vertex;
mod pipeline;

pub use error::*;
pub use format::{num_ty2fmt, fmt_nbyte};
pub use query::{ReflectionIndex, ResourceBinding, BufferInfo, stage_flags};
pub use uniform::{UniformBlockView, UniformMember};
pub use layout::{PipelineLayoutConfig, PipelineLayoutDesc, DescriptorSetLayoutDesc,
    PipelineLayout};
pub use vertex::VertexInputState;
pub use pipeline::PipelineInterface;

pub type Result<T> = result::Result<T, Error>;
