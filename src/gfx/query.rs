//! Cross-stage queries over the reflected interfaces of a set of modules.
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use ash::vk;
use log::{debug, info, trace, warn};
use crate::spv::{self, SpirvBinary, ShaderReflection, InterfaceVariable, Stage};
use super::format::{num_ty2fmt, fmt_nbyte};

#[cfg(test)]
thread_local! {
    static LIVE_HANDLES: std::cell::Cell<usize> = std::cell::Cell::new(0);
}
#[cfg(test)]
fn count_handle(opened: bool) {
    LIVE_HANDLES.with(|x| x.set(if opened { x.get() + 1 } else { x.get() - 1 }));
}
#[cfg(not(test))]
fn count_handle(_: bool) {}

/// The only mapping from pipeline stages to Vulkan stage flags.
pub fn stage_flags(stage: Stage) -> vk::ShaderStageFlags {
    match stage {
        Stage::Vertex => vk::ShaderStageFlags::VERTEX,
        Stage::TessControl => vk::ShaderStageFlags::TESSELLATION_CONTROL,
        Stage::TessEval => vk::ShaderStageFlags::TESSELLATION_EVALUATION,
        Stage::Geometry => vk::ShaderStageFlags::GEOMETRY,
        Stage::Fragment => vk::ShaderStageFlags::FRAGMENT,
        Stage::Compute => vk::ShaderStageFlags::COMPUTE,
    }
}

fn desc_ty2vk(desc_ty: spv::DescriptorType) -> vk::DescriptorType {
    use spv::DescriptorType::*;
    match desc_ty {
        Sampler => vk::DescriptorType::SAMPLER,
        CombinedImageSampler => vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
        SampledImage => vk::DescriptorType::SAMPLED_IMAGE,
        StorageImage => vk::DescriptorType::STORAGE_IMAGE,
        UniformTexelBuffer => vk::DescriptorType::UNIFORM_TEXEL_BUFFER,
        StorageTexelBuffer => vk::DescriptorType::STORAGE_TEXEL_BUFFER,
        UniformBuffer => vk::DescriptorType::UNIFORM_BUFFER,
        StorageBuffer => vk::DescriptorType::STORAGE_BUFFER,
        InputAttachment => vk::DescriptorType::INPUT_ATTACHMENT,
    }
}

/// A descriptor binding merged across all stages using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceBinding {
    pub set: u32,
    pub bind_point: u32,
    pub desc_ty: vk::DescriptorType,
    /// Number of descriptors at the binding point. Zero for runtime arrays.
    pub ndesc: u32,
    pub stage: vk::ShaderStageFlags,
}
impl ResourceBinding {
    pub fn to_vk(&self) -> vk::DescriptorSetLayoutBinding {
        vk::DescriptorSetLayoutBinding {
            binding: self.bind_point,
            descriptor_type: self.desc_ty,
            descriptor_count: self.ndesc,
            stage_flags: self.stage,
            p_immutable_samplers: std::ptr::null(),
        }
    }
}

/// Byte range of a block or of one of its top-level members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferInfo {
    pub offset: usize,
    pub size: usize,
}

/// Owns the reflection of one module for as long as the index lives.
struct ReflectionHandle {
    refl: ShaderReflection,
}
impl ReflectionHandle {
    fn open(spv: &SpirvBinary) -> spv::Result<ReflectionHandle> {
        let refl = spv.reflect()?;
        if refl.stage() != Some(spv.stage()) {
            warn!("module is declared as {:?} stage but its entry point says {:?}",
                spv.stage(), refl.stage());
        }
        count_handle(true);
        trace!("opened reflection handle");
        Ok(ReflectionHandle { refl: refl })
    }
}
impl Drop for ReflectionHandle {
    fn drop(&mut self) {
        count_handle(false);
        trace!("released reflection handle");
    }
}

/// Reflected interfaces of every module of a pipeline. Either all modules are
/// reflected or none is.
pub struct ReflectionIndex {
    handles: Vec<ReflectionHandle>,
}
impl ReflectionIndex {
    pub fn new(spvs: &[SpirvBinary]) -> ReflectionIndex {
        let mut handles = Vec::with_capacity(spvs.len());
        for (i, spv) in spvs.iter().enumerate() {
            match ReflectionHandle::open(spv) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    warn!("unable to reflect module #{}: {}", i, e);
                    // Dropping releases every handle opened so far.
                    return ReflectionIndex { handles: Vec::new() };
                },
            }
        }
        info!("reflected {} shader modules", handles.len());
        ReflectionIndex { handles: handles }
    }

    pub fn len(&self) -> usize { self.handles.len() }
    pub fn is_empty(&self) -> bool { self.handles.is_empty() }
    pub fn reflections(&self) -> impl Iterator<Item=&ShaderReflection> {
        self.handles.iter().map(|x| &x.refl)
    }
    pub fn stages(&self) -> Vec<Option<Stage>> {
        self.reflections().map(ShaderReflection::stage).collect()
    }
    /// Every reflection with its stage, or `None` if any stage is unknown.
    fn staged(&self) -> Option<Vec<(Stage, &ShaderReflection)>> {
        let mut rv = Vec::with_capacity(self.handles.len());
        for refl in self.reflections() {
            match refl.stage() {
                Some(stage) => rv.push((stage, refl)),
                None => {
                    warn!("module has no known pipeline stage");
                    return None;
                },
            }
        }
        Some(rv)
    }

    /// Descriptor bindings of all stages. Bindings sharing a set and binding
    /// point are merged into the first one declared.
    pub fn gather_desc_binds(&self) -> Vec<ResourceBinding> {
        let staged = match self.staged() {
            Some(x) => x,
            None => return Vec::new(),
        };
        let mut rv: Vec<ResourceBinding> = Vec::new();
        let mut idx_map: HashMap<_, usize> = HashMap::new();
        for (stage, refl) in staged {
            for desc_bind in refl.desc_binds() {
                let bind = ResourceBinding {
                    set: desc_bind.set,
                    bind_point: desc_bind.bind_point,
                    desc_ty: desc_ty2vk(desc_bind.desc_ty),
                    ndesc: desc_bind.ndesc(),
                    stage: stage_flags(stage),
                };
                match idx_map.entry((bind.set, bind.bind_point)) {
                    Entry::Occupied(entry) => {
                        let merged = &mut rv[*entry.get()];
                        if merged.desc_ty != bind.desc_ty {
                            warn!("descriptor type mismatch at (set={}, bind={}): {:?} vs {:?}",
                                bind.set, bind.bind_point, merged.desc_ty, bind.desc_ty);
                        }
                        merged.stage |= bind.stage;
                    },
                    Entry::Vacant(entry) => {
                        entry.insert(rv.len());
                        rv.push(bind);
                    },
                }
            }
        }
        rv
    }
    fn blocks(&self) -> impl Iterator<Item=&spv::BlockVariable> {
        self.reflections()
            .flat_map(|x| x.desc_binds().iter())
            .filter_map(|x| x.block.as_ref())
            .filter(|x| !x.name.is_empty())
    }
    pub fn gather_block_names(&self) -> Vec<String> {
        if self.staged().is_none() { return Vec::new(); }
        let mut rv: Vec<String> = Vec::new();
        for block in self.blocks() {
            if !rv.contains(&block.name) {
                rv.push(block.name.clone());
            }
        }
        rv
    }
    /// Qualified names `block.member` of all top-level block members.
    pub fn gather_block_member_names(&self) -> Vec<String> {
        if self.staged().is_none() { return Vec::new(); }
        let mut rv: Vec<String> = Vec::new();
        for block in self.blocks() {
            for member in block.members.iter().filter(|x| !x.name.is_empty()) {
                let name = format!("{}.{}", block.name, member.name);
                if !rv.contains(&name) { rv.push(name); }
            }
        }
        rv
    }
    /// Byte range of a block `name` or a member `block.member`. The first
    /// declaration wins.
    pub fn gather_buf_info(&self, name: &str) -> Option<BufferInfo> {
        self.staged()?;
        for block in self.blocks() {
            if block.name == name {
                return Some(BufferInfo {
                    offset: block.offset as usize,
                    size: block.size as usize,
                });
            }
            let member_name = match name.get(block.name.len()..) {
                Some(x) if name.starts_with(&block.name) && x.starts_with('.') => &x[1..],
                _ => continue,
            };
            if let Some(member) = block.members.iter().find(|x| x.name == member_name) {
                return Some(BufferInfo {
                    offset: member.offset as usize,
                    size: member.size as usize,
                });
            }
        }
        debug!("no block or block member is named '{}'", name);
        None
    }
    /// Push constant ranges of all stages. Ranges identical in offset and size
    /// are merged.
    pub fn gather_push_const_rngs(&self) -> Vec<vk::PushConstantRange> {
        let staged = match self.staged() {
            Some(x) => x,
            None => return Vec::new(),
        };
        let mut rv: Vec<vk::PushConstantRange> = Vec::new();
        let mut idx_map: HashMap<_, usize> = HashMap::new();
        for (stage, refl) in staged {
            for block in refl.push_const_blocks() {
                match idx_map.entry((block.offset, block.size)) {
                    Entry::Occupied(entry) => {
                        rv[*entry.get()].stage_flags |= stage_flags(stage);
                    },
                    Entry::Vacant(entry) => {
                        entry.insert(rv.len());
                        rv.push(vk::PushConstantRange {
                            stage_flags: stage_flags(stage),
                            offset: block.offset,
                            size: block.size,
                        });
                    },
                }
            }
        }
        rv
    }

    /// User inputs of the first vertex stage module ordered by location.
    fn vert_inputs(&self) -> Option<Vec<&InterfaceVariable>> {
        let (_, refl) = self.staged()?
            .into_iter()
            .find(|(stage, _)| *stage == Stage::Vertex)?;
        let mut inputs = refl.input_vars().iter()
            .filter(|x| !x.is_built_in)
            .collect::<Vec<_>>();
        inputs.sort_by_key(|x| x.location);
        Some(inputs)
    }
    /// Formats and byte sizes of the vertex inputs, in location order.
    fn vert_input_fmts(&self) -> Option<Vec<(u32, vk::Format, u32)>> {
        let inputs = self.vert_inputs()?;
        let mut rv = Vec::with_capacity(inputs.len());
        for input in inputs {
            let fmt = input.num_ty.as_ref()
                .map(num_ty2fmt)
                .unwrap_or(vk::Format::UNDEFINED);
            let nbyte = match fmt_nbyte(fmt) {
                Some(x) => x,
                None => {
                    warn!("vertex input '{}' has no attribute format", input.name);
                    return None;
                },
            };
            rv.push((input.location.unwrap_or(0), fmt, nbyte));
        }
        Some(rv)
    }
    /// A single interleaved per-vertex binding covering all vertex inputs.
    pub fn gather_vert_bind(&self, bind_point: u32) -> Option<vk::VertexInputBindingDescription> {
        let fmts = self.vert_input_fmts()?;
        let bind = vk::VertexInputBindingDescription {
            binding: bind_point,
            stride: fmts.iter().map(|x| x.2).sum(),
            input_rate: vk::VertexInputRate::VERTEX,
        };
        Some(bind)
    }
    /// Tightly packed attributes in location order.
    pub fn gather_vert_attrs(&self, bind_point: u32) -> Vec<vk::VertexInputAttributeDescription> {
        let fmts = match self.vert_input_fmts() {
            Some(x) => x,
            None => return Vec::new(),
        };
        let mut offset = 0;
        let mut rv = Vec::with_capacity(fmts.len());
        for (location, fmt, nbyte) in fmts {
            rv.push(vk::VertexInputAttributeDescription {
                location: location,
                binding: bind_point,
                format: fmt,
                offset: offset,
            });
            offset += nbyte;
        }
        rv
    }
    /// Vertex input names with any `prefix.` stripped, in location order.
    pub fn gather_vert_input_names(&self) -> Vec<String> {
        match self.vert_inputs() {
            Some(inputs) => inputs.into_iter()
                .map(|x| x.name.rsplit('.').next().unwrap_or("").to_owned())
                .collect(),
            None => Vec::new(),
        }
    }
}
