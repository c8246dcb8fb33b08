use ash::vk;
use ash::version::DeviceV1_0;
use log::{debug, info, warn};
use super::query::{ReflectionIndex, ResourceBinding};
use super::Result;

/// Set layouts are made for every set number up to the highest one used.
const MAX_DESC_SET_COUNT: u32 = 32;

#[derive(Default, Clone)]
pub struct PipelineLayoutConfig {
    set_layout_flags: vk::DescriptorSetLayoutCreateFlags,
    pipe_layout_flags: vk::PipelineLayoutCreateFlags,
    no_push_consts: bool,
}
impl PipelineLayoutConfig {
    pub fn new() -> Self { Default::default() }
    /// Flags of every descriptor set layout, like `PUSH_DESCRIPTOR_KHR`.
    pub fn with_set_layout_flags(mut self, flags: vk::DescriptorSetLayoutCreateFlags) -> Self {
        self.set_layout_flags |= flags;
        self
    }
    pub fn with_pipe_layout_flags(mut self, flags: vk::PipelineLayoutCreateFlags) -> Self {
        self.pipe_layout_flags |= flags;
        self
    }
    /// Leave reflected push constant ranges out of the layout.
    pub fn without_push_consts(mut self) -> Self {
        self.no_push_consts = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct DescriptorSetLayoutDesc {
    pub set: u32,
    pub binds: Vec<ResourceBinding>,
}

/// Everything needed to create a pipeline layout from reflection.
#[derive(Clone)]
pub struct PipelineLayoutDesc {
    cfg: PipelineLayoutConfig,
    // Indexed by set number; unused sets in between have no binding.
    set_layouts: Vec<DescriptorSetLayoutDesc>,
    vk_binds: Vec<Vec<vk::DescriptorSetLayoutBinding>>,
    push_const_rngs: Vec<vk::PushConstantRange>,
}
impl PipelineLayoutDesc {
    /// `None` if the modules could not be reflected.
    pub fn new(index: &ReflectionIndex, cfg: PipelineLayoutConfig) -> Option<PipelineLayoutDesc> {
        if index.is_empty() { return None; }
        let binds = index.gather_desc_binds();
        let nset = binds.iter()
            .map(|x| x.set.saturating_add(1))
            .max()
            .unwrap_or(0);
        if nset > MAX_DESC_SET_COUNT {
            warn!("descriptor set {} is out of range", nset - 1);
            return None;
        }
        let mut set_layouts = (0..nset)
            .map(|set| DescriptorSetLayoutDesc { set: set, binds: Vec::new() })
            .collect::<Vec<_>>();
        for bind in binds {
            set_layouts[bind.set as usize].binds.push(bind);
        }
        let vk_binds: Vec<Vec<vk::DescriptorSetLayoutBinding>> = set_layouts.iter()
            .map(|x| x.binds.iter().map(ResourceBinding::to_vk).collect())
            .collect();
        let push_const_rngs = if cfg.no_push_consts {
            Vec::new()
        } else {
            index.gather_push_const_rngs()
        };
        debug!("pipeline layout has {} descriptor sets and {} push constant ranges",
            set_layouts.len(), push_const_rngs.len());
        let desc = PipelineLayoutDesc {
            cfg: cfg,
            set_layouts: set_layouts,
            vk_binds: vk_binds,
            push_const_rngs: push_const_rngs,
        };
        Some(desc)
    }

    pub fn set_layouts(&self) -> &[DescriptorSetLayoutDesc] { &self.set_layouts }
    pub fn push_const_rngs(&self) -> &[vk::PushConstantRange] { &self.push_const_rngs }
    pub fn set_layout_create_info(&self, set: usize) -> Option<vk::DescriptorSetLayoutCreateInfoBuilder<'_>> {
        let binds = self.vk_binds.get(set)?;
        let create_info = vk::DescriptorSetLayoutCreateInfo::builder()
            .flags(self.cfg.set_layout_flags)
            .bindings(binds);
        Some(create_info)
    }

    /// Create the descriptor set layouts and the pipeline layout on `dev`.
    pub fn create(&self, dev: &ash::Device) -> Result<PipelineLayout> {
        // Handles created so far are destroyed if any creation fails.
        let mut layout = PipelineLayout {
            dev: dev.clone(),
            set_layouts: Vec::with_capacity(self.vk_binds.len()),
            handle: vk::PipelineLayout::null(),
        };
        for set in 0..self.vk_binds.len() {
            if let Some(create_info) = self.set_layout_create_info(set) {
                let handle = unsafe { dev.create_descriptor_set_layout(&create_info, None)? };
                layout.set_layouts.push(handle);
            }
        }
        let create_info = vk::PipelineLayoutCreateInfo::builder()
            .flags(self.cfg.pipe_layout_flags)
            .set_layouts(&layout.set_layouts)
            .push_constant_ranges(&self.push_const_rngs);
        layout.handle = unsafe { dev.create_pipeline_layout(&create_info, None)? };
        info!("created pipeline layout with {} descriptor sets", layout.set_layouts.len());
        Ok(layout)
    }
}

pub struct PipelineLayout {
    dev: ash::Device,
    set_layouts: Vec<vk::DescriptorSetLayout>,
    handle: vk::PipelineLayout,
}
impl PipelineLayout {
    pub fn handle(&self) -> vk::PipelineLayout { self.handle }
    pub fn set_layouts(&self) -> &[vk::DescriptorSetLayout] { &self.set_layouts }
}
impl Drop for PipelineLayout {
    fn drop(&mut self) {
        unsafe {
            if self.handle != vk::PipelineLayout::null() {
                self.dev.destroy_pipeline_layout(self.handle, None);
            }
            for set_layout in self.set_layouts.drain(..) {
                self.dev.destroy_descriptor_set_layout(set_layout, None);
            }
        }
        info!("destroyed pipeline layout");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spv::{SpirvBinary, Stage};
    use crate::spv::consts::*;
    use crate::spv::testing::{vert_spv, frag_spv, comp_spv, init_logger, SpirvBuilder};

    #[test]
    fn test_single_set() {
        let index = ReflectionIndex::new(&[
            SpirvBinary::new(vert_spv(), Stage::Vertex),
            SpirvBinary::new(frag_spv(), Stage::Fragment),
        ]);
        let desc = PipelineLayoutDesc::new(&index, PipelineLayoutConfig::new()).unwrap();
        assert_eq!(desc.set_layouts().len(), 1);
        let binds = &desc.set_layouts()[0].binds;
        assert_eq!(binds.iter().map(|x| x.bind_point).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(desc.push_const_rngs().len(), 1);

        let create_info = desc.set_layout_create_info(0).unwrap();
        assert_eq!(create_info.binding_count, 3);
        let create_info = create_info.build();
        let vk_binds = unsafe {
            std::slice::from_raw_parts(create_info.p_bindings, create_info.binding_count as usize)
        };
        assert_eq!(vk_binds[2].descriptor_type, vk::DescriptorType::COMBINED_IMAGE_SAMPLER);
        assert_eq!(vk_binds[2].descriptor_count, 4);
        assert_eq!(vk_binds[0].stage_flags,
            vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT);
        assert!(desc.set_layout_create_info(1).is_none());
    }
    #[test]
    fn test_set_gap() {
        let index = ReflectionIndex::new(&[SpirvBinary::new(comp_spv(), Stage::Compute)]);
        let cfg = PipelineLayoutConfig::new()
            .with_set_layout_flags(vk::DescriptorSetLayoutCreateFlags::UPDATE_AFTER_BIND_POOL_EXT)
            .without_push_consts();
        let desc = PipelineLayoutDesc::new(&index, cfg).unwrap();
        let set_layouts = desc.set_layouts();
        assert_eq!(set_layouts.len(), 3);
        assert_eq!(set_layouts.iter().map(|x| x.set).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(set_layouts[0].binds.len(), 1);
        assert!(set_layouts[1].binds.is_empty());
        assert_eq!(set_layouts[2].binds[0].desc_ty, vk::DescriptorType::STORAGE_BUFFER);
        assert_eq!(set_layouts[2].binds[0].ndesc, 1);
        let create_info = desc.set_layout_create_info(2).unwrap();
        assert_eq!(create_info.flags, vk::DescriptorSetLayoutCreateFlags::UPDATE_AFTER_BIND_POOL_EXT);
        assert!(desc.push_const_rngs().is_empty());
    }
    #[test]
    fn test_invalid_index() {
        let index = ReflectionIndex::new(&[SpirvBinary::new(vec![0; 5], Stage::Vertex)]);
        assert!(PipelineLayoutDesc::new(&index, PipelineLayoutConfig::new()).is_none());
    }
    #[test]
    fn test_set_out_of_range() {
        init_logger();
        for &set in [32, u32::MAX].iter() {
            let mut b = SpirvBuilder::new();
            let f32_ty = b.ty_float(32);
            let img_ty = b.ty_image(f32_ty, DIM_IMAGE_2D, IMG_STORAGE);
            let target = b.var(img_ty, STORE_CLS_UNIFORM_CONSTANT);
            b.deco(target, DECO_DESCRIPTOR_SET, &[set]);
            b.deco(target, DECO_BINDING, &[0]);
            b.entry_point(5, "main", &[]);
            let index = ReflectionIndex::new(&[SpirvBinary::new(b.build(), Stage::Compute)]);
            assert_eq!(index.gather_desc_binds()[0].set, set);
            assert!(PipelineLayoutDesc::new(&index, PipelineLayoutConfig::new()).is_none());
        }
    }
}
