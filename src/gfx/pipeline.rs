use ash::vk;
use log::info;
use crate::spv::{SpirvBinary, Stage};
use super::error::Error;
use super::query::{ReflectionIndex, stage_flags};
use super::layout::{PipelineLayoutConfig, PipelineLayoutDesc};
use super::vertex::VertexInputState;
use super::uniform::UniformBlockView;
use super::Result;

/// Reflected interface of a set of shader modules forming one pipeline.
pub struct PipelineInterface {
    index: ReflectionIndex,
    layout: PipelineLayoutDesc,
    vert_input: Option<VertexInputState>,
    stages: Vec<(Stage, vk::ShaderStageFlags)>,
}
impl PipelineInterface {
    pub fn new(
        spvs: &[SpirvBinary],
        vert_bind_point: u32,
        cfg: PipelineLayoutConfig,
    ) -> Result<PipelineInterface> {
        let index = ReflectionIndex::new(spvs);
        let layout = PipelineLayoutDesc::new(&index, cfg)
            .ok_or(Error::EmptyReflection("pipeline layout"))?;
        let stages = index.stages()
            .into_iter()
            .map(|stage| stage.map(|x| (x, stage_flags(x))))
            .collect::<Option<Vec<_>>>()
            .ok_or(Error::EmptyReflection("shader stage"))?;
        let vert_input = if stages.iter().any(|(x, _)| *x == Stage::Vertex) {
            let state = VertexInputState::new(&index, vert_bind_point)
                .ok_or(Error::EmptyReflection("vertex input"))?;
            Some(state)
        } else { None };
        info!("reflected pipeline interface of {} stages", stages.len());
        let pipe = PipelineInterface {
            index: index,
            layout: layout,
            vert_input: vert_input,
            stages: stages,
        };
        Ok(pipe)
    }

    pub fn index(&self) -> &ReflectionIndex { &self.index }
    pub fn layout(&self) -> &PipelineLayoutDesc { &self.layout }
    /// `None` for pipelines without a vertex stage.
    pub fn vert_input(&self) -> Option<&VertexInputState> { self.vert_input.as_ref() }
    pub fn stages(&self) -> &[(Stage, vk::ShaderStageFlags)] { &self.stages }
    pub fn stage_flags(&self) -> vk::ShaderStageFlags {
        self.stages.iter()
            .fold(vk::ShaderStageFlags::empty(), |acc, (_, x)| acc | *x)
    }
    pub fn uniform_block(&self, name: &str) -> UniformBlockView {
        UniformBlockView::new(&self.index, name)
    }
}
