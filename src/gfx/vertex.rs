use ash::vk;
use log::warn;
use super::query::ReflectionIndex;

/// Vertex input of a pipeline whose vertex inputs are interleaved in a single
/// per-vertex buffer.
#[derive(Debug, Clone)]
pub struct VertexInputState {
    binds: Vec<vk::VertexInputBindingDescription>,
    attrs: Vec<vk::VertexInputAttributeDescription>,
    names: Vec<String>,
}
impl VertexInputState {
    /// `None` if the reflected inputs can't be laid out. A vertex stage
    /// without user inputs has no binding at all.
    pub fn new(index: &ReflectionIndex, bind_point: u32) -> Option<VertexInputState> {
        let bind = index.gather_vert_bind(bind_point)?;
        let attrs = index.gather_vert_attrs(bind_point);
        if bind.stride == 0 {
            let state = VertexInputState {
                binds: Vec::new(),
                attrs: Vec::new(),
                names: Vec::new(),
            };
            return Some(state);
        }
        if attrs.is_empty() {
            warn!("vertex binding {} has no attribute", bind_point);
            return None;
        }
        let state = VertexInputState {
            binds: vec![bind],
            attrs: attrs,
            names: index.gather_vert_input_names(),
        };
        Some(state)
    }

    pub fn bind(&self) -> Option<&vk::VertexInputBindingDescription> { self.binds.first() }
    pub fn stride(&self) -> u32 { self.bind().map(|x| x.stride).unwrap_or(0) }
    pub fn attrs(&self) -> &[vk::VertexInputAttributeDescription] { &self.attrs }
    /// Input names matching `attrs` one to one.
    pub fn attr_names(&self) -> &[String] { &self.names }
    pub fn create_info(&self) -> vk::PipelineVertexInputStateCreateInfoBuilder<'_> {
        vk::PipelineVertexInputStateCreateInfo::builder()
            .vertex_binding_descriptions(&self.binds)
            .vertex_attribute_descriptions(&self.attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spv::{SpirvBinary, Stage};
    use crate::spv::consts::*;
    use crate::spv::testing::{vert_spv, frag_spv, SpirvBuilder};

    #[test]
    fn test_interleaved() {
        let index = ReflectionIndex::new(&[
            SpirvBinary::new(vert_spv(), Stage::Vertex),
            SpirvBinary::new(frag_spv(), Stage::Fragment),
        ]);
        let state = VertexInputState::new(&index, 0).unwrap();
        assert_eq!(state.stride(), 32);
        assert_eq!(state.attrs().len(), 3);
        assert_eq!(state.attr_names(), &["position", "color", "uv"]);
        let offsets = state.attrs().iter().map(|x| x.offset).collect::<Vec<_>>();
        assert!(offsets.windows(2).all(|x| x[0] < x[1]));

        let create_info = state.create_info();
        assert_eq!(create_info.vertex_binding_description_count, 1);
        assert_eq!(create_info.vertex_attribute_description_count, 3);
    }
    #[test]
    fn test_no_user_input() {
        let mut b = SpirvBuilder::new();
        let i32_ty = b.ty_int(32, true);
        let vert_idx = b.var(i32_ty, STORE_CLS_INPUT);
        // `gl_VertexIndex`
        b.deco(vert_idx, DECO_BUILT_IN, &[42]);
        b.entry_point(0, "main", &[vert_idx]);
        let index = ReflectionIndex::new(&[SpirvBinary::new(b.build(), Stage::Vertex)]);
        let state = VertexInputState::new(&index, 0).unwrap();
        assert!(state.bind().is_none());
        assert!(state.attrs().is_empty());
        assert_eq!(state.create_info().vertex_binding_description_count, 0);
    }
    #[test]
    fn test_matrix_input_has_no_format() {
        let mut b = SpirvBuilder::new();
        let f32_ty = b.ty_float(32);
        let vec4_ty = b.ty_vec(f32_ty, 4);
        let mat4_ty = b.ty_mat(vec4_ty, 4);
        let model = b.var(mat4_ty, STORE_CLS_INPUT);
        b.name(model, "model");
        b.deco(model, DECO_LOCATION, &[0]);
        b.entry_point(0, "main", &[model]);
        let index = ReflectionIndex::new(&[SpirvBinary::new(b.build(), Stage::Vertex)]);
        assert!(index.gather_vert_bind(0).is_none());
        assert!(VertexInputState::new(&index, 0).is_none());
    }
}
