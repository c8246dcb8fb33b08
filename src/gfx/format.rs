//! Vertex attribute formats of reflected numeric types.
use ash::vk;
use crate::spv::NumericType;

/// Format of a scalar or vector stage input. Matrices and unusual widths map
/// to `UNDEFINED`.
pub fn num_ty2fmt(num_ty: &NumericType) -> vk::Format {
    if num_ty.is_mat() { return vk::Format::UNDEFINED; }
    let fmts = match (num_ty.nbyte(), num_ty.is_float(), num_ty.is_sint()) {
        (2, true, _) => [
            vk::Format::R16_SFLOAT, vk::Format::R16G16_SFLOAT,
            vk::Format::R16G16B16_SFLOAT, vk::Format::R16G16B16A16_SFLOAT,
        ],
        (2, false, true) => [
            vk::Format::R16_SINT, vk::Format::R16G16_SINT,
            vk::Format::R16G16B16_SINT, vk::Format::R16G16B16A16_SINT,
        ],
        (2, false, false) => [
            vk::Format::R16_UINT, vk::Format::R16G16_UINT,
            vk::Format::R16G16B16_UINT, vk::Format::R16G16B16A16_UINT,
        ],
        (4, true, _) => [
            vk::Format::R32_SFLOAT, vk::Format::R32G32_SFLOAT,
            vk::Format::R32G32B32_SFLOAT, vk::Format::R32G32B32A32_SFLOAT,
        ],
        (4, false, true) => [
            vk::Format::R32_SINT, vk::Format::R32G32_SINT,
            vk::Format::R32G32B32_SINT, vk::Format::R32G32B32A32_SINT,
        ],
        (4, false, false) => [
            vk::Format::R32_UINT, vk::Format::R32G32_UINT,
            vk::Format::R32G32B32_UINT, vk::Format::R32G32B32A32_UINT,
        ],
        (8, true, _) => [
            vk::Format::R64_SFLOAT, vk::Format::R64G64_SFLOAT,
            vk::Format::R64G64B64_SFLOAT, vk::Format::R64G64B64A64_SFLOAT,
        ],
        (8, false, true) => [
            vk::Format::R64_SINT, vk::Format::R64G64_SINT,
            vk::Format::R64G64B64_SINT, vk::Format::R64G64B64A64_SINT,
        ],
        (8, false, false) => [
            vk::Format::R64_UINT, vk::Format::R64G64_UINT,
            vk::Format::R64G64B64_UINT, vk::Format::R64G64B64A64_UINT,
        ],
        _ => return vk::Format::UNDEFINED,
    };
    match num_ty.nrow() {
        n @ 1..=4 => fmts[n as usize - 1],
        _ => vk::Format::UNDEFINED,
    }
}

/// Byte size of one element of `fmt`. Only the 16, 32 and 64-bit integer and
/// float formats with one to four components are known.
pub fn fmt_nbyte(fmt: vk::Format) -> Option<u32> {
    let nbyte = match fmt {
        vk::Format::R16_UINT | vk::Format::R16_SINT | vk::Format::R16_SFLOAT => 2,
        vk::Format::R16G16_UINT | vk::Format::R16G16_SINT | vk::Format::R16G16_SFLOAT => 4,
        vk::Format::R16G16B16_UINT | vk::Format::R16G16B16_SINT | vk::Format::R16G16B16_SFLOAT => 6,
        vk::Format::R16G16B16A16_UINT | vk::Format::R16G16B16A16_SINT | vk::Format::R16G16B16A16_SFLOAT => 8,
        vk::Format::R32_UINT | vk::Format::R32_SINT | vk::Format::R32_SFLOAT => 4,
        vk::Format::R32G32_UINT | vk::Format::R32G32_SINT | vk::Format::R32G32_SFLOAT => 8,
        vk::Format::R32G32B32_UINT | vk::Format::R32G32B32_SINT | vk::Format::R32G32B32_SFLOAT => 12,
        vk::Format::R32G32B32A32_UINT | vk::Format::R32G32B32A32_SINT | vk::Format::R32G32B32A32_SFLOAT => 16,
        vk::Format::R64_UINT | vk::Format::R64_SINT | vk::Format::R64_SFLOAT => 8,
        vk::Format::R64G64_UINT | vk::Format::R64G64_SINT | vk::Format::R64G64_SFLOAT => 16,
        vk::Format::R64G64B64_UINT | vk::Format::R64G64B64_SINT | vk::Format::R64G64B64_SFLOAT => 24,
        vk::Format::R64G64B64A64_UINT | vk::Format::R64G64B64A64_SINT | vk::Format::R64G64B64A64_SFLOAT => 32,
        _ => return None,
    };
    Some(nbyte)
}
