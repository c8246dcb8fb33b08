use ash::vk;
use failure::Fail;
use crate::spv;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "vulkan call failed with {:?}", _0)]
    VulkanError(vk::Result),
    #[fail(display = "shader reflection yielded no usable {}", _0)]
    EmptyReflection(&'static str),
    #[fail(display = "{}", _0)]
    SpirvError(#[cause] spv::Error),
}

impl From<vk::Result> for Error {
    fn from(x: vk::Result) -> Error { Error::VulkanError(x) }
}
impl From<spv::Error> for Error {
    fn from(x: spv::Error) -> Error { Error::SpirvError(x) }
}
