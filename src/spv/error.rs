use std::io;
use failure::Fail;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "spirv binary is corrupted")]
    CorruptedSpirv,
    #[fail(display = "spirv binary used unsupported feature")]
    UnsupportedSpirv,
    #[fail(display = "spirv binary declared no usable entry point")]
    MissingEntryPoint,
    #[fail(display = "spirv toolchain failed: {}", _0)]
    ToolchainFailure(String),
    #[fail(display = "{}", _0)]
    IoError(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(x: io::Error) -> Error { Error::IoError(x) }
}
