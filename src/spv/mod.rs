//! SPIR-V Reflection
//!
//! Load, reflect and rewrite SPIR-V binary modules.
pub(crate) mod consts;
mod parse;
mod error;
mod io;
mod reflect;
mod convert;
#[cfg(test)]
pub(crate) mod testing;

use consts::*;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
pub use parse::{Instrs, Instr, Operands};
pub use reflect::*;
pub use convert::*;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage of a module. Discriminants are the SPIR-V execution model
/// numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
pub enum Stage {
    Vertex = 0,
    TessControl = 1,
    TessEval = 2,
    Geometry = 3,
    Fragment = 4,
    Compute = 5,
}
impl Stage {
    /// `None` for execution models that have no pipeline stage here, like
    /// OpenCL kernels or ray tracing stages.
    pub fn from_exec_model(exec_model: u32) -> Option<Stage> {
        Stage::from_u32(exec_model)
    }
    pub fn exec_model(self) -> u32 { self as u32 }
    pub fn short_name(self) -> &'static str {
        match self {
            Stage::Vertex => "vert",
            Stage::TessControl => "tesc",
            Stage::TessEval => "tese",
            Stage::Geometry => "geom",
            Stage::Fragment => "frag",
            Stage::Compute => "comp",
        }
    }
}

/// Instructions of a whole module with the header checked and skipped.
pub fn instrs<'a>(words: &'a [u32]) -> Result<Instrs<'a>> {
    if words.len() < HEADER_LEN || words[0] != SPIRV_MAGIC {
        return Err(Error::CorruptedSpirv);
    }
    Ok(Instrs::new(&words[HEADER_LEN..]))
}

/// Stage of the first entry point declared by the module.
pub fn detect_stage(words: &[u32]) -> Result<Stage> {
    for instr in instrs(words)? {
        let instr = instr?;
        match instr.opcode() {
            OP_ENTRY_POINT => {
                let exec_model = instr.operands().read_u32()?;
                return Stage::from_exec_model(exec_model)
                    .ok_or(Error::UnsupportedSpirv);
            },
            // Entry points are declared way before any function body.
            OP_FUNCTION => break,
            _ => {},
        }
    }
    Err(Error::MissingEntryPoint)
}

/// A compiled module and the stage it is meant for. Immutable once built.
#[derive(Debug, Clone)]
pub struct SpirvBinary {
    words: Vec<u32>,
    stage: Stage,
}
impl SpirvBinary {
    /// Wrap words with a declared stage. The words are not validated until
    /// they are reflected.
    pub fn new(words: Vec<u32>, stage: Stage) -> SpirvBinary {
        SpirvBinary { words: words, stage: stage }
    }
    /// Wrap words and take the stage from the first entry point.
    pub fn from_words(words: Vec<u32>) -> Result<SpirvBinary> {
        let stage = detect_stage(&words)?;
        Ok(SpirvBinary::new(words, stage))
    }

    pub fn words(&self) -> &[u32] { &self.words }
    pub fn into_words(self) -> Vec<u32> { self.words }
    pub fn stage(&self) -> Stage { self.stage }
    pub fn instrs<'a>(&'a self) -> Result<Instrs<'a>> { instrs(&self.words) }
    pub fn reflect(&self) -> Result<ShaderReflection> {
        ShaderReflection::reflect(&self.words)
    }
}
