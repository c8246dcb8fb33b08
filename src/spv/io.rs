//! On-disk form of a module: the raw little-endian concatenation of its
//! words.
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use super::{SpirvBinary, Error, Result};

impl SpirvBinary {
    pub fn from_bytes(bytes: &[u8]) -> Result<SpirvBinary> {
        if bytes.len() & 3 != 0 { return Err(Error::CorruptedSpirv); }
        let mut words = vec![0u32; bytes.len() / 4];
        LittleEndian::read_u32_into(bytes, &mut words);
        SpirvBinary::from_words(words)
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.words().len() * 4];
        LittleEndian::write_u32_into(self.words(), &mut bytes);
        bytes
    }

    /// Load a module and detect its stage. Modules of unsupported execution
    /// models are rejected.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SpirvBinary> {
        let path = path.as_ref();
        let mut buf = Vec::new();
        File::open(path)?.read_to_end(&mut buf)?;
        let spv = SpirvBinary::from_bytes(&buf)?;
        debug!("loaded {} stage module from '{}'", spv.stage().short_name(),
            path.display());
        Ok(spv)
    }
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        File::create(path)?.write_all(&self.to_bytes())?;
        debug!("saved module to '{}'", path.display());
        Ok(())
    }
}
