//! Matrix layout conversion.
//!
//! Modules are disassembled into SPIR-V assembly, have every `ColMajor` or
//! `RowMajor` decoration token swapped, and are assembled again.
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use byteorder::{ByteOrder, LittleEndian};
use lazy_static::lazy_static;
use log::{debug, warn};
use super::{SpirvBinary, MatrixLayout, Error, Result};

impl MatrixLayout {
    /// Decoration token as it appears in disassembly.
    pub fn token(self) -> &'static str {
        match self {
            MatrixLayout::ColumnMajor => " ColMajor",
            MatrixLayout::RowMajor => " RowMajor",
        }
    }
}

/// Text form round trip of SPIR-V binaries.
pub trait Toolchain {
    fn disassemble(&self, words: &[u32]) -> Result<String>;
    fn assemble(&self, text: &str) -> Result<Vec<u32>>;
}

#[derive(Debug, Clone)]
pub struct ToolchainConfig {
    dis_path: PathBuf,
    as_path: PathBuf,
    target_env: String,
}
lazy_static! {
    static ref ENV_TOOLCHAIN_CFG: ToolchainConfig = ToolchainConfig::from_env();
}
impl ToolchainConfig {
    pub fn new() -> ToolchainConfig {
        ToolchainConfig {
            dis_path: PathBuf::from("spirv-dis"),
            as_path: PathBuf::from("spirv-as"),
            target_env: "vulkan1.3".to_owned(),
        }
    }
    /// Defaults overridden by `SPIRV_DIS`, `SPIRV_AS` and `SPIRV_TARGET_ENV`.
    pub fn from_env() -> ToolchainConfig {
        use std::env::var_os;
        let mut cfg = ToolchainConfig::new();
        if let Some(x) = var_os("SPIRV_DIS") { cfg.dis_path = x.into(); }
        if let Some(x) = var_os("SPIRV_AS") { cfg.as_path = x.into(); }
        if let Some(x) = var_os("SPIRV_TARGET_ENV").and_then(|x| x.into_string().ok()) {
            cfg.target_env = x;
        }
        cfg
    }
    pub fn with_dis_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dis_path = path.as_ref().to_owned();
        self
    }
    pub fn with_as_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.as_path = path.as_ref().to_owned();
        self
    }
    pub fn with_target_env(mut self, target_env: &str) -> Self {
        self.target_env = target_env.to_owned();
        self
    }
}
impl Default for ToolchainConfig {
    fn default() -> ToolchainConfig { ENV_TOOLCHAIN_CFG.clone() }
}

/// `spirv-dis` and `spirv-as` from SPIRV-Tools, driven through pipes.
#[derive(Debug, Clone, Default)]
pub struct SpirvTools {
    cfg: ToolchainConfig,
}
impl SpirvTools {
    pub fn new(cfg: ToolchainConfig) -> SpirvTools { SpirvTools { cfg: cfg } }

    fn run(&self, program: &Path, args: &[&str], input: Vec<u8>) -> Result<Vec<u8>> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let mut stdin = child.stdin.take()
            .ok_or_else(|| Error::ToolchainFailure("stdin is not captured".to_owned()))?;
        // Feed from another thread so neither side blocks on a full pipe.
        let feeder = thread::spawn(move || stdin.write_all(&input));
        let output = child.wait_with_output()?;
        match feeder.join() {
            Ok(res) => res?,
            Err(_) => return Err(Error::ToolchainFailure("stdin feeder panicked".to_owned())),
        }
        if !output.status.success() {
            let msg = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ToolchainFailure(format!("{} exited with {}: {}",
                program.display(), output.status, msg.trim())));
        }
        Ok(output.stdout)
    }
}
impl Toolchain for SpirvTools {
    fn disassemble(&self, words: &[u32]) -> Result<String> {
        let mut bytes = vec![0u8; words.len() * 4];
        LittleEndian::write_u32_into(words, &mut bytes);
        // Raw ids keep the numbering so the module reassembles identically.
        let text = self.run(&self.cfg.dis_path, &["--raw-id", "-"], bytes)?;
        String::from_utf8(text)
            .map_err(|_| Error::ToolchainFailure("disassembly is not utf-8".to_owned()))
    }
    fn assemble(&self, text: &str) -> Result<Vec<u32>> {
        let args = [
            "--preserve-numeric-ids",
            "--target-env", self.cfg.target_env.as_str(),
            "-o", "-",
            "-",
        ];
        let bytes = self.run(&self.cfg.as_path, &args, text.as_bytes().to_owned())?;
        if bytes.len() & 3 != 0 { return Err(Error::CorruptedSpirv); }
        let mut words = vec![0u32; bytes.len() / 4];
        LittleEndian::read_u32_into(&bytes, &mut words);
        Ok(words)
    }
}

pub struct LayoutConverter<T: Toolchain = SpirvTools> {
    toolchain: T,
}
impl LayoutConverter<SpirvTools> {
    /// Converter using SPIRV-Tools configured from the environment.
    pub fn new() -> LayoutConverter<SpirvTools> {
        LayoutConverter::with_toolchain(SpirvTools::default())
    }
}
impl<T: Toolchain> LayoutConverter<T> {
    pub fn with_toolchain(toolchain: T) -> LayoutConverter<T> {
        LayoutConverter { toolchain: toolchain }
    }
    fn try_convert(&self, words: &[u32], from: MatrixLayout, to: MatrixLayout) -> Result<Vec<u32>> {
        let text = self.toolchain.disassemble(words)?;
        let text = text.replace(from.token(), to.token());
        self.toolchain.assemble(&text)
    }
    /// Rewrite every `from` matrix layout decoration into `to`. An empty
    /// vector is returned if any step fails.
    pub fn convert(&self, words: &[u32], from: MatrixLayout, to: MatrixLayout) -> Vec<u32> {
        match self.try_convert(words, from, to) {
            Ok(x) => {
                debug!("converted {:?} module of {} words to {:?}", from, words.len(), to);
                x
            },
            Err(e) => {
                warn!("matrix layout conversion failed: {}", e);
                Vec::new()
            },
        }
    }
    pub fn to_row_major(&self, words: &[u32]) -> Vec<u32> {
        self.convert(words, MatrixLayout::ColumnMajor, MatrixLayout::RowMajor)
    }
    pub fn to_col_major(&self, words: &[u32]) -> Vec<u32> {
        self.convert(words, MatrixLayout::RowMajor, MatrixLayout::ColumnMajor)
    }
    /// Convert a module to `layout` and keep its declared stage.
    pub fn convert_binary(&self, spv: &SpirvBinary, layout: MatrixLayout) -> Option<SpirvBinary> {
        let words = match layout {
            MatrixLayout::RowMajor => self.to_row_major(spv.words()),
            MatrixLayout::ColumnMajor => self.to_col_major(spv.words()),
        };
        if words.is_empty() { return None; }
        Some(SpirvBinary::new(words, spv.stage()))
    }
}
