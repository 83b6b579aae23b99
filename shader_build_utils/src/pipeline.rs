use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::compiler::{GlslCompiler, ShaderCompilerError};
use crate::header::render_header;

struct ShaderUnit {
    source: String,
    symbol: String,
}

/// Paths of everything a successful run produced, in unit order.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub artifacts: Vec<PathBuf>,
    pub headers: Vec<PathBuf>,
}

/// Sequential compile-then-pack pipeline over a fixed set of shader sources.
///
/// Units run in the order they were added. The first failure aborts the whole run,
/// so console output stays readable and nothing downstream sees half-built files.
pub struct ShaderPipeline {
    tool: String,
    shader_dir: PathBuf,
    units: Vec<ShaderUnit>,
}

impl ShaderPipeline {
    pub fn new(shader_dir: impl AsRef<Path>) -> Self {
        Self {
            tool: GlslCompiler::DEFAULT_TOOL.to_owned(),
            shader_dir: shader_dir.as_ref().to_path_buf(),
            units: vec![],
        }
    }

    /// Overrides the compiler executable probed at the start of `run`.
    pub fn with_compiler(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Queues `source` (relative to the shader directory) for compilation, with its
    /// packed bytecode exposed under `symbol`.
    pub fn add_shader(mut self, source: impl Into<String>, symbol: impl Into<String>) -> Self {
        self.units.push(ShaderUnit {
            source: source.into(),
            symbol: symbol.into(),
        });
        self
    }

    /// Checks the tool once, compiles every unit, then packs every artifact into its
    /// header. Every configured source is validated before the first compile so a bad
    /// configuration never leaves partial output behind.
    pub fn run(self) -> anyhow::Result<PipelineReport> {
        let compiler = GlslCompiler::locate(&self.tool)?;

        for unit in &self.units {
            let source = self.shader_dir.join(&unit.source);
            if !source.exists() {
                return Err(ShaderCompilerError::SourceFileMissing(source).into());
            }
        }

        println!("Compiling Vulkan shaders to SPIR-V...");
        let mut report = PipelineReport::default();
        for unit in &self.units {
            let source = self.shader_dir.join(&unit.source);
            println!("Compiling {}...", unit.source);
            let artifact = compiler.compile(&source)?;
            println!("  -> {}", artifact.display());
            report.artifacts.push(artifact);
        }

        println!();
        println!("Generating C header files...");
        for (unit, artifact) in self.units.iter().zip(&report.artifacts) {
            let header = pack_artifact(unit, artifact)?;
            report.headers.push(header);
        }

        Ok(report)
    }
}

fn pack_artifact(unit: &ShaderUnit, artifact: &Path) -> anyhow::Result<PathBuf> {
    let bytes = fs::read(artifact)
        .with_context(|| format!("Could not read compiled shader {:?}", artifact))?;

    let origin = artifact
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| artifact.display().to_string());

    let header_path = artifact.with_extension("h");
    println!("Generating {}...", header_path.display());
    let text = render_header(&unit.symbol, &origin, &bytes);
    fs::write(&header_path, text)
        .with_context(|| format!("Could not write header {:?}", header_path))?;
    println!("  -> {}", header_path.display());

    Ok(header_path)
}
