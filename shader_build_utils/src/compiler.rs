use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShaderCompilerError {
    #[error("{tool} not found in PATH or in the Vulkan SDK\nInstall the Vulkan SDK or add {tool} to your PATH\nVulkan SDK: https://vulkan.lunarg.com/")]
    ToolNotFound { tool: String },

    #[error("Shader file not found: {}", .0.display())]
    SourceFileMissing(PathBuf),

    #[error("Failed to compile {}:\n{diagnostics}", .source_file.display())]
    CompilationFailed {
        source_file: PathBuf,
        diagnostics: String,
    },
}

/// Handle to the external GLSL to SPIR-V compiler executable.
///
/// `locate` probes the tool with `--version` before anything else runs, so a missing
/// Vulkan SDK is reported up front instead of failing on the first shader.
pub struct GlslCompiler {
    executable: PathBuf,
}

impl GlslCompiler {
    pub const DEFAULT_TOOL: &'static str = "glslangValidator";

    /// Finds a runnable compiler, trying `tool` as given first and falling back to
    /// `$VULKAN_SDK/bin/<tool>` when the SDK is installed but not on PATH.
    pub fn locate(tool: &str) -> Result<Self, ShaderCompilerError> {
        let mut candidates = vec![PathBuf::from(tool)];
        if let Ok(sdk) = std::env::var("VULKAN_SDK") {
            candidates.push(Path::new(&sdk).join("bin").join(tool));
        }

        for candidate in candidates {
            if responds_to_version(&candidate) {
                debug!("using shader compiler {:?}", candidate);
                return Ok(Self {
                    executable: candidate,
                });
            }
        }

        Err(ShaderCompilerError::ToolNotFound {
            tool: tool.to_owned(),
        })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Compiles a GLSL source into a SPIR-V binary written next to it and returns the
    /// artifact path. The tool's diagnostics are captured, never echoed while it runs.
    pub fn compile(&self, source: &Path) -> Result<PathBuf, ShaderCompilerError> {
        if !source.exists() {
            return Err(ShaderCompilerError::SourceFileMissing(
                source.to_path_buf(),
            ));
        }

        let artifact = artifact_path(source);
        let output = Command::new(&self.executable)
            .arg("-V")
            .arg(source)
            .arg("-o")
            .arg(&artifact)
            .output()
            .map_err(|_| ShaderCompilerError::ToolNotFound {
                tool: self.executable.to_string_lossy().into_owned(),
            })?;

        if !output.status.success() {
            return Err(ShaderCompilerError::CompilationFailed {
                source_file: source.to_path_buf(),
                diagnostics: diagnostics(&output),
            });
        }

        Ok(artifact)
    }
}

/// The compiled binary lands next to its source, with `.spv` appended to the full
/// file name (`gradient.frag` becomes `gradient.frag.spv`).
fn artifact_path(source: &Path) -> PathBuf {
    let mut name = source.as_os_str().to_owned();
    name.push(".spv");
    PathBuf::from(name)
}

fn responds_to_version(executable: &Path) -> bool {
    Command::new(executable)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

// glslangValidator reports compile errors on stdout, so fall back to it when stderr is empty.
fn diagnostics(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout).into_owned()
    } else {
        stderr.into_owned()
    }
}
