use std::path::PathBuf;

use clap::Parser;
use shader_build_utils::ShaderPipeline;

/// The shaders this project ships, paired with the symbols their bytecode is exposed
/// under in the generated headers.
const SHADERS: &[(&str, &str)] = &[
    ("arrow_sdf.vert", "arrow_sdf_vert_spv"),
    ("arrow_sdf.frag", "arrow_sdf_frag_spv"),
    ("gradient.vert", "gradient_vert_spv"),
    ("gradient.frag", "gradient_frag_spv"),
];

#[derive(Parser, Debug)]
#[command(version, about)]
struct CompileShadersArgs {
    /// Directory holding the GLSL sources; binaries and headers are written next to them
    #[arg(long, default_value = "shaders")]
    shader_dir: PathBuf,

    /// Compiler executable to invoke
    #[arg(long, default_value = "glslangValidator")]
    compiler: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = CompileShadersArgs::parse();

    let mut pipeline = ShaderPipeline::new(&args.shader_dir).with_compiler(args.compiler);
    for (source, symbol) in SHADERS {
        pipeline = pipeline.add_shader(*source, *symbol);
    }

    let report = pipeline.run()?;

    println!();
    println!("{}", "=".repeat(60));
    println!("Shader compilation completed successfully!");
    println!("Generated files:");
    for path in report.artifacts.iter().chain(report.headers.iter()) {
        println!("  - {}", path.display());
    }
    println!("{}", "=".repeat(60));

    Ok(())
}
