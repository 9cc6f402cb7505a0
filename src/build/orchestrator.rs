use std::path::{Path, PathBuf};

use crate::build::pipeline::{BuildContext, BuildOptions, BuildServices};
use crate::build::stages::standard_pipeline;
use crate::compiler::adapter::CompileOutcome;
use crate::foundation::error::{NinError, NinResult};
use crate::project::layout::{EngineLayout, ProjectLayout};
use crate::project::settings::ProjectSettings;

/// Summary of a successful build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildReport {
    /// `bin/demo.html`
    pub html_path: PathBuf,
    /// `bin/demo.png.html`
    pub compressed_path: PathBuf,
    /// Number of packed assets.
    pub assets: usize,
    /// Bytes saved by image optimization.
    pub optimized_bytes_saved: usize,
    /// Assets packed unoptimized after an optimizer failure.
    pub optimizer_fallbacks: Vec<String>,
    /// Number of shader effects.
    pub shader_effects: usize,
    /// Compiler verdict (never `Errors` in a report).
    pub compile_outcome: CompileOutcome,
    /// Compiler warnings.
    pub warnings: Vec<String>,
}

/// Build the project at `project_root` against the engine at `engine_root`.
///
/// Runs the standard stages in order; the first failing stage aborts the build and its error is
/// returned unchanged (compiler errors surface as [`NinError::Compile`]).
#[tracing::instrument(level = "info", skip(options, services), fields(project = %project_root.display()))]
pub fn compile_project(
    project_root: &Path,
    engine_root: &Path,
    options: BuildOptions,
    services: BuildServices,
) -> NinResult<BuildReport> {
    let project = ProjectLayout::open(project_root)?;
    let engine = EngineLayout::new(engine_root);
    let settings = ProjectSettings::from_path(project.settings_path())?;

    let mut ctx = BuildContext::new(project, engine, settings, options, services);
    standard_pipeline().run(&mut ctx)?;
    report_from(ctx)
}

fn report_from(ctx: BuildContext) -> NinResult<BuildReport> {
    let missing = |what: &str| NinError::validation(format!("build finished without {what}"));
    let artifacts = ctx.artifacts.ok_or_else(|| missing("artifacts"))?;
    let assets = ctx.assets.ok_or_else(|| missing("assets"))?;
    let shaders = ctx.shaders.ok_or_else(|| missing("shaders"))?;
    let compiled = ctx.compiled.ok_or_else(|| missing("compiled code"))?;

    Ok(BuildReport {
        html_path: artifacts.html_path,
        compressed_path: artifacts.compressed_path,
        assets: assets.manifest.len(),
        optimized_bytes_saved: assets.report.bytes_saved(),
        optimizer_fallbacks: assets.report.fallbacks,
        shader_effects: shaders.len(),
        compile_outcome: compiled.classify(),
        warnings: compiled.warnings,
    })
}
