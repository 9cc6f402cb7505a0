use anyhow::Context as _;

use crate::assets::collect::{CollectOptions, collect_assets};
use crate::build::pipeline::{BuildContext, BuildPipeline, BuildStage, SettingsGenerator};
use crate::compiler::adapter::CompileOutcome;
use crate::compiler::sources::{collect_sources, source_groups};
use crate::foundation::error::{NinError, NinResult};
use crate::pack::artifact::{PackInput, pack_artifacts};
use crate::pack::html::{Metadata, render_preamble};
use crate::project::layout::ProjectLayout;
use crate::project::settings::ProjectSettings;
use crate::shaders::generate::generate_shaders;

/// Generated asset module.
pub const ASSET_MODULE: &str = "files.js";
/// Generated settings module.
pub const SETTINGS_MODULE: &str = "settings.js";
/// Generated shader module.
pub const SHADER_MODULE: &str = "shaders.js";

/// The standard build, in order.
pub fn standard_pipeline() -> BuildPipeline {
    BuildPipeline::new()
        .with_stage(CollectAssets)
        .with_stage(ResetGenDir)
        .with_stage(WriteAssetModule)
        .with_stage(GenerateSettings)
        .with_stage(GenerateShaders)
        .with_stage(CompileScripts)
        .with_stage(PackArtifacts)
}

/// Walk `res/` into the asset manifest.
pub struct CollectAssets;

impl BuildStage for CollectAssets {
    fn name(&self) -> &'static str {
        "collect-assets"
    }

    fn run(&self, ctx: &mut BuildContext) -> NinResult<()> {
        let opts = CollectOptions {
            optimize_images: ctx.options.optimize_images,
        };
        let collected = collect_assets(
            &ctx.project.assets_dir(),
            &opts,
            ctx.services.optimizer.as_ref(),
        )?;
        ctx.assets = Some(collected);
        Ok(())
    }
}

/// Destroy and recreate `gen/`.
pub struct ResetGenDir;

impl BuildStage for ResetGenDir {
    fn name(&self) -> &'static str {
        "reset-gen-dir"
    }

    fn run(&self, ctx: &mut BuildContext) -> NinResult<()> {
        let gen_dir = ctx.project.gen_dir();
        if gen_dir.exists() {
            std::fs::remove_dir_all(&gen_dir)
                .with_context(|| format!("remove '{}'", gen_dir.display()))?;
        }
        std::fs::create_dir_all(&gen_dir)
            .with_context(|| format!("create '{}'", gen_dir.display()))?;
        Ok(())
    }
}

/// Persist the asset manifest as `gen/files.js`.
pub struct WriteAssetModule;

impl BuildStage for WriteAssetModule {
    fn name(&self) -> &'static str {
        "write-asset-module"
    }

    fn run(&self, ctx: &mut BuildContext) -> NinResult<()> {
        let collected = ctx
            .assets
            .as_ref()
            .ok_or_else(|| NinError::validation("asset manifest not collected yet"))?;
        let path = ctx.project.gen_dir().join(ASSET_MODULE);
        std::fs::write(&path, collected.manifest.to_module())
            .with_context(|| format!("write '{}'", path.display()))?;
        Ok(())
    }
}

/// Hand off to the settings generator.
pub struct GenerateSettings;

impl BuildStage for GenerateSettings {
    fn name(&self) -> &'static str {
        "generate-settings"
    }

    fn run(&self, ctx: &mut BuildContext) -> NinResult<()> {
        ctx.services.settings.generate(&ctx.project, &ctx.settings)
    }
}

/// Default [`SettingsGenerator`]: `gen/settings.js` assigning the settings JSON to
/// `PROJECT_SETTINGS`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SettingsModule;

impl SettingsGenerator for SettingsModule {
    fn generate(&self, project: &ProjectLayout, settings: &ProjectSettings) -> NinResult<()> {
        let json = serde_json::to_string(settings)
            .map_err(|e| NinError::serde(format!("encode project settings: {e}")))?;
        let path = project.gen_dir().join(SETTINGS_MODULE);
        std::fs::write(&path, format!("PROJECT_SETTINGS={json};\n"))
            .with_context(|| format!("write '{}'", path.display()))?;
        Ok(())
    }
}

/// Resolve effects and persist `gen/shaders.js`.
pub struct GenerateShaders;

impl BuildStage for GenerateShaders {
    fn name(&self) -> &'static str {
        "generate-shaders"
    }

    fn run(&self, ctx: &mut BuildContext) -> NinResult<()> {
        let manifest = generate_shaders(&ctx.project.shaders_dir(), &ctx.engine.shaders_dir())?;
        let path = ctx.project.gen_dir().join(SHADER_MODULE);
        std::fs::write(&path, manifest.to_module()?)
            .with_context(|| format!("write '{}'", path.display()))?;
        tracing::info!(effects = manifest.len(), "generated shader module");
        ctx.shaders = Some(manifest);
        Ok(())
    }
}

/// Feed the ordered source list to the script compiler and act on its verdict.
pub struct CompileScripts;

impl BuildStage for CompileScripts {
    fn name(&self) -> &'static str {
        "compile-scripts"
    }

    fn run(&self, ctx: &mut BuildContext) -> NinResult<()> {
        let sources = collect_sources(&source_groups(&ctx.engine, &ctx.project))?;
        let compiler = ctx.services.compiler.as_ref();
        tracing::info!(
            compiler = compiler.name(),
            sources = sources.len(),
            "running script compiler"
        );
        let out = compiler.compile(&sources)?;

        match out.classify() {
            CompileOutcome::Errors => {
                for e in &out.errors {
                    tracing::error!("{e}");
                }
                for w in &out.warnings {
                    tracing::warn!("{w}");
                }
                return Err(NinError::compile(out.errors.join("\n")));
            }
            CompileOutcome::WarningsOnly => {
                for w in &out.warnings {
                    tracing::warn!("{w}");
                }
            }
            CompileOutcome::Success => {}
        }

        ctx.compiled = Some(out);
        Ok(())
    }
}

/// Render the template and write both artifacts into `bin/`.
pub struct PackArtifacts;

impl BuildStage for PackArtifacts {
    fn name(&self) -> &'static str {
        "pack-artifacts"
    }

    fn run(&self, ctx: &mut BuildContext) -> NinResult<()> {
        let compiled = ctx
            .compiled
            .as_ref()
            .ok_or_else(|| NinError::validation("scripts not compiled yet"))?;

        let template_path = ctx.project.template_path();
        let template = std::fs::read_to_string(&template_path).map_err(|e| {
            NinError::validation(format!(
                "read HTML template '{}': {e}",
                template_path.display()
            ))
        })?;

        let metadata = Metadata::from_settings(&ctx.settings, ctx.started);
        let preamble = render_preamble(&template, &ctx.settings, &metadata);

        let packed = pack_artifacts(
            &ctx.project.bin_dir(),
            PackInput {
                compiled_code: &compiled.compiled_code,
                preamble: &preamble,
                metadata: &metadata,
                graph_key: &ctx.options.graph_key,
            },
            ctx.services.compressor.as_ref(),
        )?;
        ctx.artifacts = Some(packed);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/build/stages.rs"]
mod tests;
