use chrono::{DateTime, Utc};

use crate::assets::collect::Collected;
use crate::assets::optimize::{ImageOptimizer, RecompressOptimizer};
use crate::compiler::adapter::{CompileOutput, ConcatCompiler, ScriptCompiler};
use crate::foundation::error::NinResult;
use crate::pack::artifact::PackedArtifacts;
use crate::pack::compress::{ArtifactCompressor, PngPayloadCompressor};
use crate::pack::html::GRAPH_ASSET;
use crate::project::layout::{EngineLayout, ProjectLayout};
use crate::project::settings::ProjectSettings;
use crate::shaders::generate::ShaderManifest;

/// User-facing build switches.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Run PNG assets through the image optimizer.
    pub optimize_images: bool,
    /// Manifest key of the graph asset the bootstrap decodes.
    pub graph_key: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            optimize_images: false,
            graph_key: GRAPH_ASSET.to_string(),
        }
    }
}

/// Writes the generated project-settings module.
pub trait SettingsGenerator: Send + Sync {
    /// Generate into `project.gen_dir()`, which exists and is empty of settings output.
    fn generate(&self, project: &ProjectLayout, settings: &ProjectSettings) -> NinResult<()>;
}

/// External collaborators a build talks to.
pub struct BuildServices {
    /// Lossless image optimizer.
    pub optimizer: Box<dyn ImageOptimizer>,
    /// Script compiler.
    pub compiler: Box<dyn ScriptCompiler>,
    /// Compressed artifact producer.
    pub compressor: Box<dyn ArtifactCompressor>,
    /// Project-settings module generator.
    pub settings: Box<dyn SettingsGenerator>,
}

impl Default for BuildServices {
    fn default() -> Self {
        Self {
            optimizer: Box::new(RecompressOptimizer),
            compiler: Box::new(ConcatCompiler),
            compressor: Box::new(PngPayloadCompressor),
            settings: Box::new(crate::build::stages::SettingsModule),
        }
    }
}

/// State threaded through every stage. Products are filled in as stages complete.
pub struct BuildContext {
    /// Project being built.
    pub project: ProjectLayout,
    /// Engine it links against.
    pub engine: EngineLayout,
    /// Parsed `project.json`.
    pub settings: ProjectSettings,
    /// Build switches.
    pub options: BuildOptions,
    /// External collaborators.
    pub services: BuildServices,
    /// Build start time, stamped into metadata.
    pub started: DateTime<Utc>,

    /// Output of `collect-assets`.
    pub assets: Option<Collected>,
    /// Output of `generate-shaders`.
    pub shaders: Option<ShaderManifest>,
    /// Output of `compile-scripts`.
    pub compiled: Option<CompileOutput>,
    /// Output of `pack-artifacts`.
    pub artifacts: Option<PackedArtifacts>,
}

impl BuildContext {
    /// Fresh context with no products.
    pub fn new(
        project: ProjectLayout,
        engine: EngineLayout,
        settings: ProjectSettings,
        options: BuildOptions,
        services: BuildServices,
    ) -> Self {
        Self {
            project,
            engine,
            settings,
            options,
            services,
            started: Utc::now(),
            assets: None,
            shaders: None,
            compiled: None,
            artifacts: None,
        }
    }
}

/// One step of the build.
pub trait BuildStage {
    /// Stable stage name used in logs.
    fn name(&self) -> &'static str;
    /// Run to completion. Any error aborts the build.
    fn run(&self, ctx: &mut BuildContext) -> NinResult<()>;
}

/// Strictly sequential stage runner.
#[derive(Default)]
pub struct BuildPipeline {
    stages: Vec<Box<dyn BuildStage>>,
}

impl BuildPipeline {
    /// Empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn with_stage(mut self, stage: impl BuildStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in order, stopping at the first error.
    pub fn run(&self, ctx: &mut BuildContext) -> NinResult<()> {
        for stage in &self.stages {
            let span = tracing::info_span!("stage", name = stage.name());
            let _enter = span.enter();
            tracing::debug!("start");
            if let Err(e) = stage.run(ctx) {
                tracing::error!(error = %e, "stage failed; aborting build");
                return Err(e);
            }
            tracing::debug!("done");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/build/pipeline.rs"]
mod tests;
