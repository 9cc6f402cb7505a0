//! nin packs interactive demo projects into single-file HTML artifacts.
//!
//! A build walks the project's asset tree into an encoded [`AssetManifest`], resolves shader
//! effects into a [`ShaderManifest`], runs a [`ScriptCompiler`] over the engine and project
//! sources, and writes an uncompressed and a compressed artifact. At runtime the [`Loader`]
//! resolves asset requests from the embedded manifest, or over the network when none is present.
//!
//! - Build a project with [`compile_project`]
//! - Load assets at runtime through [`Loader::batch`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Asset collection, manifest and image optimization.
pub mod assets;
/// Stage pipeline and `compile_project`.
pub mod build;
/// Script compiler adapters.
pub mod compiler;
/// Errors, transport encoding and path helpers.
pub mod foundation;
/// Runtime loader.
pub mod loader;
/// Artifact packing.
pub mod pack;
/// Project and engine directory conventions, project settings.
pub mod project;
/// Shader module generation.
pub mod shaders;

pub use crate::foundation::error::{NinError, NinResult};

pub use crate::assets::collect::{CollectOptions, CollectReport, Collected, collect_assets};
pub use crate::assets::manifest::AssetManifest;
pub use crate::assets::optimize::{
    ImageOptimizer, NoopOptimizer, OptipngOptimizer, RecompressOptimizer, default_optimizer,
};
pub use crate::build::orchestrator::{BuildReport, compile_project};
pub use crate::build::pipeline::{
    BuildContext, BuildOptions, BuildPipeline, BuildServices, BuildStage, SettingsGenerator,
};
pub use crate::compiler::adapter::{
    CompileOutcome, CompileOutput, ConcatCompiler, ScriptCompiler, SourceFile,
};
pub use crate::compiler::closure::{ClosureCompiler, ClosureCompilerOpts};
pub use crate::loader::batch::{
    BatchSettlement, DrainHandle, FailedLoad, LoadBatch, LoadRequest, LoadTarget, Loader,
    LoaderConfig, MediaConsumer, MediaSource, ResolutionMode,
};
pub use crate::loader::fetch::{Fetcher, MemoryFetcher};
#[cfg(feature = "http")]
pub use crate::loader::fetch::HttpFetcher;
pub use crate::loader::texture::Texture;
pub use crate::pack::artifact::{PackedArtifacts, pack_artifacts};
pub use crate::pack::compress::{ArtifactCompressor, PngPayloadCompressor};
pub use crate::pack::html::Metadata;
pub use crate::project::layout::{EngineLayout, ProjectLayout};
pub use crate::project::settings::ProjectSettings;
pub use crate::shaders::generate::{ShaderManifest, generate_shaders};
