//! Build orchestration.
//!
//! A build is an ordered list of [`pipeline::BuildStage`]s run by [`pipeline::BuildPipeline`]
//! against one [`pipeline::BuildContext`]. Stages never overlap and the first error stops the
//! build.

/// `compile_project` entry point and report.
pub mod orchestrator;
/// Stage contract, context and sequencer.
pub mod pipeline;
/// The standard stages.
pub mod stages;
