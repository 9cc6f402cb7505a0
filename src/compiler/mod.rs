//! Script compiler adapters.
//!
//! The build only relies on the [`adapter::ScriptCompiler`] contract: named sources in, compiled
//! code plus classified diagnostics out.

/// Compiler contract and the passthrough compiler.
pub mod adapter;
/// Google Closure Compiler process adapter.
pub mod closure;
/// Fixed, ordered source list fed to the compiler.
pub mod sources;
