use std::path::PathBuf;

use crate::foundation::error::NinResult;

/// One named script source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// Path the source was read from; used to name it in diagnostics.
    pub path: PathBuf,
    /// Source text.
    pub src: String,
}

/// Result of a compiler run that did not fail to execute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompileOutput {
    /// Compiled code. Meaningless when `errors` is non-empty.
    pub compiled_code: String,
    /// Warning diagnostics.
    pub warnings: Vec<String>,
    /// Error diagnostics.
    pub errors: Vec<String>,
}

/// Classification of a [`CompileOutput`]; exactly one applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompileOutcome {
    /// No diagnostics.
    Success,
    /// Warnings but no errors; the build continues.
    WarningsOnly,
    /// At least one error; the build aborts.
    Errors,
}

impl CompileOutput {
    /// Classify the diagnostics.
    pub fn classify(&self) -> CompileOutcome {
        if !self.errors.is_empty() {
            CompileOutcome::Errors
        } else if !self.warnings.is_empty() {
            CompileOutcome::WarningsOnly
        } else {
            CompileOutcome::Success
        }
    }
}

/// External script compiler / minifier.
///
/// `Err` is reserved for failures to run the compiler at all; diagnostics about the sources go
/// into [`CompileOutput`].
pub trait ScriptCompiler: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;
    /// Compile `sources`, in order, into one script.
    fn compile(&self, sources: &[SourceFile]) -> NinResult<CompileOutput>;
}

/// Compiler that concatenates sources unchanged. Used for debug builds and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConcatCompiler;

impl ScriptCompiler for ConcatCompiler {
    fn name(&self) -> &'static str {
        "concat"
    }

    fn compile(&self, sources: &[SourceFile]) -> NinResult<CompileOutput> {
        let mut compiled_code = String::new();
        for s in sources {
            compiled_code.push_str(&s.src);
            if !s.src.ends_with('\n') {
                compiled_code.push('\n');
            }
        }
        Ok(CompileOutput {
            compiled_code,
            ..Default::default()
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compiler/adapter.rs"]
mod tests;
