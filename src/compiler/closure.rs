use std::io::{Read as _, Write as _};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::compiler::adapter::{CompileOutput, ScriptCompiler, SourceFile};
use crate::foundation::error::{NinError, NinResult};

/// Environment variable that overrides the Closure Compiler executable.
pub const CLOSURE_COMPILER_ENV: &str = "NIN_CLOSURE_COMPILER";

/// Options for [`ClosureCompiler`].
#[derive(Clone, Debug)]
pub struct ClosureCompilerOpts {
    /// Executable to spawn.
    pub program: PathBuf,
    /// Value of `--compilation_level`.
    pub compilation_level: String,
    /// Extra arguments appended verbatim.
    pub extra_args: Vec<String>,
}

impl Default for ClosureCompilerOpts {
    fn default() -> Self {
        let program = std::env::var_os(CLOSURE_COMPILER_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("google-closure-compiler"));
        Self {
            program,
            compilation_level: "SIMPLE".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// Adapter that runs Google Closure Compiler in JSON stream mode.
///
/// Sources are written to stdin as `[{"path":..,"src":..}]`, compiled files are read back from
/// stdout in the same shape, and diagnostics are parsed from stderr.
#[derive(Clone, Debug, Default)]
pub struct ClosureCompiler {
    opts: ClosureCompilerOpts,
}

#[derive(Serialize, Deserialize)]
struct StreamFile {
    path: String,
    src: String,
}

impl ClosureCompiler {
    /// Create a compiler with `opts`.
    pub fn new(opts: ClosureCompilerOpts) -> Self {
        Self { opts }
    }
}

impl ScriptCompiler for ClosureCompiler {
    fn name(&self) -> &'static str {
        "closure"
    }

    fn compile(&self, sources: &[SourceFile]) -> NinResult<CompileOutput> {
        let input = sources
            .iter()
            .map(|s| StreamFile {
                path: s.path.to_string_lossy().into_owned(),
                src: s.src.clone(),
            })
            .collect::<Vec<_>>();
        let input = serde_json::to_vec(&input)
            .map_err(|e| NinError::serde(format!("encode closure input: {e}")))?;

        let mut child = Command::new(&self.opts.program)
            .args(["--json_streams", "BOTH"])
            .args(["--compilation_level", &self.opts.compilation_level])
            .args(&self.opts.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                NinError::compile(format!(
                    "failed to spawn {} (is it installed and on PATH?): {e}",
                    self.opts.program.display()
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| NinError::compile("failed to open compiler stdin (unexpected)"))?;
        let feeder = std::thread::spawn(move || stdin.write_all(&input));

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| NinError::compile("failed to open compiler stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok::<_, std::io::Error>(stderr_bytes)
        });

        let mut stdout_bytes = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout
                .read_to_end(&mut stdout_bytes)
                .map_err(|e| NinError::compile(format!("read compiler stdout: {e}")))?;
        }

        let status = child
            .wait()
            .map_err(|e| NinError::compile(format!("failed to wait for compiler: {e}")))?;
        feeder
            .join()
            .map_err(|_| NinError::compile("compiler stdin feeder thread panicked"))?
            .map_err(|e| NinError::compile(format!("write compiler stdin: {e}")))?;
        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| NinError::compile("compiler stderr drain thread panicked"))?
            .map_err(|e| NinError::compile(format!("compiler stderr read failed: {e}")))?;

        let stderr = String::from_utf8_lossy(&stderr_bytes);
        let (warnings, mut errors) = parse_diagnostics(&stderr);

        let mut compiled_code = String::new();
        if status.success() || errors.is_empty() {
            match serde_json::from_slice::<Vec<StreamFile>>(&stdout_bytes) {
                Ok(files) => {
                    for f in files {
                        compiled_code.push_str(&f.src);
                    }
                }
                Err(e) if status.success() => {
                    return Err(NinError::compile(format!(
                        "compiler produced unreadable output: {e}"
                    )));
                }
                Err(_) => {}
            }
        }
        if !status.success() && errors.is_empty() {
            errors.push(format!(
                "compiler exited with status {}: {}",
                status,
                stderr.trim()
            ));
        }

        Ok(CompileOutput {
            compiled_code,
            warnings,
            errors,
        })
    }
}

/// Split Closure's stderr into `(warnings, errors)`.
///
/// A diagnostic starts at a line carrying `WARNING - ` or `ERROR - `; the source excerpt lines
/// that follow are attached to it. The trailing "N error(s), M warning(s)" summary is dropped.
pub fn parse_diagnostics(stderr: &str) -> (Vec<String>, Vec<String>) {
    enum Kind {
        Warning,
        Error,
    }

    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    let mut current: Option<(Kind, String)> = None;

    let mut flush = |cur: Option<(Kind, String)>| match cur {
        Some((Kind::Warning, text)) => warnings.push(text.trim_end().to_string()),
        Some((Kind::Error, text)) => errors.push(text.trim_end().to_string()),
        None => {}
    };

    for line in stderr.lines() {
        let kind = if line.contains("ERROR - ") {
            Some(Kind::Error)
        } else if line.contains("WARNING - ") {
            Some(Kind::Warning)
        } else {
            None
        };
        match kind {
            Some(kind) => {
                flush(current.take());
                current = Some((kind, line.to_string()));
            }
            None if is_summary_line(line) || line.trim().is_empty() => {
                flush(current.take());
            }
            None => {
                if let Some((_, text)) = current.as_mut() {
                    text.push('\n');
                    text.push_str(line);
                }
            }
        }
    }
    flush(current.take());

    (warnings, errors)
}

fn is_summary_line(line: &str) -> bool {
    let l = line.trim();
    l.ends_with("warning(s)") && l.contains("error(s)")
}

#[cfg(test)]
#[path = "../../tests/unit/compiler/closure.rs"]
mod tests;
