use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::compiler::adapter::SourceFile;
use crate::foundation::error::NinResult;
use crate::project::layout::{EngineLayout, ProjectLayout};

/// Extension of script sources picked up by the build.
pub const SCRIPT_EXTENSION: &str = "js";

/// One `<dir>/*.js` entry of the source list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceGroup {
    /// Label used in logs.
    pub label: &'static str,
    /// Directory scanned (non-recursively).
    pub dir: PathBuf,
}

/// The fixed compile order: engine runtime libraries, engine core, project libraries, generated
/// modules, project sources.
pub fn source_groups(engine: &EngineLayout, project: &ProjectLayout) -> Vec<SourceGroup> {
    vec![
        SourceGroup {
            label: "engine-lib",
            dir: engine.runtime_lib_dir(),
        },
        SourceGroup {
            label: "engine",
            dir: engine.runtime_dir(),
        },
        SourceGroup {
            label: "project-lib",
            dir: project.lib_dir(),
        },
        SourceGroup {
            label: "project-gen",
            dir: project.gen_dir(),
        },
        SourceGroup {
            label: "project-src",
            dir: project.scripts_dir(),
        },
    ]
}

/// Read every source of every group, groups in order, files sorted by name within a group.
pub fn collect_sources(groups: &[SourceGroup]) -> NinResult<Vec<SourceFile>> {
    let mut out = Vec::new();
    for group in groups {
        let paths = list_scripts(&group.dir)?;
        tracing::debug!(group = group.label, count = paths.len(), "script sources");
        for path in paths {
            let src = std::fs::read_to_string(&path)
                .with_context(|| format!("read script '{}'", path.display()))?;
            out.push(SourceFile { path, src });
        }
    }
    Ok(out)
}

fn list_scripts(dir: &Path) -> NinResult<Vec<PathBuf>> {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return Ok(Vec::new());
    };

    let mut paths = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("list '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) != Some(SCRIPT_EXTENSION) {
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
#[path = "../../tests/unit/compiler/sources.rs"]
mod tests;
