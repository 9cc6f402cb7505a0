use std::path::{Path, PathBuf};

use crate::foundation::error::{NinError, NinResult};

/// File name of the project settings document, relative to the project root.
pub const SETTINGS_FILE: &str = "project.json";

/// Directory conventions of a demo project.
///
/// ```text
/// <root>/project.json   settings
/// <root>/index.html     HTML template
/// <root>/res/           assets, packed into the asset manifest
/// <root>/lib/           third-party scripts
/// <root>/src/           project scripts
/// <root>/src/shaders/   per-effect shader overrides
/// <root>/gen/           generated modules (recreated every build)
/// <root>/bin/           build output
/// ```
#[derive(Clone, Debug)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Use `root` as a project directory. The directory must exist.
    pub fn open(root: impl Into<PathBuf>) -> NinResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(NinError::validation(format!(
                "project directory '{}' does not exist",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Asset tree packed into the manifest.
    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("res")
    }

    /// Project script sources.
    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    /// Project shader overrides, one subdirectory per effect.
    pub fn shaders_dir(&self) -> PathBuf {
        self.scripts_dir().join("shaders")
    }

    /// Project library scripts.
    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    /// Generated modules.
    pub fn gen_dir(&self) -> PathBuf {
        self.root.join("gen")
    }

    /// Build output.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// HTML template with substitution markers.
    pub fn template_path(&self) -> PathBuf {
        self.root.join("index.html")
    }

    /// Settings document.
    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }
}

/// Directory conventions of the engine runtime that every project links against.
///
/// ```text
/// <root>/runtime/lib/*.js           runtime libraries
/// <root>/runtime/*.js               engine core
/// <root>/shaders/<effect>/          built-in effects
/// <root>/shaders/default/           fallback uniforms/vertex/fragment
/// ```
#[derive(Clone, Debug)]
pub struct EngineLayout {
    root: PathBuf,
}

impl EngineLayout {
    /// Name of the built-in effect whose files back every missing shader artifact.
    pub const DEFAULT_EFFECT: &'static str = "default";

    /// Use `root` as the engine directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Engine root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runtime libraries, compiled first.
    pub fn runtime_lib_dir(&self) -> PathBuf {
        self.runtime_dir().join("lib")
    }

    /// Engine core sources.
    pub fn runtime_dir(&self) -> PathBuf {
        self.root.join("runtime")
    }

    /// Built-in effects.
    pub fn shaders_dir(&self) -> PathBuf {
        self.root.join("shaders")
    }

    /// Fallback shader artifacts.
    pub fn default_shader_dir(&self) -> PathBuf {
        self.shaders_dir().join(Self::DEFAULT_EFFECT)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/layout.rs"]
mod tests;
