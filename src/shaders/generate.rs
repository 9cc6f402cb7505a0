use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::encoding::js_string_literal;
use crate::foundation::error::{NinError, NinResult};
use crate::project::layout::EngineLayout;

/// Global the generated shader module assigns into.
pub const SHADERS_GLOBAL: &str = "SHADERS";

/// The three files every effect is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderArtifact {
    /// `uniforms.json`
    Uniforms,
    /// `vertex.glsl`
    Vertex,
    /// `fragment.glsl`
    Fragment,
}

impl ShaderArtifact {
    /// All artifacts, in module output order.
    pub const ALL: [ShaderArtifact; 3] = [Self::Uniforms, Self::Vertex, Self::Fragment];

    /// File name inside an effect directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Uniforms => "uniforms.json",
            Self::Vertex => "vertex.glsl",
            Self::Fragment => "fragment.glsl",
        }
    }
}

/// Which directory listing contributed an effect name. Either way the effect's files are read
/// from the project, falling back to the engine default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectOwner {
    /// Found under the project's shader directory.
    Project,
    /// Found only under the engine's shader directory.
    Engine,
}

/// Where a single artifact was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderOrigin {
    /// The project's directory for the effect.
    Own,
    /// The engine's `default` effect.
    Default,
}

/// A resolved effect.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderEffect {
    /// Owner of the effect name.
    pub owner: EffectOwner,
    /// Uniform schema.
    pub uniforms: serde_json::Value,
    /// GLSL vertex source.
    pub vertex_shader: String,
    /// GLSL fragment source.
    pub fragment_shader: String,
    /// Origin of uniforms, vertex and fragment, in that order.
    pub origins: [ShaderOrigin; 3],
}

impl ShaderEffect {
    /// Origin of one artifact.
    pub fn origin(&self, artifact: ShaderArtifact) -> ShaderOrigin {
        match artifact {
            ShaderArtifact::Uniforms => self.origins[0],
            ShaderArtifact::Vertex => self.origins[1],
            ShaderArtifact::Fragment => self.origins[2],
        }
    }
}

/// Effect name to resolved effect, sorted by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShaderManifest {
    effects: BTreeMap<String, ShaderEffect>,
}

impl ShaderManifest {
    /// Resolved effect for `name`.
    pub fn get(&self, name: &str) -> Option<&ShaderEffect> {
        self.effects.get(name)
    }

    /// Effect names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(String::as_str)
    }

    /// Number of effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// `true` when no effects were found.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Render as a script module, one assignment per effect:
    ///
    /// ```text
    /// SHADERS={};
    /// SHADERS["glow"]={uniforms:{..},vertexShader:"..",fragmentShader:".."};
    /// ```
    pub fn to_module(&self) -> NinResult<String> {
        let mut out = format!("{SHADERS_GLOBAL}={{}};\n");
        for (name, effect) in &self.effects {
            out.push_str(&format!(
                "{SHADERS_GLOBAL}[{}]={{uniforms:{},vertexShader:{},fragmentShader:{}}};\n",
                js_string_literal(name),
                serde_json::to_string(&effect.uniforms)
                    .map_err(|e| NinError::serde(format!("uniforms of '{name}': {e}")))?,
                js_string_literal(&effect.vertex_shader),
                js_string_literal(&effect.fragment_shader),
            ));
        }
        Ok(out)
    }
}

/// Discover and resolve every effect.
///
/// Effect names come from the immediate subdirectories of `project_dir`, then of `engine_dir`.
/// A name present in both is owned by the project and resolved once. Engine directories only
/// contribute names: each artifact is read from `project_dir/<name>/<file>` when it exists, else
/// from `engine_dir/default/<file>`. Missing directories count as empty.
#[tracing::instrument(level = "debug")]
pub fn generate_shaders(project_dir: &Path, engine_dir: &Path) -> NinResult<ShaderManifest> {
    let default_dir = engine_dir.join(EngineLayout::DEFAULT_EFFECT);

    let mut discovered = list_effect_names(project_dir)?
        .into_iter()
        .map(|n| (n, EffectOwner::Project))
        .collect::<Vec<_>>();
    discovered.extend(
        list_effect_names(engine_dir)?
            .into_iter()
            .map(|n| (n, EffectOwner::Engine)),
    );

    let mut owners = BTreeMap::<String, EffectOwner>::new();
    for (name, owner) in discovered {
        if let Some(existing) = owners.get(&name) {
            tracing::debug!(effect = %name, ?existing, ignored = ?owner, "effect shadowed");
            continue;
        }
        owners.insert(name, owner);
    }

    let mut effects = BTreeMap::new();
    for (name, owner) in owners {
        let own_dir = project_dir.join(&name);
        tracing::debug!(effect = %name, ?owner, "compiling shader");
        let effect = resolve_effect(&name, owner, &own_dir, &default_dir)?;
        effects.insert(name, effect);
    }

    Ok(ShaderManifest { effects })
}

fn resolve_effect(
    name: &str,
    owner: EffectOwner,
    own_dir: &Path,
    default_dir: &Path,
) -> NinResult<ShaderEffect> {
    let (uniforms_src, uniforms_origin) =
        resolve_artifact(own_dir, default_dir, ShaderArtifact::Uniforms)?;
    let (vertex_shader, vertex_origin) =
        resolve_artifact(own_dir, default_dir, ShaderArtifact::Vertex)?;
    let (fragment_shader, fragment_origin) =
        resolve_artifact(own_dir, default_dir, ShaderArtifact::Fragment)?;

    let uniforms = serde_json::from_str(&uniforms_src)
        .map_err(|e| NinError::validation(format!("uniforms.json of effect '{name}': {e}")))?;

    Ok(ShaderEffect {
        owner,
        uniforms,
        vertex_shader,
        fragment_shader,
        origins: [uniforms_origin, vertex_origin, fragment_origin],
    })
}

fn resolve_artifact(
    own_dir: &Path,
    default_dir: &Path,
    artifact: ShaderArtifact,
) -> NinResult<(String, ShaderOrigin)> {
    let own = own_dir.join(artifact.file_name());
    let (path, origin) = if own.is_file() {
        (own, ShaderOrigin::Own)
    } else {
        let fallback = default_dir.join(artifact.file_name());
        if !fallback.is_file() {
            return Err(NinError::validation(format!(
                "no {} in '{}' and no engine default at '{}'",
                artifact.file_name(),
                own_dir.display(),
                fallback.display()
            )));
        }
        (fallback, ShaderOrigin::Default)
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("read shader source '{}'", path.display()))?;
    Ok((text, origin))
}

fn list_effect_names(dir: &Path) -> NinResult<Vec<String>> {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return Ok(Vec::new());
    };

    let mut names = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("list shader directory '{}'", dir.display()))?;
        let path: PathBuf = entry.path();
        if !path.is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
#[path = "../../tests/unit/shaders/generate.rs"]
mod tests;
