use std::path::{Component, Path};

use crate::foundation::error::{NinError, NinResult};

/// Normalize and validate user-supplied root-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`). Backslashes are treated as separators.
pub fn normalize_rel_path(source: &str) -> NinResult<String> {
    normalize_segments(source, &source.replace('\\', "/"))
}

/// Validate a key that is already `/`-separated, such as one produced by [`to_rel_key`].
///
/// Unlike [`normalize_rel_path`], a backslash stays part of the file name.
pub fn normalize_rel_key(key: &str) -> NinResult<String> {
    normalize_segments(key, key)
}

fn normalize_segments(source: &str, s: &str) -> NinResult<String> {
    if s.starts_with('/') {
        return Err(NinError::validation(format!(
            "asset path '{source}' must be relative"
        )));
    }
    if s.is_empty() {
        return Err(NinError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(NinError::validation(format!(
                "asset path '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(NinError::validation(format!(
            "asset path '{source}' must contain a file name"
        )));
    }

    Ok(out.join("/"))
}

/// Turn a file found under `root` into its manifest key.
///
/// The key is the relative path's components joined with `/`. Names are taken verbatim, so a
/// file called `a\b.txt` keeps its backslash, and a name that is not valid UTF-8 is rejected
/// rather than keyed lossily.
pub fn to_rel_key(root: &Path, path: &Path) -> NinResult<String> {
    let rel = path.strip_prefix(root).map_err(|_| {
        NinError::validation(format!(
            "'{}' is not under '{}'",
            path.display(),
            root.display()
        ))
    })?;

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(name) => {
                let name = name.to_str().ok_or_else(|| {
                    NinError::validation(format!(
                        "asset path '{}' is not valid UTF-8",
                        path.display()
                    ))
                })?;
                parts.push(name);
            }
            Component::CurDir => {}
            _ => {
                return Err(NinError::validation(format!(
                    "asset path '{}' must stay inside '{}'",
                    path.display(),
                    root.display()
                )));
            }
        }
    }

    if parts.is_empty() {
        return Err(NinError::validation(format!(
            "'{}' must name a file under '{}'",
            path.display(),
            root.display()
        )));
    }
    Ok(parts.join("/"))
}

/// Lowercased file extension of a manifest key, if it has one.
pub fn extension_of(key: &str) -> Option<String> {
    let name = key.rsplit('/').next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/paths.rs"]
mod tests;
