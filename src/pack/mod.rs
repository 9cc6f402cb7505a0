//! Artifact assembly: HTML templating, the runtime script contract, compression and output.

/// Writing `demo.html` and `demo.png.html`.
pub mod artifact;
/// Compressed hybrid artifact.
pub mod compress;
/// Template markers, metadata and the runtime script.
pub mod html;
