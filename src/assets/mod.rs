/// Asset tree traversal and manifest assembly.
pub mod collect;
/// Encoded asset manifest.
pub mod manifest;
/// Lossless image optimizers.
pub mod optimize;
