/// Transport encoding shared by the manifest builder and the runtime loader, plus the JS string
/// quoting used by every generated module.
pub mod encoding;
/// Error taxonomy.
pub mod error;
/// Relative path normalization for manifest keys.
pub mod paths;
