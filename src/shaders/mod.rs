/// Effect discovery, per-artifact resolution and the generated shader module.
pub mod generate;
