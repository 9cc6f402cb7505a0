/// Directory conventions for projects and the engine runtime.
pub mod layout;
/// `project.json` settings.
pub mod settings;
