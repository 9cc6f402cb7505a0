use super::*;

#[test]
fn project_paths_follow_conventions() {
    let dir = std::env::temp_dir();
    let layout = ProjectLayout::open(&dir).unwrap();
    assert_eq!(layout.assets_dir(), dir.join("res"));
    assert_eq!(layout.shaders_dir(), dir.join("src").join("shaders"));
    assert_eq!(layout.gen_dir(), dir.join("gen"));
    assert_eq!(layout.bin_dir(), dir.join("bin"));
    assert_eq!(layout.settings_path(), dir.join("project.json"));
}

#[test]
fn open_rejects_missing_directory() {
    let missing = std::env::temp_dir().join("nin_layout_definitely_missing_dir");
    let err = ProjectLayout::open(&missing).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn engine_default_effect_lives_under_shaders() {
    let engine = EngineLayout::new("engine");
    assert_eq!(
        engine.default_shader_dir(),
        Path::new("engine").join("shaders").join("default")
    );
    assert_eq!(
        engine.runtime_lib_dir(),
        Path::new("engine").join("runtime").join("lib")
    );
}
