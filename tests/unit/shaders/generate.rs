use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "nin_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn module_quotes_sources_like_the_asset_module() {
    let root = temp_dir("shaders_quoting");
    let default = root.join("engine").join("default");
    std::fs::create_dir_all(&default).unwrap();
    std::fs::write(default.join("uniforms.json"), "{}").unwrap();
    std::fs::write(default.join("vertex.glsl"), "void main(){}\n").unwrap();
    std::fs::write(default.join("fragment.glsl"), "// </script> \"x\"").unwrap();

    let module = generate_shaders(&root.join("project"), &root.join("engine"))
        .unwrap()
        .to_module()
        .unwrap();
    assert!(module.contains(&format!(
        "fragmentShader:{}",
        js_string_literal("// </script> \"x\"")
    )));
    assert!(module.contains("vertexShader:\"void main(){}\\n\""));
    assert!(!module.contains("</script>"));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn missing_directories_yield_no_effects() {
    let root = temp_dir("shaders_missing");
    let out = generate_shaders(&root.join("project"), &root.join("engine")).unwrap();
    assert!(out.is_empty());
    assert_eq!(out.to_module().unwrap(), "SHADERS={};\n");
}

#[test]
fn missing_default_artifact_is_a_validation_error() {
    let root = temp_dir("shaders_no_default");
    std::fs::create_dir_all(root.join("project").join("glow")).unwrap();

    let err = generate_shaders(&root.join("project"), &root.join("engine")).unwrap_err();
    assert!(matches!(err, NinError::Validation(_)));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn invalid_uniforms_are_rejected() {
    let root = temp_dir("shaders_bad_uniforms");
    let default = root.join("engine").join("default");
    std::fs::create_dir_all(&default).unwrap();
    std::fs::write(default.join("uniforms.json"), "{not json").unwrap();
    std::fs::write(default.join("vertex.glsl"), "void main(){}").unwrap();
    std::fs::write(default.join("fragment.glsl"), "void main(){}").unwrap();

    let err = generate_shaders(&root.join("project"), &root.join("engine")).unwrap_err();
    assert!(err.to_string().contains("uniforms.json of effect 'default'"));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn stray_files_are_not_effects() {
    let root = temp_dir("shaders_stray_files");
    let project = root.join("project");
    std::fs::create_dir_all(&project).unwrap();
    std::fs::write(project.join("README.md"), "notes").unwrap();

    assert!(list_effect_names(&project).unwrap().is_empty());

    std::fs::remove_dir_all(&root).ok();
}
