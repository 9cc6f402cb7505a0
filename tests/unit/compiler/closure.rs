use super::*;

#[test]
fn diagnostics_are_split_by_severity() {
    let stderr = "\
src/demo.js:3:4: WARNING - [JSC_UNUSED] unused variable x
  var x = 1;
      ^
src/demo.js:9:0: ERROR - [JSC_PARSE_ERROR] Parse error. ';' expected
  foo bar
      ^

1 error(s), 1 warning(s)
";
    let (warnings, errors) = parse_diagnostics(stderr);
    assert_eq!(warnings.len(), 1);
    assert_eq!(errors.len(), 1);
    assert!(warnings[0].starts_with("src/demo.js:3:4: WARNING"));
    assert!(warnings[0].contains("var x = 1;"));
    assert!(errors[0].contains("Parse error"));
    assert!(!errors[0].contains("error(s)"));
}

#[test]
fn clean_output_has_no_diagnostics() {
    let (warnings, errors) = parse_diagnostics("");
    assert!(warnings.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn missing_executable_fails_to_run() {
    let compiler = ClosureCompiler::new(ClosureCompilerOpts {
        program: PathBuf::from("nin-test-no-such-closure-compiler"),
        ..Default::default()
    });
    let err = compiler.compile(&[]).unwrap_err();
    assert!(matches!(err, NinError::Compile(_)));
}
