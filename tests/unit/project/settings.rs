use super::*;

#[test]
fn parses_original_field_names() {
    let json = r#"{
        "title": "Revision",
        "authors": ["alice", "bob"],
        "description": "a demo",
        "googleAnalyticsID": "UA-1",
        "previewImage": "https://example.com/p.png"
    }"#;
    let settings = ProjectSettings::from_reader(json.as_bytes()).unwrap();
    assert_eq!(settings.analytics_id, "UA-1");
    assert_eq!(settings.preview_image, "https://example.com/p.png");
    assert_eq!(settings.author_line(), "alice, bob");
    assert_eq!(settings.version, "0.0.0");
}

#[test]
fn empty_title_is_rejected() {
    let err = ProjectSettings::from_reader(r#"{"title": " "}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, NinError::Validation(_)));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = ProjectSettings::from_reader("{".as_bytes()).unwrap_err();
    assert!(matches!(err, NinError::Serde(_)));
}
