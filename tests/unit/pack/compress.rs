use chrono::TimeZone as _;

use super::*;
use crate::project::settings::ProjectSettings;

fn metadata() -> Metadata {
    let settings = ProjectSettings {
        title: "t".to_string(),
        ..Default::default()
    };
    Metadata::from_settings(&settings, chrono::Utc.timestamp_opt(0, 0).unwrap())
}

#[test]
fn payload_survives_png_round_trip() {
    let script = "GU=1;BEAN=0;BEAT=false;console.log('héllo');";
    let png = encode_payload_png(script.as_bytes()).unwrap();
    assert_eq!(decode_payload_png(&png).unwrap(), script.as_bytes());
}

#[test]
fn dimensions_cover_payload() {
    for len in [0usize, 1, 2, 15, 16, 17, 1000] {
        let (w, h) = payload_dimensions(len);
        assert!((w as usize) * (h as usize) >= len.max(1));
        assert!(w >= 1 && h >= 1);
    }
}

#[test]
fn artifact_starts_with_png_and_ends_with_loader() {
    let out = PngPayloadCompressor
        .compress("x=1;", "<title>t</title>", &metadata())
        .unwrap();
    assert!(out.starts_with(&[0x89, b'P', b'N', b'G']));
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("<title>t</title>"));
    assert!(text.ends_with("new Uint8Array(b)))\">"));
    // The leading PNG still decodes despite the trailing HTML.
    assert_eq!(decode_payload_png(&out).unwrap(), b"x=1;");
}

#[test]
fn nul_bytes_are_rejected() {
    let err = PngPayloadCompressor
        .compress("a\0b", "", &metadata())
        .unwrap_err();
    assert!(matches!(err, NinError::Compress(_)));
}
