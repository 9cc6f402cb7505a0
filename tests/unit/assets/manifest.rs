use super::*;

#[test]
fn module_output_is_sorted_and_stable() {
    let mut a = AssetManifest::new();
    a.insert_bytes("z.json", b"{}").unwrap();
    a.insert_bytes("a/b.txt", b"hi").unwrap();

    let mut b = AssetManifest::new();
    b.insert_bytes("a/b.txt", b"hi").unwrap();
    b.insert_bytes("z.json", b"{}").unwrap();

    assert_eq!(a.to_module(), b.to_module());
    assert_eq!(
        a.to_module(),
        "FILES={};FILES[\"a/b.txt\"]='aGk=';FILES[\"z.json\"]='e30=';"
    );
}

#[test]
fn empty_manifest_still_declares_the_global() {
    assert_eq!(AssetManifest::new().to_module(), "FILES={};");
}

#[test]
fn keys_are_normalized_on_insert() {
    let mut m = AssetManifest::new();
    m.insert_bytes("music\\track.mp3", b"x").unwrap();
    assert!(m.contains("music/track.mp3"));
    assert!(m.insert_bytes("../escape.png", b"x").is_err());
}

#[test]
fn decode_round_trips_bytes() {
    let mut m = AssetManifest::new();
    let bytes: Vec<u8> = (0..=255).collect();
    m.insert_bytes("blob.bin", &bytes).unwrap();
    assert_eq!(m.decode("blob.bin").unwrap(), bytes);
    assert!(matches!(m.decode("missing.bin"), Err(NinError::Load(_))));
}

#[test]
fn keys_are_quoted_as_js_strings() {
    let mut m = AssetManifest::new();
    m.insert_bytes("it's \"q\".txt", b"").unwrap();
    m.insert_bytes("x</script>.txt", b"").unwrap();
    assert_eq!(
        m.to_module(),
        "FILES={};FILES[\"it's \\\"q\\\".txt\"]='';FILES[\"x<\\/script>.txt\"]='';"
    );
}
