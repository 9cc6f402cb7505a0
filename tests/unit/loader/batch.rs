use std::sync::Mutex;

use super::*;
use crate::loader::fetch::MemoryFetcher;

fn manifest(entries: &[(&str, &str)]) -> Arc<AssetManifest> {
    let mut m = AssetManifest::new();
    for (k, v) in entries {
        m.insert_bytes(k, v.as_bytes()).unwrap();
    }
    Arc::new(m)
}

#[derive(Clone, Default)]
struct Recorder {
    sources: Arc<Mutex<Vec<MediaSource>>>,
}

impl MediaConsumer for Recorder {
    fn load(&mut self, source: &MediaSource) -> NinResult<()> {
        self.sources.lock().unwrap().push(source.clone());
        Ok(())
    }
}

struct Broken;

impl MediaConsumer for Broken {
    fn load(&mut self, _source: &MediaSource) -> NinResult<()> {
        Err(NinError::load("element error"))
    }
}

fn collect_progress() -> (Arc<Mutex<Vec<f64>>>, impl FnMut(f64) + Send + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |p| sink.lock().unwrap().push(p))
}

#[test]
fn empty_batch_completes_immediately() {
    let loader = Loader::with_fetcher(LoaderConfig::default(), Arc::new(MemoryFetcher::new()));
    let completions = Arc::new(Mutex::new(0));
    let c = Arc::clone(&completions);
    let (progress, on_progress) = collect_progress();

    let handle = loader
        .batch()
        .start(on_progress, move |_| *c.lock().unwrap() += 1)
        .unwrap();

    assert!(handle.is_finished());
    assert_eq!(*completions.lock().unwrap(), 1);
    let settlement = handle.wait().unwrap();
    assert_eq!(settlement.total, 0);
    assert!(settlement.is_success());
    assert!(progress.lock().unwrap().is_empty());
}

#[test]
fn embedded_raw_text_and_media() {
    let loader = Loader::with_fetcher(
        LoaderConfig {
            root_path: String::new(),
            embedded: Some(manifest(&[("a.json", "{\"k\":1}"), ("img/b.png", "png")])),
        },
        Arc::new(MemoryFetcher::new()),
    );
    let text = Arc::new(Mutex::new(None));
    let t = Arc::clone(&text);
    let recorder = Recorder::default();
    let loaded = Arc::new(Mutex::new(false));
    let l = Arc::clone(&loaded);

    let mut batch = loader.batch();
    batch.load_raw_text("a.json", move |s| *t.lock().unwrap() = Some(s));
    batch.load_media_with("img/b.png", recorder.clone(), move || *l.lock().unwrap() = true);
    assert_eq!(batch.len(), 2);

    let handle = batch.start(|_| {}, |_| {}).unwrap();
    assert_eq!(handle.mode(), ResolutionMode::Embedded);
    let settlement = handle.wait().unwrap();

    assert!(settlement.is_success());
    assert_eq!(text.lock().unwrap().as_deref(), Some("{\"k\":1}"));
    assert!(*loaded.lock().unwrap());
    let sources = recorder.sources.lock().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].uri, "data:image/png;base64,cG5n");
    assert_eq!(sources[0].kind, Some(MediaKind::Image));
    assert!(!sources[0].cross_origin_anonymous);
}

#[test]
fn progress_is_strictly_increasing_and_ends_at_100() {
    let entries = (0..8).map(|i| format!("f{i}.txt")).collect::<Vec<_>>();
    let mut m = AssetManifest::new();
    for e in &entries {
        m.insert_bytes(e, b"x").unwrap();
    }
    let loader = Loader::with_fetcher(
        LoaderConfig {
            root_path: String::new(),
            embedded: Some(Arc::new(m)),
        },
        Arc::new(MemoryFetcher::new()),
    );

    let mut batch = loader.batch();
    for e in &entries {
        batch.load_raw_text(e.clone(), |_| {});
    }
    let (progress, on_progress) = collect_progress();
    let settlement = batch.start(on_progress, |_| {}).unwrap().wait().unwrap();

    assert_eq!(settlement.total, 8);
    let seen = progress.lock().unwrap();
    assert_eq!(seen.len(), 8);
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(*seen.last().unwrap(), 100.0);
}

#[test]
fn failures_settle_and_count_towards_progress() {
    let loader = Loader::with_fetcher(
        LoaderConfig {
            root_path: String::new(),
            embedded: Some(manifest(&[("ok.txt", "ok")])),
        },
        Arc::new(MemoryFetcher::new()),
    );
    let completions = Arc::new(Mutex::new(Vec::new()));
    let c = Arc::clone(&completions);

    let mut batch = loader.batch();
    batch.load_raw_text("ok.txt", |_| {});
    batch.load_raw_text("missing.txt", |_| panic!("must not be delivered"));
    batch.load_media("ok.txt", Broken);
    let (progress, on_progress) = collect_progress();

    let settlement = batch
        .start(on_progress, move |s| c.lock().unwrap().push(s.clone()))
        .unwrap()
        .wait()
        .unwrap();

    assert_eq!(settlement.total, 3);
    let mut failed = settlement.failed_paths();
    failed.sort_unstable();
    assert_eq!(failed, vec!["missing.txt", "ok.txt"]);
    assert!(!settlement.is_success());
    assert_eq!(*completions.lock().unwrap(), vec![settlement.clone()]);
    assert_eq!(*progress.lock().unwrap().last().unwrap(), 100.0);
}

#[test]
fn mode_is_decided_at_start() {
    let fetcher = MemoryFetcher::new().with("http://cdn/data/a.txt", "from network");
    let loader = Loader::with_fetcher(
        LoaderConfig {
            root_path: "http://cdn/".to_string(),
            embedded: Some(manifest(&[("data/a.txt", "embedded")])),
        },
        Arc::new(fetcher),
    );
    let text = Arc::new(Mutex::new(String::new()));
    let t = Arc::clone(&text);

    let mut batch = loader.batch();
    batch.load_raw_text("data/a.txt", move |s| *t.lock().unwrap() = s);
    loader.set_embedded(None);

    let handle = batch.start(|_| {}, |_| {}).unwrap();
    assert_eq!(handle.mode(), ResolutionMode::Network);
    assert!(handle.wait().unwrap().is_success());
    assert_eq!(*text.lock().unwrap(), "from network");
}

#[test]
fn network_media_gets_cache_busted_anonymous_url() {
    let loader = Loader::with_fetcher(LoaderConfig::default(), Arc::new(MemoryFetcher::new()));
    loader.set_root_path("http://cdn/");
    let recorder = Recorder::default();

    let mut batch = loader.batch();
    batch.load_media("song.mp3", recorder.clone());
    assert!(batch.start(|_| {}, |_| {}).unwrap().wait().unwrap().is_success());

    let sources = recorder.sources.lock().unwrap();
    assert!(sources[0].uri.starts_with("http://cdn/song.mp3?_="));
    assert!(sources[0].cross_origin_anonymous);
    assert_eq!(sources[0].kind, Some(MediaKind::Audio));
}

#[test]
fn batches_are_independent() {
    let loader = Loader::with_fetcher(
        LoaderConfig {
            root_path: String::new(),
            embedded: Some(manifest(&[("a.txt", "a")])),
        },
        Arc::new(MemoryFetcher::new()),
    );
    let mut first = loader.batch();
    first.load_raw_text("a.txt", |_| {});
    let second = loader.batch();

    assert_ne!(first.id(), second.id());
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(first.start(|_| {}, |_| {}).unwrap().wait().unwrap().total, 1);
    assert_eq!(second.start(|_| {}, |_| {}).unwrap().wait().unwrap().total, 0);
}

#[test]
fn texture_is_filled_once_resolved() {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    let mut m = AssetManifest::new();
    m.insert_bytes("tex.png", &png).unwrap();
    let loader = Loader::with_fetcher(
        LoaderConfig {
            root_path: String::new(),
            embedded: Some(Arc::new(m)),
        },
        Arc::new(MemoryFetcher::new()),
    );

    let mut batch = loader.batch();
    let texture = batch.load_texture("tex.png");
    assert!(!texture.is_ready());
    assert_eq!(texture.source_file(), "tex.png");

    assert!(batch.start(|_| {}, |_| {}).unwrap().wait().unwrap().is_success());
    assert_eq!(texture.dimensions(), Some((3, 2)));
}
