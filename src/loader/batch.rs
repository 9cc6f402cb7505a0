use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, mpsc};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::assets::manifest::AssetManifest;
use crate::foundation::error::{NinError, NinResult};
use crate::loader::fetch::{Fetcher, default_fetcher};
use crate::loader::resolve::{MediaKind, cache_busted_url, data_uri, network_url};
use crate::loader::texture::{Texture, TextureConsumer};

static NEXT_BATCH_ID: AtomicU64 = AtomicU64::new(1);

/// Where a loader resolves requests from.
#[derive(Clone, Debug, Default)]
pub struct LoaderConfig {
    /// Prefix of every network URL. Unused in embedded mode.
    pub root_path: String,
    /// Embedded asset map. When present at start time, a batch resolves from it exclusively.
    pub embedded: Option<Arc<AssetManifest>>,
}

/// How a started batch resolves its requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Decode from the embedded asset map.
    Embedded,
    /// Fetch relative to the configured root path.
    Network,
}

/// Where a media consumer should load from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaSource {
    /// `data:` URI in embedded mode, cache-busted URL in network mode.
    pub uri: String,
    /// Kind inferred from the asset extension.
    pub kind: Option<MediaKind>,
    /// Request the resource without credentials (network mode).
    pub cross_origin_anonymous: bool,
}

/// Something that loads a media resource, an image or audio/video element for instance.
///
/// Returning `Ok` signals that the resource is ready for use.
pub trait MediaConsumer: Send {
    /// Load from `source`, blocking until ready.
    fn load(&mut self, source: &MediaSource) -> NinResult<()>;
}

/// Invoked once after a request resolved successfully.
pub type OnLoaded = Box<dyn FnOnce() + Send>;

/// What a request delivers into.
pub enum LoadTarget {
    /// A consumer pointed at a URI.
    Media(Box<dyn MediaConsumer>),
    /// A callback receiving the asset as text.
    RawText(Box<dyn FnOnce(String) + Send>),
}

/// One registered request.
pub struct LoadRequest {
    /// Asset path, keyed like the asset manifest.
    pub path: String,
    /// Delivery target.
    pub target: LoadTarget,
    /// Per-request completion callback.
    pub on_loaded: Option<OnLoaded>,
}

/// A request that did not resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedLoad {
    /// Asset path of the request.
    pub path: String,
    /// Why it failed.
    pub reason: String,
}

/// Outcome of a drained batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSettlement {
    /// Requests the batch was started with.
    pub total: usize,
    /// Requests that failed, in settlement order.
    pub failed: Vec<FailedLoad>,
}

impl BatchSettlement {
    /// `true` if every request resolved.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Paths of failed requests.
    pub fn failed_paths(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.path.as_str()).collect()
    }
}

/// Batch factory.
///
/// The configuration is shared with every batch handed out; each batch reads it once, when it
/// is started.
#[derive(Clone)]
pub struct Loader {
    config: Arc<RwLock<LoaderConfig>>,
    fetcher: Arc<dyn Fetcher>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl Loader {
    /// Loader using the default fetcher.
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_fetcher(config, default_fetcher())
    }

    /// Loader using `fetcher` for network mode.
    pub fn with_fetcher(config: LoaderConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            fetcher,
        }
    }

    /// Replace the network root path.
    pub fn set_root_path(&self, root_path: impl Into<String>) {
        self.config
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .root_path = root_path.into();
    }

    /// Install or remove the embedded asset map.
    pub fn set_embedded(&self, embedded: Option<Arc<AssetManifest>>) {
        self.config
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .embedded = embedded;
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> LoaderConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A fresh, empty batch.
    pub fn batch(&self) -> LoadBatch {
        LoadBatch {
            id: NEXT_BATCH_ID.fetch_add(1, Ordering::Relaxed),
            config: Arc::clone(&self.config),
            fetcher: Arc::clone(&self.fetcher),
            requests: Vec::new(),
        }
    }
}

/// Requests accumulated until [`LoadBatch::start`].
pub struct LoadBatch {
    id: u64,
    config: Arc<RwLock<LoaderConfig>>,
    fetcher: Arc<dyn Fetcher>,
    requests: Vec<LoadRequest>,
}

impl LoadBatch {
    /// Identifier used in logs.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Registered requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Register a prepared request.
    pub fn push(&mut self, request: LoadRequest) {
        tracing::debug!(batch = self.id, path = %request.path, "queued");
        self.requests.push(request);
    }

    /// Point `consumer` at `path` once the batch starts.
    pub fn load_media(&mut self, path: impl Into<String>, consumer: impl MediaConsumer + 'static) {
        self.push(LoadRequest {
            path: path.into(),
            target: LoadTarget::Media(Box::new(consumer)),
            on_loaded: None,
        });
    }

    /// Like [`LoadBatch::load_media`], calling `on_loaded` once the consumer is ready.
    pub fn load_media_with(
        &mut self,
        path: impl Into<String>,
        consumer: impl MediaConsumer + 'static,
        on_loaded: impl FnOnce() + Send + 'static,
    ) {
        self.push(LoadRequest {
            path: path.into(),
            target: LoadTarget::Media(Box::new(consumer)),
            on_loaded: Some(Box::new(on_loaded)),
        });
    }

    /// Deliver `path` as text to `on_text`.
    pub fn load_raw_text(
        &mut self,
        path: impl Into<String>,
        on_text: impl FnOnce(String) + Send + 'static,
    ) {
        self.push(LoadRequest {
            path: path.into(),
            target: LoadTarget::RawText(Box::new(on_text)),
            on_loaded: None,
        });
    }

    /// Decode the image at `path` into the returned handle.
    pub fn load_texture(&mut self, path: impl Into<String>) -> Texture {
        let path = path.into();
        let texture = Texture::pending(&path);
        let consumer = TextureConsumer::new(texture.clone(), Arc::clone(&self.fetcher));
        self.load_media(path, consumer);
        texture
    }

    /// Resolve every request concurrently.
    ///
    /// The resolution mode and the request total are fixed here. `on_progress` receives
    /// `100 * resolved / total` after every settled request, failures included, so the last
    /// value is exactly `100`. `on_complete` runs exactly once, immediately when the batch is
    /// empty. Both callbacks run on the batch coordinator thread.
    pub fn start<P, C>(self, mut on_progress: P, on_complete: C) -> NinResult<DrainHandle>
    where
        P: FnMut(f64) + Send + 'static,
        C: FnOnce(&BatchSettlement) + Send + 'static,
    {
        let LoadBatch {
            id,
            config,
            fetcher,
            requests,
        } = self;

        let env = {
            let cfg = config.read().unwrap_or_else(PoisonError::into_inner);
            ResolveEnv {
                embedded: cfg.embedded.clone(),
                root_path: cfg.root_path.clone(),
                fetcher,
            }
        };
        let mode = env.mode();
        let total = requests.len();
        tracing::info!(batch = id, total, ?mode, "starting load batch");

        if total == 0 {
            let settlement = BatchSettlement::default();
            on_complete(&settlement);
            return Ok(DrainHandle {
                mode,
                inner: Drain::Settled(settlement),
            });
        }

        let paths = requests.iter().map(|r| r.path.clone()).collect::<Vec<_>>();
        let (tx, rx) = mpsc::channel::<Resolved>();

        let coordinator = std::thread::Builder::new()
            .name(format!("nin-batch-{id}"))
            .spawn(move || drain(id, paths, rx, &mut on_progress, on_complete))
            .context("failed to spawn load batch coordinator")?;

        let env = Arc::new(env);
        for (index, request) in requests.into_iter().enumerate() {
            let tx = tx.clone();
            let env = Arc::clone(&env);
            let spawned = std::thread::Builder::new()
                .name(format!("nin-load-{id}-{index}"))
                .spawn(move || {
                    let result = resolve(request, &env).map_err(|e| e.to_string());
                    tx.send(Resolved { index, result }).ok();
                });
            if let Err(e) = spawned {
                tracing::warn!(batch = id, index, error = %e, "failed to spawn load worker");
            }
        }
        drop(tx);

        Ok(DrainHandle {
            mode,
            inner: Drain::Draining(coordinator),
        })
    }
}

/// Handle on a started batch.
pub struct DrainHandle {
    mode: ResolutionMode,
    inner: Drain,
}

enum Drain {
    Settled(BatchSettlement),
    Draining(JoinHandle<BatchSettlement>),
}

impl DrainHandle {
    /// Mode the batch was started in.
    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// `true` once the completion callback has run.
    pub fn is_finished(&self) -> bool {
        match &self.inner {
            Drain::Settled(_) => true,
            Drain::Draining(handle) => handle.is_finished(),
        }
    }

    /// Block until the batch settles.
    pub fn wait(self) -> NinResult<BatchSettlement> {
        match self.inner {
            Drain::Settled(settlement) => Ok(settlement),
            Drain::Draining(handle) => handle
                .join()
                .map_err(|_| NinError::load("load batch coordinator panicked")),
        }
    }
}

struct ResolveEnv {
    embedded: Option<Arc<AssetManifest>>,
    root_path: String,
    fetcher: Arc<dyn Fetcher>,
}

impl ResolveEnv {
    fn mode(&self) -> ResolutionMode {
        if self.embedded.is_some() {
            ResolutionMode::Embedded
        } else {
            ResolutionMode::Network
        }
    }
}

struct Resolved {
    index: usize,
    result: Result<(), String>,
}

fn resolve(request: LoadRequest, env: &ResolveEnv) -> NinResult<()> {
    let LoadRequest {
        path,
        target,
        on_loaded,
    } = request;

    match target {
        LoadTarget::RawText(on_text) => {
            let text = match &env.embedded {
                Some(manifest) => String::from_utf8_lossy(&manifest.decode(&path)?).into_owned(),
                None => env.fetcher.get_text(&network_url(&env.root_path, &path))?,
            };
            on_text(text);
        }
        LoadTarget::Media(mut consumer) => {
            let kind = MediaKind::from_path(&path);
            let source = match &env.embedded {
                Some(manifest) => {
                    let encoded = manifest.get(&path).ok_or_else(|| {
                        NinError::load(format!("'{path}' is not in the embedded asset map"))
                    })?;
                    MediaSource {
                        uri: data_uri(&path, encoded),
                        kind,
                        cross_origin_anonymous: false,
                    }
                }
                None => MediaSource {
                    uri: cache_busted_url(&env.root_path, &path, rand::random::<u64>()),
                    kind,
                    cross_origin_anonymous: true,
                },
            };
            consumer.load(&source)?;
        }
    }

    tracing::debug!(path = %path, "finished loading");
    if let Some(on_loaded) = on_loaded {
        on_loaded();
    }
    Ok(())
}

struct Tally {
    total: usize,
    resolved: usize,
    settled: Vec<bool>,
    failed: Vec<FailedLoad>,
}

impl Tally {
    fn settle(
        &mut self,
        index: usize,
        path: &str,
        result: Result<(), String>,
        on_progress: &mut dyn FnMut(f64),
    ) {
        if self.settled[index] {
            return;
        }
        self.settled[index] = true;
        self.resolved += 1;
        if let Err(reason) = result {
            tracing::warn!(path, %reason, "load failed");
            self.failed.push(FailedLoad {
                path: path.to_string(),
                reason,
            });
        }
        on_progress(100.0 * self.resolved as f64 / self.total as f64);
    }
}

fn drain<C>(
    id: u64,
    paths: Vec<String>,
    rx: mpsc::Receiver<Resolved>,
    on_progress: &mut dyn FnMut(f64),
    on_complete: C,
) -> BatchSettlement
where
    C: FnOnce(&BatchSettlement),
{
    let total = paths.len();
    let mut tally = Tally {
        total,
        resolved: 0,
        settled: vec![false; total],
        failed: Vec::new(),
    };

    while tally.resolved < total {
        // Disconnects once every worker is gone.
        let Ok(msg) = rx.recv() else {
            break;
        };
        tally.settle(msg.index, &paths[msg.index], msg.result, on_progress);
    }

    for (index, path) in paths.iter().enumerate() {
        tally.settle(
            index,
            path,
            Err("load worker exited without reporting".to_string()),
            on_progress,
        );
    }

    let settlement = BatchSettlement {
        total,
        failed: tally.failed,
    };
    tracing::info!(
        batch = id,
        total,
        failed = settlement.failed.len(),
        "all loading finished for this batch"
    );
    on_complete(&settlement);
    settlement
}

#[cfg(test)]
#[path = "../../tests/unit/loader/batch.rs"]
mod tests;
