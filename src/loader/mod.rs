//! Runtime asset loader.
//!
//! A [`batch::Loader`] hands out [`batch::LoadBatch`]es. Requests are registered against a batch
//! and resolved together once the batch is started, either from an embedded
//! [`crate::assets::manifest::AssetManifest`] or over the network through a [`fetch::Fetcher`].

/// Loader factory, load batches and settlement.
pub mod batch;
/// Network access used when no embedded manifest is configured.
pub mod fetch;
/// URI construction for embedded and network resolution.
pub mod resolve;
/// Image handles filled in by a batch.
pub mod texture;
