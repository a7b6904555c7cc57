//! The upload fallback chain.

use serde::Serialize;

use crate::cloudinary::CloudinaryStore;
use crate::config::MediaConfig;
use crate::error::{StoreAttempt, StoreError, UploadError};
use crate::inline::InlineStore;
use crate::input::ImageInput;
use crate::local::LocalDiskStore;
use crate::store::ImageStore;
use crate::validate::{prepare, Prepared};

/// Strategy reported when the client sent an already-hosted URL.
pub const STRATEGY_HOSTED: &str = "hosted";

/// A stored image and how it got there.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedImage {
    pub url: String,
    /// `hosted`, or the name of the store that accepted the image.
    pub strategy: &'static str,
    /// Stores that failed before `strategy` succeeded.
    pub attempts: Vec<StoreAttempt>,
}

/// Ordered list of stores; the first to succeed wins.
pub struct FallbackChain {
    stores: Vec<Box<dyn ImageStore>>,
    max_upload_bytes: usize,
}

impl FallbackChain {
    pub fn new(stores: Vec<Box<dyn ImageStore>>, max_upload_bytes: usize) -> Self {
        Self {
            stores,
            max_upload_bytes,
        }
    }

    /// Cloudinary, then local disk (when enabled), then inline.
    ///
    /// Cloudinary is always in the chain; without credentials it reports
    /// `NotConfigured` and the next tier takes over.
    pub fn from_config(config: &MediaConfig) -> Result<Self, StoreError> {
        let mut stores: Vec<Box<dyn ImageStore>> =
            vec![Box::new(CloudinaryStore::new(config.cloudinary.clone())?)];
        if config.local_enabled {
            stores.push(Box::new(LocalDiskStore::new(
                config.upload_dir.clone(),
                config.public_prefix.clone(),
            )));
        }
        stores.push(Box::new(InlineStore::new(config.max_inline_bytes)));
        Ok(Self::new(stores, config.max_upload_bytes))
    }

    pub fn store_names(&self) -> Vec<&'static str> {
        self.stores.iter().map(|s| s.name()).collect()
    }

    /// Validate `input` and offer it to each store in order.
    ///
    /// Invalid input fails before any store is tried.
    pub async fn resolve(&self, input: ImageInput) -> Result<ResolvedImage, UploadError> {
        let image = match prepare(input, self.max_upload_bytes)? {
            Prepared::Hosted(url) => {
                return Ok(ResolvedImage {
                    url,
                    strategy: STRATEGY_HOSTED,
                    attempts: Vec::new(),
                })
            }
            Prepared::Image(image) => image,
        };

        let mut attempts = Vec::new();
        for store in &self.stores {
            match store.store(&image).await {
                Ok(url) => {
                    tracing::info!(
                        strategy = store.name(),
                        failed_attempts = attempts.len(),
                        bytes = image.bytes.len(),
                        "Image stored"
                    );
                    return Ok(ResolvedImage {
                        url,
                        strategy: store.name(),
                        attempts,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        store = store.name(),
                        error = %e,
                        "Image store failed, falling back"
                    );
                    attempts.push(StoreAttempt {
                        store: store.name(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::error!(attempts = attempts.len(), "Every image store failed");
        Err(UploadError::Exhausted { attempts })
    }

    /// Undo `resolved` after the record it was meant for failed to save.
    /// Errors are logged, not returned.
    pub async fn discard(&self, resolved: &ResolvedImage) {
        let Some(store) = self.stores.iter().find(|s| s.name() == resolved.strategy) else {
            return;
        };
        if let Err(e) = store.discard(&resolved.url).await {
            tracing::warn!(
                store = store.name(),
                url = %resolved.url,
                error = %e,
                "Failed to discard image"
            );
        }
    }
}
