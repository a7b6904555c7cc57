//! Image intake for FitTrack.
//!
//! Client images (multipart files, data URLs or already-hosted URLs) are
//! validated once and then offered to a [`FallbackChain`] of
//! [`ImageStore`]s: the Cloudinary image host, the local upload directory,
//! and finally an inline data URL. The first store that succeeds wins.

pub mod chain;
pub mod cloudinary;
pub mod config;
pub mod error;
pub mod inline;
pub mod input;
pub mod local;
pub mod store;
pub mod validate;

pub use chain::{FallbackChain, ResolvedImage, STRATEGY_HOSTED};
pub use config::{CloudinaryConfig, MediaConfig};
pub use error::{StoreAttempt, StoreError, UploadError};
pub use input::ImageInput;
pub use store::ImageStore;
pub use validate::{ImageData, ImageKind};
