use serde::Serialize;

/// One failed store in a fallback run.
#[derive(Debug, Clone, Serialize)]
pub struct StoreAttempt {
    pub store: &'static str,
    pub error: String,
}

/// Why an image could not be turned into a stored URL.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Uploaded image is empty")]
    Empty,

    #[error("Image size must be less than {}MB", .max / (1024 * 1024))]
    TooLarge { size: usize, max: usize },

    #[error("Only JPEG, PNG and GIF images are allowed")]
    UnsupportedType(String),

    #[error("Invalid image data URL: {0}")]
    InvalidDataUrl(String),

    /// Every store in the chain failed.
    #[error("Failed to upload image, please try again later")]
    Exhausted { attempts: Vec<StoreAttempt> },
}

impl UploadError {
    /// Whether the client sent a bad image (as opposed to every store failing).
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, Self::Exhausted { .. })
    }
}

/// Failure of a single [`ImageStore`](crate::ImageStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Required settings are missing; the chain moves on.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The image host answered with a non-2xx status.
    #[error("Image host error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image of {size} bytes exceeds the {max} byte limit of this store")]
    TooLarge { size: usize, max: usize },
}
