use std::path::PathBuf;

/// Credentials and endpoint for the Cloudinary upload API.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Folder uploads are filed under (default: `fitnessApp`).
    pub folder: String,
    /// Base URL of the upload API (default: `https://api.cloudinary.com`).
    pub api_base: String,
    /// Per-request timeout in seconds (default: `120`).
    pub timeout_secs: u64,
}

impl CloudinaryConfig {
    /// `(cloud_name, api_key, api_secret)` when all three are set.
    pub fn credentials(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.cloud_name.as_deref()?,
            self.api_key.as_deref()?,
            self.api_secret.as_deref()?,
        ))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

/// Upload limits and store settings.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub cloudinary: CloudinaryConfig,
    /// Directory the local fallback writes into.
    pub upload_dir: PathBuf,
    /// URL prefix the upload directory is served under.
    pub public_prefix: String,
    /// Whether the local-disk tier is part of the chain.
    pub local_enabled: bool,
    pub max_upload_bytes: usize,
    /// Largest image the inline tier will embed as a data URL.
    pub max_inline_bytes: usize,
}

impl MediaConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                      |
    /// |--------------------------|------------------------------|
    /// | `CLOUDINARY_CLOUD_NAME`  | unset                        |
    /// | `CLOUDINARY_API_KEY`     | unset                        |
    /// | `CLOUDINARY_API_SECRET`  | unset                        |
    /// | `CLOUDINARY_FOLDER`      | `fitnessApp`                 |
    /// | `CLOUDINARY_API_BASE`    | `https://api.cloudinary.com` |
    /// | `UPLOAD_TIMEOUT_SECS`    | `120`                        |
    /// | `UPLOAD_DIR`             | `public/uploads`             |
    /// | `UPLOAD_PUBLIC_PREFIX`   | `/uploads`                   |
    /// | `LOCAL_UPLOADS_ENABLED`  | `true`                       |
    /// | `MAX_UPLOAD_BYTES`       | `5242880`                    |
    /// | `MAX_INLINE_BYTES`       | `2097152`                    |
    pub fn from_env() -> Self {
        let cloudinary = CloudinaryConfig {
            cloud_name: non_empty_var("CLOUDINARY_CLOUD_NAME"),
            api_key: non_empty_var("CLOUDINARY_API_KEY"),
            api_secret: non_empty_var("CLOUDINARY_API_SECRET"),
            folder: std::env::var("CLOUDINARY_FOLDER").unwrap_or_else(|_| "fitnessApp".into()),
            api_base: std::env::var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|_| "https://api.cloudinary.com".into()),
            timeout_secs: std::env::var("UPLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".into())
                .parse()
                .expect("UPLOAD_TIMEOUT_SECS must be a valid u64"),
        };

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "public/uploads".into()));

        let public_prefix =
            std::env::var("UPLOAD_PUBLIC_PREFIX").unwrap_or_else(|_| "/uploads".into());

        let local_enabled: bool = std::env::var("LOCAL_UPLOADS_ENABLED")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("LOCAL_UPLOADS_ENABLED must be true or false");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "5242880".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let max_inline_bytes: usize = std::env::var("MAX_INLINE_BYTES")
            .unwrap_or_else(|_| "2097152".into())
            .parse()
            .expect("MAX_INLINE_BYTES must be a valid usize");

        Self {
            cloudinary,
            upload_dir,
            public_prefix,
            local_enabled,
            max_upload_bytes,
            max_inline_bytes,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
