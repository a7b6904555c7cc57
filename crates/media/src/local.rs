use std::path::PathBuf;

use async_trait::async_trait;
use fittrack_core::images::local_upload_file;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::ImageStore;
use crate::validate::ImageData;

/// Writes images into a directory the API serves statically.
///
/// Files are named `<32 hex chars>.<ext>` and exposed as
/// `{public_prefix}/<file>`.
pub struct LocalDiskStore {
    dir: PathBuf,
    public_prefix: String,
}

impl LocalDiskStore {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let public_prefix: String = public_prefix.into();
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Path on disk for a URL this store produced.
    pub fn path_for(&self, url: &str) -> Option<PathBuf> {
        local_upload_file(url, &self.public_prefix).map(|file| self.dir.join(file))
    }
}

#[async_trait]
impl ImageStore for LocalDiskStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn store(&self, image: &ImageData) -> Result<String, StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), image.kind.extension());
        tokio::fs::write(self.dir.join(&file_name), &image.bytes).await?;

        Ok(format!("{}/{}", self.public_prefix, file_name))
    }

    async fn discard(&self, url: &str) -> Result<(), StoreError> {
        let Some(path) = self.path_for(url) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::tests::PNG;
    use crate::validate::ImageKind;

    fn png() -> ImageData {
        ImageData {
            bytes: PNG.to_vec(),
            kind: ImageKind::Png,
        }
    }

    #[tokio::test]
    async fn writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDiskStore::new(dir.path().join("uploads"), "/uploads/");

        let url = store.store(&png()).await.unwrap();

        let file = url.strip_prefix("/uploads/").expect("public prefix");
        let (stem, ext) = file.split_once('.').unwrap();
        assert_eq!(stem.len(), 32);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ext, "png");

        let written = std::fs::read(dir.path().join("uploads").join(file)).unwrap();
        assert_eq!(written, PNG);
    }

    #[tokio::test]
    async fn discard_removes_file_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDiskStore::new(dir.path(), "/uploads");

        let url = store.store(&png()).await.unwrap();
        let path = store.path_for(&url).unwrap();
        assert!(path.exists());

        store.discard(&url).await.unwrap();
        assert!(!path.exists());
        store.discard(&url).await.unwrap();
        store.discard("https://cdn.example/x.png").await.unwrap();
    }
}
