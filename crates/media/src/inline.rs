use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::StoreError;
use crate::store::ImageStore;
use crate::validate::ImageData;

/// Last resort: embed the image in the record as a data URL.
pub struct InlineStore {
    max_bytes: usize,
}

impl InlineStore {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

#[async_trait]
impl ImageStore for InlineStore {
    fn name(&self) -> &'static str {
        "inline"
    }

    async fn store(&self, image: &ImageData) -> Result<String, StoreError> {
        if image.bytes.len() > self.max_bytes {
            return Err(StoreError::TooLarge {
                size: image.bytes.len(),
                max: self.max_bytes,
            });
        }
        Ok(format!(
            "data:{};base64,{}",
            image.kind.mime(),
            STANDARD.encode(&image.bytes)
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::validate::tests::GIF;
    use crate::validate::{decode_data_url, ImageKind};

    fn gif() -> ImageData {
        ImageData {
            bytes: GIF.to_vec(),
            kind: ImageKind::Gif,
        }
    }

    #[tokio::test]
    async fn encodes_data_url_that_decodes_back() {
        let url = InlineStore::new(1024).store(&gif()).await.unwrap();
        assert!(url.starts_with("data:image/gif;base64,"));
        assert_eq!(decode_data_url(&url, 1024).unwrap(), GIF);
    }

    #[tokio::test]
    async fn refuses_images_over_the_inline_limit() {
        let result = InlineStore::new(4).store(&gif()).await;
        assert_matches!(result, Err(StoreError::TooLarge { max: 4, .. }));
    }
}
