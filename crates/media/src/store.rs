use async_trait::async_trait;

use crate::error::StoreError;
use crate::validate::ImageData;

/// One tier of the fallback chain.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Strategy name reported in [`ResolvedImage`](crate::ResolvedImage)
    /// (`cloudinary`, `local`, `inline`).
    fn name(&self) -> &'static str;

    /// Persist the image and return the URL to store on the record.
    async fn store(&self, image: &ImageData) -> Result<String, StoreError>;

    /// Remove an image this store produced whose record was never written.
    async fn discard(&self, _url: &str) -> Result<(), StoreError> {
        Ok(())
    }
}
