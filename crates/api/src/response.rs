//! Response envelopes shared by handlers.

use serde::Serialize;

/// `{ "data": T }` envelope used by every entity endpoint.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": T, "image": {...} }` for writes that went through the image
/// fallback chain, so clients can tell which store took the picture.
#[derive(Debug, Serialize)]
pub struct ImageDataResponse<T: Serialize> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<fittrack_media::ResolvedImage>,
}
