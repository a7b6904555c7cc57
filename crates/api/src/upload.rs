//! Request bodies that may carry an image.
//!
//! Endpoints that accept a picture take either `multipart/form-data` (text
//! fields plus an optional `image` file) or a JSON body whose `image` member
//! is a data URL or an already hosted URL. [`ImageForm`] reads both into
//! the same shape so handlers never care which one arrived.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use fittrack_core::error::CoreError;
use fittrack_media::{FallbackChain, ImageInput, ResolvedImage, UploadError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::state::AppState;

/// Form field / JSON member holding the image.
pub const IMAGE_FIELD: &str = "image";

/// Parsed text fields plus the image, if one was sent.
#[derive(Debug)]
pub struct ImageForm<T> {
    pub fields: T,
    pub image: Option<ImageInput>,
}

impl<T> ImageForm<T> {
    /// Run the image (if any) through the fallback chain.
    ///
    /// Must happen before any database write so a failed upload leaves
    /// nothing behind.
    pub async fn resolve_image(
        &mut self,
        chain: &FallbackChain,
    ) -> Result<Option<ResolvedImage>, UploadError> {
        match self.image.take() {
            Some(input) => chain.resolve(input).await.map(Some),
            None => Ok(None),
        }
    }
}

impl<T> FromRequest<AppState> for ImageForm<T>
where
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        let (fields, image) = if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            read_multipart(multipart).await?
        } else {
            let Json(body) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            split_json(body)?
        };

        let fields = serde_json::from_value(Value::Object(fields))
            .map_err(|e| AppError::BadRequest(format!("Invalid form fields: {e}")))?;
        Ok(ImageForm { fields, image })
    }
}

async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(Map<String, Value>, Option<ImageInput>), AppError> {
    let mut fields = Map::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            match field.file_name().map(str::to_string) {
                // Browsers send an unnamed, empty part when no file was picked.
                Some(file_name) if !file_name.is_empty() => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    image = Some(ImageInput::File {
                        file_name: Some(file_name),
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                Some(_) => {}
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    image = ImageInput::from_text(&text);
                }
            }
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        fields.insert(name, Value::String(text));
    }

    Ok((fields, image))
}

fn split_json(body: Value) -> Result<(Map<String, Value>, Option<ImageInput>), AppError> {
    let Value::Object(mut fields) = body else {
        return Err(AppError::BadRequest("Request body must be a JSON object".into()));
    };
    let image = match fields.remove(IMAGE_FIELD) {
        Some(Value::String(text)) => ImageInput::from_text(&text),
        Some(Value::Null) | None => None,
        Some(_) => {
            return Err(AppError::BadRequest(
                "'image' must be a data URL or an image URL".into(),
            ))
        }
    };
    Ok((fields, image))
}

/// Run `write`, and throw the freshly stored image away if it fails.
pub async fn commit_with_image<T, F>(
    chain: &FallbackChain,
    image: Option<&ResolvedImage>,
    write: F,
) -> Result<T, AppError>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    match write.await {
        Ok(value) => Ok(value),
        Err(e) => {
            if let Some(resolved) = image {
                chain.discard(resolved).await;
            }
            Err(AppError::Database(e))
        }
    }
}

/// Like [`commit_with_image`] for updates: a missing row (`Ok(None)`) also
/// discards the image and becomes `not_found`.
pub async fn commit_update_with_image<T, F>(
    chain: &FallbackChain,
    image: Option<&ResolvedImage>,
    write: F,
    not_found: CoreError,
) -> Result<T, AppError>
where
    F: std::future::Future<Output = Result<Option<T>, sqlx::Error>>,
{
    match commit_with_image(chain, image, write).await? {
        Some(value) => Ok(value),
        None => {
            if let Some(resolved) = image {
                chain.discard(resolved).await;
            }
            Err(AppError::Core(not_found))
        }
    }
}

/// Lenient deserializers for form fields.
///
/// Multipart text parts always arrive as strings, while JSON bodies carry
/// real numbers and arrays. These accept either.
pub mod lenient {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ValueOrText<T> {
        Value(T),
        Text(String),
    }

    /// A number or boolean, or its text form. Blank text reads as absent.
    pub fn opt_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr,
        T::Err: Display,
    {
        match Option::<ValueOrText<T>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(ValueOrText::Value(v)) => Ok(Some(v)),
            Some(ValueOrText::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(ValueOrText::Text(s)) => s.trim().parse().map(Some).map_err(D::Error::custom),
        }
    }

    /// A list of strings: a JSON array, a string holding a JSON array, or a
    /// comma-separated string.
    pub fn opt_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<ValueOrText<Vec<String>>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(ValueOrText::Value(list)) => Ok(Some(clean(list))),
            Some(ValueOrText::Text(s)) => {
                let s = s.trim();
                if s.starts_with('[') {
                    serde_json::from_str::<Vec<String>>(s)
                        .map(|list| Some(clean(list)))
                        .map_err(D::Error::custom)
                } else {
                    Ok(Some(clean(s.split(',').map(str::to_string).collect())))
                }
            }
        }
    }

    /// Arbitrary JSON, or a string containing JSON.
    pub fn opt_json<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => serde_json::from_str(&s).map(Some).map_err(D::Error::custom),
            Some(other) => Ok(Some(other)),
        }
    }

    fn clean(list: Vec<String>) -> Vec<String> {
        list.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct ProfileFields {
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient::opt_parsed")]
        age: Option<i32>,
        #[serde(default, deserialize_with = "lenient::opt_parsed")]
        weight_kg: Option<f64>,
        #[serde(default, deserialize_with = "lenient::opt_string_list")]
        fitness_goals: Option<Vec<String>>,
        #[serde(default, deserialize_with = "lenient::opt_json")]
        availability: Option<Value>,
    }

    #[test]
    fn multipart_style_strings_are_coerced() {
        let fields: ProfileFields = serde_json::from_value(json!({
            "name": "12345",
            "age": "31",
            "weight_kg": " 72.5 ",
            "fitness_goals": "strength, endurance,",
            "availability": "[{\"day\":\"mon\"}]",
        }))
        .unwrap();

        assert_eq!(fields.name.as_deref(), Some("12345"));
        assert_eq!(fields.age, Some(31));
        assert_eq!(fields.weight_kg, Some(72.5));
        assert_eq!(
            fields.fitness_goals,
            Some(vec!["strength".to_string(), "endurance".to_string()])
        );
        assert_eq!(fields.availability, Some(json!([{ "day": "mon" }])));
    }

    #[test]
    fn json_values_pass_through_and_blanks_are_absent() {
        let fields: ProfileFields = serde_json::from_value(json!({
            "age": 40,
            "weight_kg": "",
            "fitness_goals": "[\"mobility\"]",
        }))
        .unwrap();

        assert_eq!(fields.age, Some(40));
        assert_eq!(fields.weight_kg, None);
        assert_eq!(fields.fitness_goals, Some(vec!["mobility".to_string()]));
        assert_eq!(fields.availability, None);
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        let result = serde_json::from_value::<ProfileFields>(json!({ "age": "thirty" }));
        assert!(result.is_err());
    }

    #[test]
    fn json_image_member_is_split_off() {
        let (fields, image) = split_json(json!({
            "name": "Ada",
            "image": "data:image/png;base64,AAAA",
        }))
        .unwrap();

        assert!(!fields.contains_key(IMAGE_FIELD));
        assert_matches!(image, Some(ImageInput::DataUrl(_)));
    }

    #[test]
    fn relative_image_path_means_no_new_image() {
        let (_, image) = split_json(json!({ "image": "/uploads/old.png" })).unwrap();
        assert_eq!(image, None);
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert_matches!(split_json(json!([1, 2])), Err(AppError::BadRequest(_)));
    }

    fn local_chain(dir: &std::path::Path) -> FallbackChain {
        FallbackChain::new(
            vec![Box::new(fittrack_media::local::LocalDiskStore::new(
                dir.to_path_buf(),
                String::from("/uploads"),
            ))],
            1024,
        )
    }

    fn png() -> ImageInput {
        ImageInput::File {
            file_name: Some("avatar.png".into()),
            content_type: Some("image/png".into()),
            bytes: b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01".to_vec(),
        }
    }

    fn files_in(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn missing_row_on_update_discards_the_image() {
        let dir = tempfile::tempdir().unwrap();
        let chain = local_chain(dir.path());
        let resolved = chain.resolve(png()).await.unwrap();
        assert_eq!(files_in(dir.path()), 1);

        let result = commit_update_with_image(
            &chain,
            Some(&resolved),
            async { Ok::<Option<()>, sqlx::Error>(None) },
            CoreError::NotFound { entity: "User", id: 999 },
        )
        .await;

        assert_matches!(
            result,
            Err(AppError::Core(CoreError::NotFound { entity: "User", id: 999 }))
        );
        assert_eq!(files_in(dir.path()), 0);
    }

    #[tokio::test]
    async fn successful_update_keeps_the_image() {
        let dir = tempfile::tempdir().unwrap();
        let chain = local_chain(dir.path());
        let resolved = chain.resolve(png()).await.unwrap();

        let value = commit_update_with_image(
            &chain,
            Some(&resolved),
            async { Ok::<Option<i64>, sqlx::Error>(Some(7)) },
            CoreError::NotFound { entity: "User", id: 7 },
        )
        .await
        .unwrap();

        assert_eq!(value, 7);
        assert_eq!(files_in(dir.path()), 1);
    }
}
