use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::ClientError;
use crate::types::{AuthSession, Envelope, Health, ProfileChanges, Trainer, Updated, User};

/// Where the API listens in local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5050/api";

/// A picture to send with a multipart request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    /// e.g. `image/png`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// HTTP client for the FitTrack API.
///
/// Cloning is cheap; clones share the connection pool and the stored token.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiClient {
    /// * `base_url` - API root including `/api`, e.g. `http://host:5050/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    // ---- endpoints ----

    /// `POST /users/register`, multipart. Stores the returned access token.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        image: Option<ImageUpload>,
    ) -> Result<AuthSession, ClientError> {
        let form = with_image(
            Form::new()
                .text("name", name.to_string())
                .text("email", email.to_string())
                .text("password", password.to_string()),
            image,
        )?;
        let session: AuthSession = self
            .send_anonymous(self.client.post(self.url("/users/register")).multipart(form))
            .await?;
        self.set_token(session.access_token.clone()).await;
        Ok(session)
    }

    /// `POST /users/login`. Stores the returned access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let session: AuthSession = self
            .send_anonymous(self.client.post(self.url("/users/login")).json(&body))
            .await?;
        self.set_token(session.access_token.clone()).await;
        Ok(session)
    }

    /// `GET /users/profile`.
    pub async fn profile(&self) -> Result<User, ClientError> {
        let envelope: Envelope<User> = self
            .send(self.client.get(self.url("/users/profile")))
            .await?;
        Ok(envelope.data)
    }

    /// `PUT /users/profile`, multipart with an optional new picture.
    pub async fn update_profile(
        &self,
        changes: &ProfileChanges,
        image: Option<ImageUpload>,
    ) -> Result<Updated<User>, ClientError> {
        let form = changes
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        let form = with_image(form, image)?;
        self.send(self.client.put(self.url("/users/profile")).multipart(form))
            .await
    }

    /// `GET /trainers`.
    pub async fn list_trainers(&self) -> Result<Vec<Trainer>, ClientError> {
        let envelope: Envelope<Vec<Trainer>> =
            self.send(self.client.get(self.url("/trainers"))).await?;
        Ok(envelope.data)
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<Health, ClientError> {
        self.send(self.client.get(self.url("/health"))).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the stored token, send, and decode a 2xx JSON body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let token = self.token().await;
        let request = match &token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let response = self.ensure_success(response, token.is_some()).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send without the stored token. Used by the endpoints that create a
    /// session, where a 401 means bad credentials rather than expiry.
    async fn send_anonymous<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let response = self.ensure_success(response, false).await?;
        Ok(response.json::<T>().await?)
    }

    /// Map a non-2xx response onto a [`ClientError`].
    ///
    /// A 401 on a request that carried a token means the session is gone:
    /// the token is cleared and [`ClientError::SessionExpired`] returned.
    async fn ensure_success(
        &self,
        response: Response,
        sent_token: bool,
    ) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED && sent_token {
            self.clear_token().await;
            tracing::info!(url = %response.url(), "Session expired, token cleared");
            return Err(ClientError::SessionExpired);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(ClientError::from_body(status.as_u16(), &body))
    }
}

fn with_image(form: Form, image: Option<ImageUpload>) -> Result<Form, ClientError> {
    let Some(image) = image else {
        return Ok(form);
    };
    let part = Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(&image.content_type)?;
    Ok(form.part("image", part))
}
