use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    multipart::Form,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_session::SessionContext;

use crate::error::GatewayError;

/// The single outbound pipeline every service call goes through.
///
/// Outbound, the current session token (if any) is attached as a bearer
/// credential. Inbound, a 401 tears the session down and publishes one
/// invalidation before the failure is returned unchanged. Nothing is retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: SessionContext) -> Result<Self, AppError> {
        if !config.is_configured() {
            return Err(AppError::Config(format!(
                "Invalid API base URL: '{}'",
                config.api_base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(token) = self.session.token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored session token is not a valid header value, sending unauthenticated"),
            }
        }

        headers
    }

    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response, GatewayError> {
        let response = builder.headers(self.get_headers()).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("API error ({}): {}", status, body);

        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate();
        }

        Err(GatewayError::Status { status, body })
    }

    async fn parse<T>(response: Response) -> Result<T, GatewayError>
    where T: DeserializeOwned {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!("Failed to decode response body: {}", e);
            GatewayError::Decode(e.to_string())
        })
    }

    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url);
        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        let response = self.dispatch(req).await?;
        Self::parse(response).await
    }

    pub async fn get<T>(&self, path: &str) -> Result<T, GatewayError>
    where T: DeserializeOwned {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    /// GET with query pairs, emitted in the given order. Repeated keys are allowed.
    pub async fn get_with_query<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, GatewayError>
    where T: DeserializeOwned {
        let url = self.url(path);
        debug!("Making GET request to {} with {} query parameter(s)", url, query.len());

        let mut req = self.client.get(&url);
        if !query.is_empty() {
            req = req.query(query);
        }

        let response = self.dispatch(req).await?;
        Self::parse(response).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// DELETE; any success body (usually 204) is discarded.
    pub async fn delete(&self, path: &str) -> Result<(), GatewayError> {
        let url = self.url(path);
        debug!("Making DELETE request to {}", url);

        self.dispatch(self.client.delete(&url)).await?;
        Ok(())
    }

    pub async fn post_multipart<T>(&self, path: &str, form: Form) -> Result<T, GatewayError>
    where T: DeserializeOwned {
        let url = self.url(path);
        debug!("Making multipart POST request to {}", url);

        let response = self.dispatch(self.client.post(&url).multipart(form)).await?;
        Self::parse(response).await
    }
}
