//! Record API client.
//!
//! `InterpretationApi` is the seam between the views and the backend. The
//! terminal client uses `HttpApi`; tests substitute an in-memory fake.

use crate::error::{ApiError, ApiResult};
use crate::model::{Envelope, Interpretation, InterpretationDraft};
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Path segment of the record collection below the base URL
pub const COLLECTION: &str = "interpretations";

/// List/get/create/update/delete for interpretation records.
pub trait InterpretationApi {
    fn list(&self) -> ApiResult<Vec<Interpretation>>;
    fn get(&self, id: &str) -> ApiResult<InterpretationDraft>;
    fn create(&self, draft: &InterpretationDraft) -> ApiResult<()>;
    fn update(&self, id: &str, draft: &InterpretationDraft) -> ApiResult<()>;
    /// Best effort: only a transport failure is an error.
    fn delete(&self, id: &str) -> ApiResult<()>;
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL the collection path is appended to
    pub base_url: String,
    /// Request timeout; `None` keeps the HTTP client's default
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

/// Blocking HTTP implementation of [`InterpretationApi`].
pub struct HttpApi {
    client: Client,
    collection: Url,
}

impl HttpApi {
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let collection = collection_url(&config.base_url)?;

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, collection })
    }

    pub fn collection(&self) -> &Url {
        &self.collection
    }

    /// URL of a single record; the id becomes one percent-encoded segment.
    pub fn record_url(&self, id: &str) -> Url {
        let mut url = self.collection.clone();
        // collection_url() already rejected cannot-be-a-base URLs
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    fn send(
        &self,
        method: &'static str,
        url: &Url,
        request: reqwest::blocking::RequestBuilder,
    ) -> ApiResult<Response> {
        tracing::debug!(method, url = %url, "sending request");
        request
            .send()
            .map_err(|e| {
                tracing::warn!(method, url = %url, error = %e, "request failed");
                ApiError::transport(url.as_str(), e)
            })
    }
}

fn collection_url(base_url: &str) -> ApiResult<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ApiError::Config(format!("invalid base URL {base_url:?}: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| ApiError::Config(format!("base URL {base_url:?} cannot have a path")))?
        .pop_if_empty()
        .push(COLLECTION);

    Ok(url)
}

fn check_status(method: &'static str, url: &Url, response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    tracing::warn!(method, url = %url, status = status.as_u16(), "non-success status");
    Err(ApiError::Status {
        method,
        url: url.to_string(),
        status: status.as_u16(),
    })
}

impl InterpretationApi for HttpApi {
    fn list(&self) -> ApiResult<Vec<Interpretation>> {
        let url = &self.collection;
        let response = self.send("GET", url, self.client.get(url.clone()))?;
        let response = check_status("GET", url, response)?;

        response
            .json::<Vec<Interpretation>>()
            .map_err(|e| ApiError::decode(url.as_str(), e))
    }

    fn get(&self, id: &str) -> ApiResult<InterpretationDraft> {
        let url = self.record_url(id);
        let response = self.send("GET", &url, self.client.get(url.clone()))?;
        let response = check_status("GET", &url, response)?;

        let envelope = response
            .json::<Envelope<InterpretationDraft>>()
            .map_err(|e| ApiError::decode(url.as_str(), e))?;
        Ok(envelope.interpretation)
    }

    fn create(&self, draft: &InterpretationDraft) -> ApiResult<()> {
        let url = &self.collection;
        let response = self.send("POST", url, self.client.post(url.clone()).json(draft))?;
        check_status("POST", url, response)?;
        Ok(())
    }

    fn update(&self, id: &str, draft: &InterpretationDraft) -> ApiResult<()> {
        let url = self.record_url(id);
        let response = self.send("PUT", &url, self.client.put(url.clone()).json(draft))?;
        check_status("PUT", &url, response)?;
        Ok(())
    }

    fn delete(&self, id: &str) -> ApiResult<()> {
        let url = self.record_url(id);
        let response = self.send("DELETE", &url, self.client.delete(url.clone()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "delete not acknowledged");
        }
        Ok(())
    }
}
