use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::instrument;
use url::Url;

use crate::types::{OfflineError, Response, ResponseType};

/// Where cache misses are sent.
pub trait Network: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Response, OfflineError>> + Send;
}

/// Plain HTTP through reqwest.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: Client,
    origin: Url,
}

impl HttpNetwork {
    pub fn new(origin: Url) -> Result<Self, OfflineError> {
        let client = Client::builder()
            .build()
            .map_err(|e| OfflineError::Network(e.to_string()))?;
        Ok(Self { client, origin })
    }

    fn response_type(&self, url: &Url) -> ResponseType {
        if url.origin() == self.origin.origin() {
            ResponseType::Basic
        } else {
            ResponseType::Cors
        }
    }
}

impl Network for HttpNetwork {
    #[instrument(skip(self), fields(url = %url), level = "debug")]
    async fn fetch(&self, url: &Url) -> Result<Response, OfflineError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| OfflineError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response
            .bytes()
            .await
            .map_err(|e| OfflineError::Network(e.to_string()))?;

        tracing::debug!(status, bytes = body.len(), "Network response");
        Ok(Response {
            status,
            response_type: self.response_type(url),
            content_type,
            body: body.to_vec(),
        })
    }
}
