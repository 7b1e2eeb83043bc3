use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{Gateway, GatewayError, Session};
use crate::config::GatewayConfig;
use crate::query::TableQuery;
use crate::types::{BlobDescriptor, BlobOptions, Identity};

/// REST client for the hosted backend (row API, auth API, blob API)
pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder().user_agent(concat!("fleet-portal/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    fn base_url(&self) -> Result<Url, GatewayError> {
        if self.config.url.is_empty() {
            return Err(GatewayError::NotConfigured("GATEWAY_URL"));
        }
        Url::parse(&self.config.url).map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", self.config.url, e)))
    }

    fn anon_key(&self) -> Result<&str, GatewayError> {
        if self.config.anon_key.is_empty() {
            return Err(GatewayError::NotConfigured("GATEWAY_ANON_KEY"));
        }
        Ok(&self.config.anon_key)
    }

    /// `{base}/{segments...}` without losing any path prefix already on the base
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url()?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.config.url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn blob_endpoint(&self, pathname: &str) -> Result<Url, GatewayError> {
        let segments: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() || segments.iter().any(|s| *s == "." || *s == "..") {
            return Err(GatewayError::InvalidPathname(pathname.to_string()));
        }

        let mut url = Url::parse(&self.config.blob_api_url)
            .map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", self.config.blob_api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.config.blob_api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach the project key plus the caller's token (or the project key when anonymous)
    fn authorize(&self, request: RequestBuilder, session: &Session) -> Result<RequestBuilder, GatewayError> {
        let anon_key = self.anon_key()?;
        let bearer = session.access_token().unwrap_or(anon_key);
        Ok(request
            .header("apikey", anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer)))
    }
}

async fn ensure_success(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(GatewayError::status(status.as_u16(), message))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn query(&self, session: &Session, query: &TableQuery) -> Result<Vec<Value>, GatewayError> {
        let params = query.to_params()?;
        let url = self.endpoint(&["rest", "v1", query.table()])?;
        debug!("Gateway read {} {:?}", query.table(), params);

        let request = self
            .client
            .get(url)
            .query(&params)
            .header(header::ACCEPT, "application/json");
        let response = self.authorize(request, session)?.send().await?;
        let response = ensure_success(response).await?;
        decode(response).await
    }

    async fn current_identity(&self, session: &Session) -> Result<Option<Identity>, GatewayError> {
        if session.is_anonymous() {
            return Ok(None);
        }

        let url = self.endpoint(&["auth", "v1", "user"])?;
        let request = self.client.get(url).header(header::ACCEPT, "application/json");
        let response = self.authorize(request, session)?.send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("Gateway rejected session token ({})", response.status());
                Ok(None)
            }
            _ => {
                let response = ensure_success(response).await?;
                decode(response).await.map(Some)
            }
        }
    }

    async fn store_blob(
        &self,
        pathname: &str,
        body: Bytes,
        options: &BlobOptions,
    ) -> Result<BlobDescriptor, GatewayError> {
        if self.config.blob_token.is_empty() {
            return Err(GatewayError::NotConfigured("BLOB_READ_WRITE_TOKEN"));
        }
        let url = self.blob_endpoint(pathname)?;
        debug!("Gateway blob put {} ({} bytes)", pathname, body.len());

        let mut request = self
            .client
            .put(url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.blob_token))
            .header("x-access", options.access.as_str())
            .body(body);
        if let Some(content_type) = &options.content_type {
            request = request.header("x-content-type", content_type);
        }

        let response = ensure_success(request.send().await?).await?;
        decode(response).await
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        let url = self.endpoint(&["auth", "v1", "health"])?;
        let response = self.client.get(url).header("apikey", self.anon_key()?).send().await?;
        ensure_success(response).await.map(|_| ())
    }
}
