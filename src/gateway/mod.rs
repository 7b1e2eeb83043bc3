//! Capability boundary to the hosted backend: table reads, caller identity and blob storage.
//!
//! Handlers only ever see `dyn Gateway`; production wires in [`HttpGateway`], tests a fake.

pub mod http;
pub mod session;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

use crate::query::{QueryError, TableQuery};
use crate::types::{BlobDescriptor, BlobOptions, Identity};

pub use http::HttpGateway;
pub use session::Session;

/// Failure of a single gateway call. Handlers decide what the caller sees.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway not configured: {0} is unset")]
    NotConfigured(&'static str),

    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid blob pathname: {0:?}")]
    InvalidPathname(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("Gateway transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gateway returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        GatewayError::Status { status, message: message.into() }
    }
}

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Run a filtered, sorted read on behalf of `session`. Rows come back in gateway order.
    async fn query(&self, session: &Session, query: &TableQuery) -> Result<Vec<Value>, GatewayError>;

    /// Resolve the caller behind `session`; `Ok(None)` when there is no valid session.
    async fn current_identity(&self, session: &Session) -> Result<Option<Identity>, GatewayError>;

    /// Store `body` under `pathname` and return the blob subsystem's descriptor.
    async fn store_blob(
        &self,
        pathname: &str,
        body: Bytes,
        options: &BlobOptions,
    ) -> Result<BlobDescriptor, GatewayError>;

    /// Liveness check used by `/health`
    async fn ping(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}
