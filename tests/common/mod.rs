#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tokio::task::JoinHandle;

use fleet_portal::api::{app, AppState};
use fleet_portal::config::AppConfig;
use fleet_portal::gateway::{Gateway, GatewayError, Session};
use fleet_portal::query::{SortDirection, TableQuery};
use fleet_portal::types::{BlobDescriptor, BlobOptions, Identity};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serve the real router in-process against `gateway`
pub async fn spawn_server(gateway: Arc<FakeGateway>, config: AppConfig) -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind {}", base_url))?;
    let router = app(AppState::new(gateway, config));

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(TestServer { port, base_url, handle })
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.api.enable_request_logging = false;
    config
}

/// Client that reports redirects instead of following them
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}

pub enum IdentityReply {
    Present(Identity),
    Absent,
    Fail,
}

#[derive(Default)]
pub struct CallCounts {
    pub query: AtomicUsize,
    pub identity: AtomicUsize,
    pub blob: AtomicUsize,
    pub ping: AtomicUsize,
}

impl CallCounts {
    pub fn query(&self) -> usize {
        self.query.load(Ordering::SeqCst)
    }

    pub fn identity(&self) -> usize {
        self.identity.load(Ordering::SeqCst)
    }

    pub fn blob(&self) -> usize {
        self.blob.load(Ordering::SeqCst)
    }
}

pub struct StoredBlob {
    pub pathname: String,
    pub body: Bytes,
    pub options: BlobOptions,
}

/// Scripted gateway: canned replies, recorded calls. Reads honor the requested
/// order like the real backend would, but return rows unprojected.
pub struct FakeGateway {
    rows: Option<Vec<Value>>,
    identity: IdentityReply,
    blob: Option<Value>,
    healthy: bool,
    pub calls: CallCounts,
    pub last_query: Mutex<Option<TableQuery>>,
    pub last_session: Mutex<Option<Session>>,
    pub last_blob: Mutex<Option<StoredBlob>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            rows: Some(Vec::new()),
            identity: IdentityReply::Absent,
            blob: None,
            healthy: true,
            calls: CallCounts::default(),
            last_query: Mutex::new(None),
            last_session: Mutex::new(None),
            last_blob: Mutex::new(None),
        }
    }

    pub fn with_rows(mut self, rows: Vec<Value>) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.rows = None;
        self
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = IdentityReply::Present(identity);
        self
    }

    pub fn failing_identity(mut self) -> Self {
        self.identity = IdentityReply::Fail;
        self
    }

    pub fn with_blob(mut self, descriptor: Value) -> Self {
        self.blob = Some(descriptor);
        self
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn last_query(&self) -> Option<TableQuery> {
        self.last_query.lock().unwrap().clone()
    }

    pub fn last_session(&self) -> Option<Session> {
        self.last_session.lock().unwrap().clone()
    }
}

fn sort_key(row: &Value, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn query(&self, session: &Session, query: &TableQuery) -> Result<Vec<Value>, GatewayError> {
        self.calls.query.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        *self.last_session.lock().unwrap() = Some(session.clone());

        let mut rows = self
            .rows
            .clone()
            .ok_or_else(|| GatewayError::status(503, "upstream connection refused"))?;

        for order in query.order().iter().rev() {
            rows.sort_by(|a, b| {
                let ordering = sort_key(a, &order.column).cmp(&sort_key(b, &order.column));
                match order.sort {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        Ok(rows)
    }

    async fn current_identity(&self, session: &Session) -> Result<Option<Identity>, GatewayError> {
        self.calls.identity.fetch_add(1, Ordering::SeqCst);
        *self.last_session.lock().unwrap() = Some(session.clone());

        match &self.identity {
            IdentityReply::Present(identity) => Ok(Some(identity.clone())),
            IdentityReply::Absent => Ok(None),
            IdentityReply::Fail => Err(GatewayError::Decode("auth service timed out".to_string())),
        }
    }

    async fn store_blob(
        &self,
        pathname: &str,
        body: Bytes,
        options: &BlobOptions,
    ) -> Result<BlobDescriptor, GatewayError> {
        self.calls.blob.fetch_add(1, Ordering::SeqCst);
        *self.last_blob.lock().unwrap() = Some(StoredBlob {
            pathname: pathname.to_string(),
            body,
            options: options.clone(),
        });

        match &self.blob {
            Some(descriptor) => Ok(BlobDescriptor(descriptor.clone())),
            None => Err(GatewayError::status(500, "bucket quota exceeded for store_abc123")),
        }
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        self.calls.ping.fetch_add(1, Ordering::SeqCst);
        if self.healthy {
            Ok(())
        } else {
            Err(GatewayError::status(503, "maintenance"))
        }
    }
}

pub fn identity() -> Identity {
    serde_json::from_value(serde_json::json!({
        "id": "7d9f3a2e-4c1b-4f7e-9a51-2b8c6d0e1f34",
        "email": "dispatch@example.com",
        "role": "authenticated"
    }))
    .expect("identity fixture")
}
