//! Scripted in-process backend for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use crate::NetworkClient;

pub(crate) struct Reply {
    pub delay: Duration,
    pub result: Result<HttpResponse, TransportError>,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self::raw(status, body.to_string().into_bytes())
    }

    pub fn raw(status: u16, body: Vec<u8>) -> Self {
        Self { delay: Duration::ZERO, result: Ok(HttpResponse { status, body }) }
    }

    pub fn fail(error: TransportError) -> Self {
        Self { delay: Duration::ZERO, result: Err(error) }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Handler = Box<dyn Fn(&HttpRequest) -> Reply + Send + Sync>;

/// Transport that answers from a closure and records what it was asked.
pub(crate) struct ScriptedTransport {
    handler: Handler,
    calls: AtomicUsize,
    delivered: AtomicUsize,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(handler: impl Fn(&HttpRequest) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: AtomicUsize::new(0),
            delivered: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests that reached the transport.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Responses handed back after their delay elapsed.
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = (self.handler)(&request);
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request);
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        self.delivered.fetch_add(1, Ordering::SeqCst);
        reply.result
    }
}

pub(crate) fn client_with(
    transport: &Arc<ScriptedTransport>,
    timeout: Duration,
) -> NetworkClient<Arc<ScriptedTransport>> {
    let config = ClientConfig::new("http://backend.test")
        .unwrap()
        .with_request_timeout(timeout);
    NetworkClient::with_transport(config, Arc::clone(transport))
}

pub(crate) fn route(request: &HttpRequest) -> (Method, String) {
    (request.method, request.url.path().to_owned())
}

pub(crate) fn game_json(id: &str, participants: &[&str], status: &str) -> Value {
    serde_json::json!({ "id": id, "participants": participants, "status": status })
}
