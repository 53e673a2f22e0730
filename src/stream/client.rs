//! Resilient event-stream client.
//!
//! Maintains a long-lived server-push connection against a single URL,
//! reconnecting on every failure until explicitly closed. Named events are
//! dispatched to handlers registered at spawn time; the dispatch table is
//! re-attached to each fresh connection. All retry state lives inside the
//! driver task, so independent clients coexist without interference.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};
use crate::models::StreamConfig;

use super::backoff::RetryPolicy;
use super::sse::{SseDecoder, SseEvent};

/// Raw byte stream produced by one transport connection.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Invoked each time a connection is established, initial or reconnect.
pub type OpenHandler = Box<dyn Fn() + Send + 'static>;

/// Invoked on every connection failure with the 1-based attempt number
/// and the delay before the next retry.
pub type ErrorHandler = Box<dyn Fn(&AppError, u32, Duration) + Send + 'static>;

/// Invoked with each decoded event carrying the registered name.
pub type EventHandler = Box<dyn Fn(&SseEvent) + Send + Sync + 'static>;

/// Connection factory seam. Production uses [`HttpTransport`]; tests
/// substitute scripted transports to simulate drops and failures.
#[async_trait]
pub trait StreamTransport: Send + Sync + 'static {
    /// Open a fresh connection and return its byte stream.
    async fn open(&self, url: &str) -> Result<ByteStream>;
}

/// HTTP transport for `text/event-stream` endpoints.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport from stream configuration.
    ///
    /// Only the connect phase is bounded; an established stream stays open
    /// indefinitely.
    pub fn new(config: &StreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl StreamTransport for HttpTransport {
    async fn open(&self, url: &str) -> Result<ByteStream> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?
            .error_for_status()?;

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(AppError::from))
            .boxed())
    }
}

/// Optional lifecycle callbacks.
#[derive(Default)]
pub struct StreamHooks {
    on_open: Option<OpenHandler>,
    on_error: Option<ErrorHandler>,
}

impl StreamHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an open callback.
    pub fn on_open(mut self, hook: impl Fn() + Send + 'static) -> Self {
        self.on_open = Some(Box::new(hook));
        self
    }

    /// Register an error callback.
    pub fn on_error(mut self, hook: impl Fn(&AppError, u32, Duration) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }
}

/// A running event-stream subscription.
///
/// Connection errors are never fatal; the driver retries with backoff
/// until [`close`](EventStreamClient::close) is called. Dropping the
/// client without closing stops the driver at its next await point.
pub struct EventStreamClient {
    shutdown: watch::Sender<bool>,
    driver: JoinHandle<()>,
}

impl EventStreamClient {
    /// Spawn the driver task and connect immediately.
    ///
    /// `listeners` pairs event names with handlers. The table is built once
    /// here and reused across reconnects; the last handler registered under
    /// a given name wins.
    pub fn spawn(
        url: impl Into<String>,
        transport: Arc<dyn StreamTransport>,
        retry: RetryPolicy,
        hooks: StreamHooks,
        listeners: Vec<(String, EventHandler)>,
    ) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handlers: HashMap<String, EventHandler> = listeners.into_iter().collect();
        let driver = tokio::spawn(drive(
            url.into(),
            transport,
            retry,
            hooks,
            handlers,
            shutdown_rx,
        ));
        Self { shutdown, driver }
    }

    /// Tear down the connection and cancel any pending reconnect.
    ///
    /// Waits for the driver to finish, so no `on_open`, `on_error`, or
    /// listener callback runs after this returns.
    pub async fn close(self) {
        let _ = self.shutdown.send(true);
        let _ = self.driver.await;
    }
}

enum ConnectionEnd {
    Closed,
    Failed(AppError),
}

async fn drive(
    url: String,
    transport: Arc<dyn StreamTransport>,
    retry: RetryPolicy,
    hooks: StreamHooks,
    handlers: HashMap<String, EventHandler>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut attempt: u32 = 0;
    loop {
        if *shutdown.borrow() {
            return;
        }

        let opened = tokio::select! {
            _ = shutdown.changed() => return,
            opened = transport.open(&url) => opened,
        };

        let error = match opened {
            Ok(stream) => {
                attempt = 0;
                if let Some(on_open) = &hooks.on_open {
                    on_open();
                }
                match pump(stream, &handlers, &mut shutdown).await {
                    ConnectionEnd::Closed => return,
                    ConnectionEnd::Failed(error) => error,
                }
            }
            Err(error) => error,
        };

        attempt += 1;
        let delay = retry.delay_for(attempt);
        log::warn!(
            "Stream connection lost (attempt {}, retrying in {:?}): {}",
            attempt,
            delay,
            error
        );
        if let Some(on_error) = &hooks.on_error {
            on_error(&error, attempt, delay);
        }

        tokio::select! {
            _ = shutdown.changed() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

async fn pump(
    mut stream: ByteStream,
    handlers: &HashMap<String, EventHandler>,
    shutdown: &mut watch::Receiver<bool>,
) -> ConnectionEnd {
    let mut decoder = SseDecoder::new();
    loop {
        let chunk = tokio::select! {
            _ = shutdown.changed() => return ConnectionEnd::Closed,
            chunk = stream.next() => chunk,
        };

        match chunk {
            Some(Ok(bytes)) => {
                for event in decoder.feed(&bytes) {
                    dispatch(handlers, &event);
                }
            }
            Some(Err(error)) => return ConnectionEnd::Failed(error),
            None => return ConnectionEnd::Failed(AppError::stream("connection", "closed by server")),
        }
    }
}

/// Handler panics are contained so one bad callback cannot take down the
/// reconnect loop.
fn dispatch(handlers: &HashMap<String, EventHandler>, event: &SseEvent) {
    let Some(handler) = handlers.get(&event.name) else {
        return;
    };
    if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
        log::warn!("Handler for event '{}' panicked", event.name);
    }
}
