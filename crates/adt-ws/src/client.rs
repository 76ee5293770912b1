use std::collections::HashMap;
use std::fmt::Display;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, oneshot, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

use crate::envelope::{Envelope, WsEvent};
use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone)]
pub struct WsClientConfig {
    pub request_timeout: Duration,
    pub event_channel_size: usize,
}

impl Default for WsClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            event_channel_size: 64,
        }
    }
}

type BoxSink = Pin<Box<dyn Sink<String, Error = Error> + Send>>;
type Pending = HashMap<String, oneshot::Sender<Result<Value>>>;

struct Inner {
    writer: Mutex<BoxSink>,
    pending: Mutex<Pending>,
    events: broadcast::Sender<WsEvent>,
    shutdown: CancellationToken,
    config: WsClientConfig,
}

/// Request/response client over any text message transport.
///
/// Each request gets a fresh UUID; a background task routes responses and
/// errors back to the waiting caller and broadcasts events. Must be created
/// inside a Tokio runtime.
///
/// ```rust,ignore
/// let (sink, stream) = socket.split();
/// let client = WsRpcClient::new(sink, stream);
/// let version: String = client.request_typed("system.version", &()).await?;
/// ```
#[derive(Clone)]
pub struct WsRpcClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for WsRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsRpcClient")
            .field("config", &self.inner.config)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl WsRpcClient {
    pub fn new<Tx, Rx, E>(sink: Tx, stream: Rx) -> Self
    where
        Tx: Sink<String> + Send + 'static,
        Tx::Error: Display,
        Rx: Stream<Item = std::result::Result<String, E>> + Send + Unpin + 'static,
        E: Display + Send + 'static,
    {
        Self::with_config(sink, stream, WsClientConfig::default())
    }

    pub fn with_config<Tx, Rx, E>(sink: Tx, stream: Rx, config: WsClientConfig) -> Self
    where
        Tx: Sink<String> + Send + 'static,
        Tx::Error: Display,
        Rx: Stream<Item = std::result::Result<String, E>> + Send + Unpin + 'static,
        E: Display + Send + 'static,
    {
        let writer: BoxSink = Box::pin(
            sink.sink_map_err(|e| Error::new(ErrorKind::Transport(e.to_string()))),
        );
        let (events, _) = broadcast::channel(config.event_channel_size.max(1));
        let inner = Arc::new(Inner {
            writer: Mutex::new(writer),
            pending: Mutex::new(HashMap::new()),
            events,
            shutdown: CancellationToken::new(),
            config,
        });
        tokio::spawn(read_loop(stream, inner.clone()));
        Self { inner }
    }

    /// Send `operation` and wait for its result with the configured timeout.
    pub async fn request(&self, operation: &str, params: Value) -> Result<Value> {
        self.request_with_timeout(operation, params, self.inner.config.request_timeout)
            .await
    }

    #[instrument(skip(self, params))]
    pub async fn request_with_timeout(
        &self,
        operation: &str,
        params: Value,
        timeout: Duration,
    ) -> Result<Value> {
        if self.is_closed() {
            return Err(Error::new(ErrorKind::Shutdown));
        }

        let id = Uuid::new_v4().to_string();
        let (tx, rx) = oneshot::channel();
        self.inner.pending.lock().await.insert(id.clone(), tx);

        let text = serde_json::to_string(&Envelope::request(id.clone(), operation, params))?;
        let sent = {
            let mut writer = self.inner.writer.lock().await;
            writer.send(text).await
        };
        if let Err(err) = sent {
            self.remove_pending(&id).await;
            return Err(err);
        }
        trace!(%id, "Request sent");

        // An answer already delivered wins over a shutdown racing it.
        tokio::select! {
            biased;
            res = tokio::time::timeout(timeout, rx) => match res {
                Ok(Ok(result)) => result,
                Ok(Err(_closed)) => Err(Error::new(ErrorKind::ConnectionClosed)),
                Err(_elapsed) => {
                    self.remove_pending(&id).await;
                    Err(Error::new(ErrorKind::Timeout {
                        operation: operation.to_string(),
                        after: timeout,
                    }))
                }
            },
            _ = self.inner.shutdown.cancelled() => {
                self.remove_pending(&id).await;
                Err(Error::new(ErrorKind::Shutdown))
            }
        }
    }

    /// [`request`](Self::request) with serde conversion on both ends.
    pub async fn request_typed<P, R>(&self, operation: &str, params: &P) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)?;
        let result = self.request(operation, params).await?;
        Ok(serde_json::from_value(result)?)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WsEvent> {
        self.inner.events.subscribe()
    }

    /// Stop the reader and fail every waiting request.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Requests still waiting for an answer.
    pub async fn pending_requests(&self) -> usize {
        self.inner.pending.lock().await.len()
    }

    async fn remove_pending(&self, id: &str) {
        self.inner.pending.lock().await.remove(id);
    }
}

async fn read_loop<Rx, E>(mut stream: Rx, inner: Arc<Inner>)
where
    Rx: Stream<Item = std::result::Result<String, E>> + Unpin,
    E: Display,
{
    loop {
        let next = tokio::select! {
            _ = inner.shutdown.cancelled() => break,
            next = stream.next() => next,
        };
        match next {
            Some(Ok(text)) => dispatch(&inner, &text).await,
            Some(Err(err)) => {
                warn!(error = %err, "WebSocket read failed");
                break;
            }
            None => {
                debug!("WebSocket stream ended");
                break;
            }
        }
    }

    let pending = std::mem::take(&mut *inner.pending.lock().await);
    for (_id, tx) in pending {
        let _ = tx.send(Err(Error::new(ErrorKind::ConnectionClosed)));
    }
    inner.shutdown.cancel();
}

async fn dispatch(inner: &Inner, text: &str) {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "Ignoring malformed envelope");
            return;
        }
    };

    let (id, outcome) = match envelope {
        Envelope::Response { id, result } => (id, Ok(result)),
        Envelope::Error {
            id: Some(id),
            error,
        } => (
            id,
            Err(Error::new(ErrorKind::Remote {
                message: error.message,
                code: error.code,
            })),
        ),
        Envelope::Error { id: None, error } => {
            warn!(message = %error.message, "Error without correlation id");
            return;
        }
        Envelope::Event { data } => {
            // No subscribers is not an error.
            let _ = inner.events.send(WsEvent { data });
            return;
        }
        Envelope::Request { operation, .. } => {
            debug!(%operation, "Ignoring server-initiated request");
            return;
        }
    };

    let waiter = inner.pending.lock().await.remove(&id);
    match waiter {
        Some(tx) => {
            let _ = tx.send(outcome);
        }
        None => debug!(%id, "Answer for unknown or expired request"),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::pair;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_responses_are_correlated_by_id() {
        let (client, mut server) = pair(WsClientConfig::default());

        let first = tokio::spawn({
            let client = client.clone();
            async move { client.request("echo", json!("first")).await }
        });
        let (first_id, operation, params) = server.next_request().await;
        assert_eq!(operation, "echo");
        assert_eq!(params, json!("first"));

        let second = tokio::spawn({
            let client = client.clone();
            async move { client.request("echo", json!("second")).await }
        });
        let (second_id, _, _) = server.next_request().await;
        assert_ne!(first_id, second_id);

        server.respond(&second_id, json!(2));
        server.respond(&first_id, json!(1));

        assert_eq!(first.await.unwrap().unwrap(), json!(1));
        assert_eq!(second.await.unwrap().unwrap(), json!(2));
        assert_eq!(client.pending_requests().await, 0);
    }

    #[tokio::test]
    async fn test_error_envelope_fails_request() {
        let (client, mut server) = pair(WsClientConfig::default());
        let call = tokio::spawn({
            let client = client.clone();
            async move { client.request("debugger.attach", Value::Null).await }
        });
        let (id, _, _) = server.next_request().await;
        server.send(json!({
            "id": id,
            "type": "error",
            "error": { "message": "debuggee gone", "code": 410 }
        }));

        let err = call.await.unwrap().unwrap_err();
        match err.kind {
            ErrorKind::Remote { message, code } => {
                assert_eq!(message, "debuggee gone");
                assert_eq!(code, Some(json!(410)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_clears_pending() {
        let (client, mut server) = pair(WsClientConfig::default());
        let call = tokio::spawn({
            let client = client.clone();
            async move {
                client
                    .request_with_timeout("slow", Value::Null, Duration::from_millis(50))
                    .await
            }
        });
        let (id, _, _) = server.next_request().await;

        let err = call.await.unwrap().unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(client.pending_requests().await, 0);

        // A late answer is dropped without disturbing the client.
        server.respond(&id, json!("late"));
        assert!(!client.is_closed());
    }

    #[tokio::test]
    async fn test_stream_end_fails_pending_requests() {
        let (client, mut server) = pair(WsClientConfig::default());
        let call = tokio::spawn({
            let client = client.clone();
            async move { client.request("never", Value::Null).await }
        });
        server.next_request().await;
        drop(server);

        let err = call.await.unwrap().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConnectionClosed));
        assert!(client.is_closed());
        let err = client.request("after", Value::Null).await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Shutdown));
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let (client, server) = pair(WsClientConfig::default());
        let mut first = client.subscribe_events();
        let mut second = client.subscribe_events();

        server.send(json!({ "type": "event", "event": "breakpointReached", "line": 7 }));

        let event = first.recv().await.unwrap();
        assert_eq!(event.name(), Some("breakpointReached"));
        assert_eq!(second.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_malformed_messages_are_skipped() {
        let (client, mut server) = pair(WsClientConfig::default());
        let call = tokio::spawn({
            let client = client.clone();
            async move { client.request_typed::<_, u32>("count", &json!({})).await }
        });
        let (id, _, _) = server.next_request().await;
        server
            .replies
            .unbounded_send(Ok("not json".to_string()))
            .unwrap();
        server.respond(&id, json!(3));
        assert_eq!(call.await.unwrap().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_requests() {
        let (client, _server) = pair(WsClientConfig::default());
        client.shutdown();
        let err = client.request("ping", Value::Null).await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Shutdown));
    }
}
