use crate::{ConnectionId, ConnectionRegistry};

use rx_core::Event;

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::response::sse;
use futures::Stream;
use log::warn;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;

/// The body of one SSE response: events from the connection's sink,
/// serialized into `data: <JSON>` frames.
///
/// Dropping the stream (client abort, response teardown) tears the
/// connection down: the guard aborts the scan task and removes the
/// registry entry.
pub struct EventStream {
    receiver: ReceiverStream<Event>,
    _guard: ConnectionGuard,
}

impl EventStream {
    pub(crate) fn new(receiver: mpsc::Receiver<Event>, guard: ConnectionGuard) -> Self {
        Self {
            receiver: ReceiverStream::new(receiver),
            _guard: guard,
        }
    }
}

impl Stream for EventStream {
    type Item = Result<sse::Event, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            match Pin::new(&mut this.receiver).poll_next(cx) {
                Poll::Ready(Some(event)) => match serde_json::to_string(&event) {
                    Ok(json) => return Poll::Ready(Some(Ok(sse::Event::default().data(json)))),
                    Err(e) => {
                        warn!("Failed to serialize event: {e}");
                        continue;
                    }
                },
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Ties a connection's lifetime to its SSE response body.
pub(crate) struct ConnectionGuard {
    registry: ConnectionRegistry,
    connection_id: ConnectionId,
    scan_task: JoinHandle<()>,
}

impl ConnectionGuard {
    pub(crate) fn new(
        registry: ConnectionRegistry,
        connection_id: ConnectionId,
        scan_task: JoinHandle<()>,
    ) -> Self {
        Self {
            registry,
            connection_id,
            scan_task,
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.scan_task.abort();

        // Deregistration is async; skip it when the runtime is already
        // tearing down (process exit drops all connections anyway)
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let registry = self.registry.clone();
            let connection_id = self.connection_id.clone();
            handle.spawn(async move {
                registry.unregister(&connection_id).await;
            });
        }
    }
}
