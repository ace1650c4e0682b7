//! Streaming relay of the upstream body to the client.
//!
//! # Responsibilities
//! - Forward each upstream chunk as soon as it arrives
//! - Log the outcome of the copy: completed, upstream error, or client gone
//!
//! # Design Decisions
//! - Headers are committed before the first chunk, so failures here are
//!   log-only. An upstream error is passed on so the server aborts the
//!   response instead of ending it cleanly.
//! - A client disconnect surfaces as the server dropping the stream
//!   before it finished; `Drop` reports it.
//! - Log events are emitted inside the span of the request that started the relay.

use std::fmt::Display;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Bytes;
use axum::http::HeaderValue;
use futures_util::{ready, Stream};
use tracing::Span;

use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelayState {
    Streaming,
    Complete,
    Failed,
}

impl RelayState {
    /// Metric label for a relay that ends in this state. A relay dropped
    /// while still streaming was abandoned by the client.
    fn outcome(self) -> &'static str {
        match self {
            RelayState::Streaming => "client_gone",
            RelayState::Complete => "complete",
            RelayState::Failed => "upstream_error",
        }
    }
}

/// Wraps an upstream body stream and reports how the copy ended.
pub struct RelayStream<S> {
    inner: S,
    content_type: HeaderValue,
    bytes: u64,
    state: RelayState,
    span: Span,
}

impl<S> RelayStream<S> {
    /// Wrap `inner`, attributing logs to the current span.
    pub fn new(inner: S, content_type: HeaderValue) -> Self {
        Self {
            inner,
            content_type,
            bytes: 0,
            state: RelayState::Streaming,
            span: Span::current(),
        }
    }

    /// Bytes forwarded so far.
    pub fn bytes_relayed(&self) -> u64 {
        self.bytes
    }

    /// How the relay ends if it is dropped now.
    pub fn outcome(&self) -> &'static str {
        self.state.outcome()
    }
}

impl<S, E> Stream for RelayStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    type Item = Result<Bytes, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.state != RelayState::Streaming {
            return Poll::Ready(None);
        }

        match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
            Some(Ok(chunk)) => {
                this.bytes += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Some(Err(e)) => {
                this.state = RelayState::Failed;
                let _enter = this.span.enter();
                tracing::error!(
                    error = %e,
                    bytes_relayed = this.bytes,
                    "Failed to stream image data to client"
                );
                metrics::record_relay(this.outcome(), this.bytes);
                Poll::Ready(Some(Err(e)))
            }
            None => {
                this.state = RelayState::Complete;
                let _enter = this.span.enter();
                tracing::info!(
                    content_type = ?this.content_type,
                    bytes = this.bytes,
                    "Successfully served image"
                );
                metrics::record_relay(this.outcome(), this.bytes);
                Poll::Ready(None)
            }
        }
    }
}

impl<S> Drop for RelayStream<S> {
    fn drop(&mut self) {
        if self.state == RelayState::Streaming {
            let _enter = self.span.enter();
            tracing::warn!(
                bytes_relayed = self.bytes,
                "Client went away before the image was fully relayed"
            );
            metrics::record_relay(self.outcome(), self.bytes);
        }
    }
}
