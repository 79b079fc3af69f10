//! WebSocket push channel.
//!
//! [`subscribe`] opens the socket and spawns a reader task that forwards text
//! frames over a channel. The task ends when the server closes the socket, on
//! a stream error, or when [`PushSubscription`] is closed.

use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use url::Url;
use whispernet_app::Subscription;

use super::TransportError;

const CHANNEL_CAPACITY: usize = 64;

/// Item delivered by the reader task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A raw text frame.
    Frame(String),
    /// The socket is gone. Always the last item.
    Closed(String),
}

/// Handle to an open push channel.
#[derive(Debug)]
pub struct PushSubscription {
    events: mpsc::Receiver<ChannelEvent>,
    abort_handle: Option<tokio::task::AbortHandle>,
    open: bool,
}

impl PushSubscription {
    /// Wrap an existing event channel. Used by tests and in-process servers.
    pub fn from_channel(events: mpsc::Receiver<ChannelEvent>) -> Self {
        Self { events, abort_handle: None, open: true }
    }

    /// Whether more events may arrive.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Next channel event.
    ///
    /// A dropped reader task is reported as [`ChannelEvent::Closed`]. After
    /// the first `Closed` the subscription is no longer open.
    pub async fn recv(&mut self) -> ChannelEvent {
        let event = self
            .events
            .recv()
            .await
            .unwrap_or_else(|| ChannelEvent::Closed("push channel ended".into()));
        if matches!(event, ChannelEvent::Closed(_)) {
            self.open = false;
        }
        event
    }
}

impl Subscription for PushSubscription {
    fn close(&mut self) {
        if let Some(handle) = self.abort_handle.take() {
            handle.abort();
        }
        self.events.close();
        self.open = false;
        tracing::debug!("push subscription closed");
    }
}

/// Connect to the push channel at `url`.
///
/// # Errors
///
/// [`TransportError::Connection`] if the WebSocket handshake fails.
pub async fn subscribe(url: &Url) -> Result<PushSubscription, TransportError> {
    let (stream, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| TransportError::Connection(format!("websocket connect to {url} failed: {e}")))?;
    tracing::info!(%url, "push channel connected");

    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let handle = tokio::spawn(read_frames(stream, tx));

    Ok(PushSubscription { events: rx, abort_handle: Some(handle.abort_handle()), open: true })
}

async fn read_frames<S>(mut stream: S, tx: mpsc::Sender<ChannelEvent>)
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let reason = loop {
        let message = match stream.next().await {
            Some(Ok(message)) => message,
            Some(Err(e)) => break TransportError::Stream(e.to_string()).to_string(),
            None => break "stream ended".to_owned(),
        };

        match message {
            Message::Text(text) => {
                if tx.send(ChannelEvent::Frame(text.as_str().to_owned())).await.is_err() {
                    return;
                }
            },
            Message::Close(frame) => {
                break frame
                    .map(|frame| frame.reason.as_str().to_owned())
                    .filter(|reason| !reason.is_empty())
                    .unwrap_or_else(|| "closed by server".to_owned());
            },
            Message::Binary(bytes) => {
                tracing::warn!(len = bytes.len(), "ignoring binary push frame");
            },
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {},
        }
    };

    tracing::info!(%reason, "push channel closed");
    let _ = tx.send(ChannelEvent::Closed(reason)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_then_close_from_stream() {
        let messages = vec![
            Ok(Message::text(r#"{"type":"PEER_LIST_UPDATE","payload":[]}"#)),
            Ok(Message::binary(vec![1, 2, 3])),
            Ok(Message::Close(None)),
            Ok(Message::text("after close")),
        ];
        let (tx, rx) = mpsc::channel(8);

        read_frames(futures_util::stream::iter(messages), tx).await;

        let mut subscription = PushSubscription::from_channel(rx);
        assert_eq!(
            subscription.recv().await,
            ChannelEvent::Frame(r#"{"type":"PEER_LIST_UPDATE","payload":[]}"#.into())
        );
        assert_eq!(subscription.recv().await, ChannelEvent::Closed("closed by server".into()));
        assert!(!subscription.is_open());
    }

    #[tokio::test]
    async fn exhausted_stream_reports_closed() {
        let (tx, rx) = mpsc::channel(8);
        read_frames(futures_util::stream::iter(Vec::new()), tx).await;

        let mut subscription = PushSubscription::from_channel(rx);
        assert_eq!(subscription.recv().await, ChannelEvent::Closed("stream ended".into()));
    }

    #[tokio::test]
    async fn close_stops_delivery() {
        let (tx, rx) = mpsc::channel(8);
        let mut subscription = PushSubscription::from_channel(rx);

        subscription.close();

        assert!(!subscription.is_open());
        assert!(tx.send(ChannelEvent::Frame("late".into())).await.is_err());
    }
}
