//! Outbound message delivery over HTTP.
//!
//! [`HttpSender::dispatch`] spawns the POST and returns immediately. The
//! message is already in the local log by then; a failure only produces an
//! [`AppEvent::SendFailed`] on the feedback channel.

use std::time::Duration;

use tokio::sync::mpsc;
use url::Url;
use whispernet_app::AppEvent;
use whispernet_core::SendRequest;

use super::TransportError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fire-and-forget HTTP sender.
#[derive(Debug, Clone)]
pub struct HttpSender {
    client: reqwest::Client,
    url: Url,
    feedback: mpsc::UnboundedSender<AppEvent>,
}

impl HttpSender {
    /// Create a sender posting to `url`, reporting failures on `feedback`.
    pub fn new(url: Url, feedback: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { client: reqwest::Client::new(), url, feedback }
    }

    /// Target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Spawn delivery of `request` on the current tokio runtime.
    pub fn dispatch(&self, request: SendRequest) {
        let client = self.client.clone();
        let url = self.url.clone();
        let feedback = self.feedback.clone();

        tokio::spawn(async move {
            match post(&client, url, &request).await {
                Ok(()) => tracing::debug!(recipient = %request.recipient, "message delivered"),
                Err(error) => {
                    tracing::warn!(recipient = %request.recipient, %error, "message delivery failed");
                    let _ = feedback.send(AppEvent::SendFailed {
                        recipient: request.recipient,
                        error: error.to_string(),
                    });
                },
            }
        });
    }
}

/// POST one request. Any non-2xx status is a failure.
///
/// # Errors
///
/// - [`TransportError::Http`] if the request could not be made
/// - [`TransportError::Status`] if the server rejected it
pub async fn post(
    client: &reqwest::Client,
    url: Url,
    request: &SendRequest,
) -> Result<(), TransportError> {
    let response = client.post(url).json(request).timeout(REQUEST_TIMEOUT).send().await?;

    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(TransportError::Status(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_server_reports_send_failed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        // Port 9 on loopback (discard) is closed on test machines.
        let url = Url::parse("http://127.0.0.1:9/api/send").unwrap();
        let sender = HttpSender::new(url, tx);

        sender.dispatch(SendRequest::new("10.0.0.2", "hello"));

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            AppEvent::SendFailed { ref recipient, .. } if recipient == "10.0.0.2"
        ));
    }
}
