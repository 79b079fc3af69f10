//! Terminal driver.
//!
//! Implements [`Driver`] over line-based input, the WebSocket push channel
//! and HTTP sends. Input lines, push frames and send failures are
//! multiplexed with `tokio::select!`; whichever is ready first becomes the
//! next [`AppEvent`].

use std::io::{self, Write};

use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, Lines},
    sync::mpsc,
};
use url::Url;
use whispernet_app::{App, AppEvent, Driver};
use whispernet_core::{Clock, SendRequest};

use crate::{
    Config,
    input::parse_line,
    render::render,
    transport::{self, ChannelEvent, HttpSender, PushSubscription, TransportError},
};

/// Driver errors.
#[derive(Debug, Error)]
pub enum DriverError {
    /// I/O error reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Driver for the line-based terminal client.
///
/// Generic over input and output so tests can script both.
pub struct TerminalDriver<R, W> {
    input: Lines<R>,
    output: W,
    push_url: Url,
    sender: HttpSender,
    feedback: mpsc::UnboundedReceiver<AppEvent>,
}

impl<R, W> TerminalDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Create a driver for `config`.
    pub fn new(config: &Config, input: R, output: W) -> Self {
        let (feedback_tx, feedback) = mpsc::unbounded_channel();
        Self {
            input: input.lines(),
            output,
            push_url: config.push_url.clone(),
            sender: HttpSender::new(config.send_url.clone(), feedback_tx),
            feedback,
        }
    }

    /// Rendered output so far.
    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R, W> Driver for TerminalDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    type Error = DriverError;
    type Subscription = PushSubscription;

    async fn subscribe(&mut self) -> Result<PushSubscription, DriverError> {
        Ok(transport::push::subscribe(&self.push_url).await?)
    }

    async fn poll_event(
        &mut self,
        subscription: &mut PushSubscription,
    ) -> Result<Option<AppEvent>, DriverError> {
        let push_open = subscription.is_open();

        tokio::select! {
            line = self.input.next_line() => Ok(line?.map(|line| parse_line(&line))),
            event = subscription.recv(), if push_open => Ok(Some(match event {
                ChannelEvent::Frame(frame) => AppEvent::Push(frame),
                ChannelEvent::Closed(reason) => AppEvent::ChannelClosed { reason },
            })),
            Some(event) = self.feedback.recv() => Ok(Some(event)),
        }
    }

    fn dispatch(&mut self, request: SendRequest) {
        self.sender.dispatch(request);
    }

    fn render<C: Clock>(&mut self, app: &App<C>) -> Result<(), DriverError> {
        Ok(render(&mut self.output, app)?)
    }
}

#[cfg(test)]
mod tests {
    use whispernet_app::{KeyInput, Subscription};
    use whispernet_core::FocusPolicy;

    use super::*;

    fn driver(input: &'static [u8]) -> TerminalDriver<&'static [u8], Vec<u8>> {
        let config = Config::new("127.0.0.1:9", FocusPolicy::Manual).unwrap();
        TerminalDriver::new(&config, input, Vec::new())
    }

    #[tokio::test]
    async fn lines_become_events_until_eof() {
        let mut driver = driver(b":down\nhello\n");
        let (_tx, rx) = mpsc::channel(1);
        let mut subscription = PushSubscription::from_channel(rx);

        let first = driver.poll_event(&mut subscription).await.unwrap();
        let second = driver.poll_event(&mut subscription).await.unwrap();
        let third = driver.poll_event(&mut subscription).await.unwrap();

        assert_eq!(first, Some(AppEvent::Key(KeyInput::Down)));
        assert_eq!(second, Some(AppEvent::Submit("hello".into())));
        assert_eq!(third, None);
    }

    #[tokio::test]
    async fn push_frames_and_close_are_delivered() {
        let mut driver = driver(b"");
        let (tx, rx) = mpsc::channel(4);
        tx.send(ChannelEvent::Frame("{}".into())).await.unwrap();
        drop(tx);
        let mut subscription = PushSubscription::from_channel(rx);

        // EOF on input races the channel; loop until the channel is drained.
        let mut seen = Vec::new();
        while subscription.is_open() {
            if let Some(event) = driver.poll_event(&mut subscription).await.unwrap() {
                seen.push(event);
            }
        }

        assert!(seen.contains(&AppEvent::Push("{}".into())));
        assert!(seen.iter().any(|event| matches!(event, AppEvent::ChannelClosed { .. })));
        subscription.close();
    }

    #[tokio::test]
    async fn render_writes_to_output() {
        let mut driver = driver(b"");
        let app = App::new(whispernet_core::SystemClock, FocusPolicy::Manual);

        driver.render(&app).unwrap();

        let text = String::from_utf8(driver.output().clone()).unwrap();
        assert!(text.starts_with("== WhisperNet [disconnected]"));
    }
}
