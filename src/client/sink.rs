//! Event sinks: where classified stream events go.
//!
//! The host owns the sink; the client only calls [`EventSink::deliver`] once
//! per event, in wire order, and keeps nothing. A failing sink is logged and
//! the stream continues.

use tokio::sync::mpsc;

use crate::error::SinkError;
use crate::types::StreamEvent;

/// Receiver of classified stream events.
///
/// Implemented for any `FnMut(StreamEvent) -> Result<(), SinkError>` closure
/// and for [`ChannelSink`].
pub trait EventSink: Send {
    /// Handle one event.
    fn deliver(&mut self, event: StreamEvent) -> Result<(), SinkError>;
}

impl<F> EventSink for F
where
    F: FnMut(StreamEvent) -> Result<(), SinkError> + Send,
{
    fn deliver(&mut self, event: StreamEvent) -> Result<(), SinkError> {
        (self)(event)
    }
}

/// Pin a closure to the sink signature so its argument and error types are
/// inferred.
///
/// # Example
///
/// ```
/// use a2a_chat::client::{sink_fn, EventSink};
///
/// let mut count = 0;
/// let mut sink = sink_fn(|_event| {
///     count += 1;
///     Ok(())
/// });
/// # let _ = &mut sink;
/// ```
pub fn sink_fn<F>(f: F) -> F
where
    F: FnMut(StreamEvent) -> Result<(), SinkError> + Send,
{
    f
}

/// Forwards events into an unbounded tokio channel.
///
/// Delivery fails once the receiving half is dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<StreamEvent>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    pub fn new(sender: mpsc::UnboundedSender<StreamEvent>) -> Self {
        Self { sender }
    }

    /// Create a sink together with the receiver it feeds.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn deliver(&mut self, event: StreamEvent) -> Result<(), SinkError> {
        self.sender
            .send(event)
            .map_err(|_| SinkError::from("event receiver dropped"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParseErrorFrame, StreamEvent};

    fn sample() -> StreamEvent {
        StreamEvent::ParseError(ParseErrorFrame {
            text: "x".into(),
            reason: "y".into(),
        })
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = sink_fn(|event| {
                seen.push(event);
                Ok(())
            });
            sink.deliver(sample()).unwrap();
            sink.deliver(sample()).unwrap();
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_channel_sink() {
        let (mut sink, mut rx) = ChannelSink::channel();
        sink.deliver(sample()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), sample());

        drop(rx);
        assert!(sink.deliver(sample()).is_err());
    }
}
