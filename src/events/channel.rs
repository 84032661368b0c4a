//! Event channel built on crossbeam-channel.
//!
//! The runner publishes to an [`EventSender`]; whoever owns presentation
//! state drains the [`EventReceiver`] on its own thread.

use super::Event;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Publishing half of an event channel. Cheap to clone.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Publish an event. With no receiver left the event is dropped.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receiving half of an event channel.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Events until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Creates sender/receiver pairs.
pub struct EventChannel;

impl EventChannel {
    /// Unbounded: one small event per file never needs backpressure.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender nobody listens to, for runs without progress reporting.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}
