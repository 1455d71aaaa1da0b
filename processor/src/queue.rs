//! Hand-off between the task receiving device events and the task
//! processing them.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::dispatch::ReadingDispatcher;
use crate::error::QueueError;
use crate::event::Event;
use crate::traits::sink::ReadingSink;

/// Bounded queue of events, usable from a `static`.
pub struct EventQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, Event, N>,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue, waiting for room.
    pub async fn send(&self, event: Event) {
        self.channel.send(event).await
    }

    /// Enqueue without waiting.
    pub fn try_send(&self, event: Event) -> Result<(), QueueError> {
        self.channel.try_send(event).map_err(|_| QueueError::Full)
    }

    /// Wait for the next event.
    pub async fn next(&self) -> Event {
        self.channel.recv().await
    }

    pub fn try_next(&self) -> Option<Event> {
        self.channel.try_recv().ok()
    }

    /// Process every event currently queued.
    ///
    /// Returns the number of readings delivered to `sink`.
    pub fn drain<S: ReadingSink>(&self, dispatcher: &ReadingDispatcher, sink: &mut S) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.try_next() {
            delivered += dispatcher.handle_event(&event, sink);
        }
        if delivered > 0 {
            debug!("Drained {} readings", delivered);
        }
        delivered
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
