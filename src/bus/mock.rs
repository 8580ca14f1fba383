//! # Mock Bus Utilities
//!
//! [`EventRecorder`] captures everything published on a bus so tests can assert on the
//! exact event sequence.
//!
//! ```ignore
//! let mut recorder = EventRecorder::new(bus.events());
//! service.read(command.into()).await;
//! let events = recorder.drain();
//! assert_eq!(EventRecorder::kinds(&events), vec![EventKind::ReadDone, EventKind::DataChanged]);
//! ```

use crate::model::{Event, EventKind};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Collects published events for assertions.
pub struct EventRecorder {
    receiver: broadcast::Receiver<Event>,
}

impl EventRecorder {
    pub fn new(receiver: broadcast::Receiver<Event>) -> Self {
        Self { receiver }
    }

    /// Returns every event published so far, without waiting.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    panic!("Event recorder lagged, {skipped} events lost")
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return events,
            }
        }
    }

    /// Waits for the next event, panicking after `timeout`.
    pub async fn next(&mut self, timeout: Duration) -> Event {
        match tokio::time::timeout(timeout, self.receiver.recv()).await {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => panic!("Event channel failed: {e}"),
            Err(_) => panic!("No event within {timeout:?}"),
        }
    }

    /// Waits until a terminal event (`DataChanged` / `DataError`) arrives and returns
    /// every event seen up to and including it.
    pub async fn until_terminal(&mut self, timeout: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            let event = self.next(timeout).await;
            let done = event.is_terminal();
            events.push(event);
            if done {
                return events;
            }
        }
    }

    pub fn kinds(events: &[Event]) -> Vec<EventKind> {
        events.iter().map(Event::kind).collect()
    }
}
