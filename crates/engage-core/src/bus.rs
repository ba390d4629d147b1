//! In-process publish/subscribe over an mpsc channel.
//!
//! Any window procedure (or the topmost ticker thread) publishes through a
//! cloned [`EventPublisher`]; the UI loop is the single consumer and
//! drains the bus between messages.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::event::AppEvent;

/// Multi-producer, single-consumer event queue.
pub struct EventBus {
    sender: Sender<AppEvent>,
    receiver: Receiver<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// Returns a publisher handle. Publishers are cheap to clone and may be
    /// moved to other threads.
    pub fn publisher(&self) -> EventPublisher {
        EventPublisher {
            sender: self.sender.clone(),
        }
    }

    /// Takes the next pending event without blocking.
    pub fn try_recv(&self) -> Option<AppEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drains every pending event in publish order.
    pub fn drain(&self) -> Vec<AppEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable handle for publishing onto an [`EventBus`].
#[derive(Clone)]
pub struct EventPublisher {
    sender: Sender<AppEvent>,
}

impl EventPublisher {
    /// Queues an event. Silently dropped if the bus is gone (shutdown).
    pub fn publish(&self, event: AppEvent) {
        let _ = self.sender.send(event);
    }
}
