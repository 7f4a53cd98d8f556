use std::collections::VecDeque;

/// Typed, in-process FIFO of events.
///
/// Producers `emit`; the owner drains in emission order. Nothing is global:
/// whoever holds the bus decides when queued events are applied.
#[derive(Debug)]
pub struct EventBus<E> {
    events: VecDeque<E>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: E) {
        self.events.push_back(event);
    }

    /// Removes and returns the oldest event.
    pub fn pop(&mut self) -> Option<E> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events).into()
    }
}
