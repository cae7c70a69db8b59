//! Fixed-capacity experience replay for the network agent

use rand::RngCore;
use rand::seq::index;

use super::encoder::EncodedState;

/// One stored transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Experience {
    pub state: EncodedState,
    pub action: usize,
    pub reward: f32,
    pub next_state: EncodedState,
    pub done: bool,
}

/// Ring buffer that overwrites the oldest experience once full
#[derive(Debug, Clone)]
pub struct ReplayBuffer {
    items: Vec<Experience>,
    capacity: usize,
    /// Slot the next push writes to once the buffer is full
    next: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
            next: 0,
        }
    }

    pub fn push(&mut self, experience: Experience) {
        if self.items.len() < self.capacity {
            self.items.push(experience);
        } else {
            self.items[self.next] = experience;
        }
        self.next = (self.next + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.next = 0;
    }

    /// Uniform batch of distinct experiences, or `None` while the buffer
    /// holds fewer than `batch_size`.
    pub fn sample(&self, batch_size: usize, rng: &mut dyn RngCore) -> Option<Vec<Experience>> {
        if batch_size == 0 || self.items.len() < batch_size {
            return None;
        }
        let picks = index::sample(rng, self.items.len(), batch_size);
        Some(picks.iter().map(|i| self.items[i]).collect())
    }
}
