//! FIFO frontier of discovered-but-unfetched addresses.
//!
//! The queue and the in-flight counter live behind one mutex so the
//! termination condition (`queue empty AND in_flight == 0`) can never
//! observe a transiently-empty queue while a worker is still fetching:
//! [`Frontier::dequeue`] marks the address in-flight before the lock is
//! released, and [`Frontier::complete`] gives the mark back under the same
//! lock.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::utils::Address;

struct FrontierState {
    queue: VecDeque<Address>,
    in_flight: usize,
}

/// Thread-safe FIFO of pending addresses plus the in-flight fetch count.
pub(crate) struct Frontier {
    state: Mutex<FrontierState>,
}

impl Frontier {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(FrontierState {
                queue: VecDeque::new(),
                in_flight: 0,
            }),
        }
    }

    /// Appends an address to the tail of the queue.
    pub(crate) fn enqueue(&self, address: Address) {
        self.state.lock().queue.push_back(address);
    }

    /// Pops the head of the queue, counting it as in-flight until the
    /// caller hands it back through [`Frontier::complete`].
    pub(crate) fn dequeue(&self) -> Option<Address> {
        let mut state = self.state.lock();
        let address = state.queue.pop_front()?;
        state.in_flight += 1;
        Some(address)
    }

    /// Marks one dequeued address as fully processed. Returns `true` when
    /// this completion made the frontier idle.
    pub(crate) fn complete(&self) -> bool {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.in_flight == 0 && state.queue.is_empty()
    }

    /// `true` when nothing is queued and nothing is being fetched.
    pub(crate) fn is_idle(&self) -> bool {
        let state = self.state.lock();
        state.queue.is_empty() && state.in_flight == 0
    }

    /// Number of addresses waiting to be fetched.
    pub(crate) fn queued(&self) -> usize {
        self.state.lock().queue.len()
    }
}
