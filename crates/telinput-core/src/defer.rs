#![forbid(unsafe_code)]

//! Run-after-turn deferral with generation guarding.
//!
//! The widget defers two kinds of work to the end of the current event turn:
//! re-checking focus after a blur, and re-placing the caret after the display
//! text has been replaced. Both are cooperative zero-delay callbacks with no
//! cancellation token; instead, every edit bumps the queue generation and
//! draining skips entries scheduled under an older generation. A second edit
//! arriving before a pending deferral fires therefore wins: its own deferral
//! is the only one that runs.
//!
//! The queue is single-threaded by construction. Hosts drain it once per
//! event turn, after their own handler has returned.

/// Monotonic generation counter for stale-deferral detection.
pub type Generation = u64;

/// A queue of actions to run after the current event turn.
///
/// Actions are tagged with the generation current at schedule time. Bumping
/// the generation via [`DeferQueue::invalidate`] marks everything already
/// queued as stale; [`DeferQueue::take_ready`] silently drops stale entries.
#[derive(Debug)]
pub struct DeferQueue<T> {
    generation: Generation,
    pending: Vec<(Generation, T)>,
}

impl<T> DeferQueue<T> {
    /// Create an empty queue at generation zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: 0,
            pending: Vec::new(),
        }
    }

    /// The current generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Bump the generation, marking all pending entries stale.
    ///
    /// Returns the new generation.
    pub fn invalidate(&mut self) -> Generation {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Schedule an action under the current generation.
    pub fn schedule(&mut self, action: T) {
        self.pending.push((self.generation, action));
    }

    /// Drain the queue, returning live actions in schedule order.
    ///
    /// Entries scheduled under an older generation are dropped.
    pub fn take_ready(&mut self) -> Vec<T> {
        let generation = self.generation;
        self.pending
            .drain(..)
            .filter_map(|(g, action)| (g == generation).then_some(action))
            .collect()
    }

    /// Whether any entries are queued, live or stale.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of queued entries, live or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

impl<T> Default for DeferQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
