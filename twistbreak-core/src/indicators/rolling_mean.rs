//! Rolling arithmetic mean over a fixed-capacity window.
//!
//! Ring buffer with a running sum: O(1) amortized per push. The sum is
//! recomputed from the buffer once per full window turnover to stop
//! floating-point drift from accumulating over long runs.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    buf: VecDeque<f64>,
    sum: f64,
    pushes_since_rebuild: usize,
}

impl RollingMean {
    /// Capacity must be >= 1; the engine's config validation enforces
    /// this before construction.
    pub fn new(window: usize) -> Self {
        debug_assert!(window >= 1, "rolling mean window must be >= 1");
        Self {
            window,
            buf: VecDeque::with_capacity(window),
            sum: 0.0,
            pushes_since_rebuild: 0,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True once the window holds `window` observations.
    pub fn is_full(&self) -> bool {
        self.buf.len() == self.window
    }

    /// Push an observation, evicting the oldest once at capacity.
    pub fn push(&mut self, value: f64) {
        if self.buf.len() == self.window {
            if let Some(evicted) = self.buf.pop_front() {
                self.sum -= evicted;
            }
        }
        self.buf.push_back(value);
        self.sum += value;

        self.pushes_since_rebuild += 1;
        if self.pushes_since_rebuild >= self.window {
            self.sum = self.buf.iter().sum();
            self.pushes_since_rebuild = 0;
        }
    }

    /// Mean of the observations currently in the window.
    ///
    /// Defined as soon as one value has been pushed; callers that need a
    /// full window gate on [`is_full`](Self::is_full).
    pub fn mean(&self) -> Option<f64> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.sum / self.buf.len() as f64)
        }
    }
}
