/// Temporal smoothing of raw joint angles
///
/// Each tracked angle keeps a fixed-size window of its most recent samples
/// and reports their arithmetic mean, damping per-frame jitter from the
/// detector. Non-finite samples never enter a window.

use std::collections::{HashMap, VecDeque};

use crate::models::AngleKind;

/// Default number of samples kept per angle
pub const DEFAULT_WINDOW: usize = 5;

/// Bounded FIFO of angle samples
#[derive(Debug, Clone)]
pub struct RollingBuffer {
    capacity: usize,
    samples: VecDeque<f32>,
}

impl RollingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest on overflow. Returns false if the
    /// sample was rejected as non-finite.
    pub fn push(&mut self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
        true
    }

    /// Mean of the window; 0 when empty
    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for RollingBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Rolling buffers keyed by angle
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    window_size: usize,
    buffers: HashMap<AngleKind, RollingBuffer>,
}

impl TemporalSmoother {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
            buffers: HashMap::new(),
        }
    }

    pub fn update(&mut self, kind: AngleKind, raw_value: f32) {
        let window_size = self.window_size;
        let accepted = self
            .buffers
            .entry(kind)
            .or_insert_with(|| RollingBuffer::new(window_size))
            .push(raw_value);

        if !accepted {
            tracing::trace!("Ignoring non-finite {} sample", kind);
        }
    }

    pub fn average(&self, kind: AngleKind) -> f32 {
        self.buffers.get(&kind).map_or(0.0, RollingBuffer::average)
    }

    pub fn has_samples(&self, kind: AngleKind) -> bool {
        self.buffers.get(&kind).map_or(false, |b| !b.is_empty())
    }

    /// Drop all angle history
    pub fn reset(&mut self) {
        self.buffers.clear();
    }
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
