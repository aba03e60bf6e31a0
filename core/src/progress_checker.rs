//! Sliding-window "lack of progress" detector.
//!
//! Keeps the last `steps` per-tick displacements in a ring buffer. Until the
//! buffer has been filled once there is not enough history to judge, so the
//! object is given the benefit of the doubt.

use crate::types::Position;

#[derive(Debug, Clone)]
pub struct ProgressChecker {
    steps: usize,
    threshold: f64,
    pub(crate) samples: Vec<f64>,
    /// Number of displacement samples recorded since the last reset.
    pub(crate) iterator: usize,
    prev_position: Option<Position>,
}

impl ProgressChecker {
    pub fn new(steps: usize, threshold: f64) -> Self {
        Self {
            steps,
            threshold,
            samples: vec![0.0; steps],
            iterator: 0,
            prev_position: None,
        }
    }

    pub fn reset(&mut self) {
        self.samples.iter_mut().for_each(|s| *s = 0.0);
        self.iterator = 0;
        self.prev_position = None;
    }

    /// Feed the object's current position.
    pub fn track(&mut self, position: Position) {
        let Some(prev) = self.prev_position.replace(position) else {
            return;
        };
        if self.steps == 0 {
            return;
        }
        self.samples[self.iterator % self.steps] = prev.distance_to(&position);
        self.iterator += 1;
    }

    /// Sum of the displacements currently in the window.
    pub fn window_sum(&self) -> f64 {
        self.samples.iter().sum()
    }

    pub fn is_progress(&self) -> bool {
        if self.iterator < self.steps {
            return true;
        }
        self.window_sum() >= self.threshold
    }

    pub fn samples_recorded(&self) -> usize {
        self.iterator
    }

    pub fn prev_position(&self) -> Option<Position> {
        self.prev_position
    }
}
