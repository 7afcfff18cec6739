use std::collections::VecDeque;

use crate::types::GestureLabel;

pub const DEFAULT_WINDOW_SIZE: usize = 8;
pub const DEFAULT_CONSISTENCY_THRESHOLD: f32 = 0.75;
pub const MAX_WINDOW_SIZE: usize = 4096;

/// Fixed-capacity window of raw labels, oldest first.
#[derive(Clone, Debug)]
pub struct GestureHistory {
    labels: VecDeque<GestureLabel>,
    capacity: usize,
}

impl GestureHistory {
    /// A capacity of 0 is treated as 1: the window always holds at least
    /// the newest label.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            labels: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, label: GestureLabel) {
        self.labels.push_back(label);
        while self.labels.len() > self.capacity {
            self.labels.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.labels.len() == self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = GestureLabel> + '_ {
        self.labels.iter().copied()
    }

    /// Most frequent label and its count. On a tie the winner is the label
    /// that reached the top count first while scanning oldest to newest.
    pub fn majority(&self) -> Option<(GestureLabel, usize)> {
        let mut counts = [0usize; GestureLabel::COUNT];
        let mut best: Option<(GestureLabel, usize)> = None;

        for label in self.iter() {
            let count = &mut counts[label.index()];
            *count += 1;
            if best.is_none_or(|(_, best_count)| *count > best_count) {
                best = Some((label, *count));
            }
        }

        best
    }
}

/// Majority-vote smoothing over the last `window_size` raw labels.
#[derive(Clone, Debug)]
pub struct StabilityFilter {
    history: GestureHistory,
    threshold: f32,
}

impl StabilityFilter {
    pub fn new(window_size: usize, threshold: f32) -> Self {
        Self {
            history: GestureHistory::new(window_size),
            threshold,
        }
    }

    /// Feeds one frame's raw label and returns the stable label. Must be
    /// called exactly once per frame, in frame order.
    pub fn observe(&mut self, raw: GestureLabel) -> GestureLabel {
        self.history.push(raw);

        if !self.history.is_full() {
            return GestureLabel::Neutral;
        }

        let Some((winner, count)) = self.history.majority() else {
            return GestureLabel::Neutral;
        };

        let consistency = count as f32 / self.history.capacity() as f32;
        if consistency >= self.threshold && !winner.is_neutral() {
            winner
        } else {
            GestureLabel::Neutral
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &GestureHistory {
        &self.history
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Default for StabilityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE, DEFAULT_CONSISTENCY_THRESHOLD)
    }
}
