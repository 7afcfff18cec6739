use crate::types::{
    FingerExtension, GestureLabel, HandObservation, Handedness, INDEX, MIDDLE, PINKY, RING, THUMB,
};

pub const DEFAULT_FINGER_MARGIN: f32 = 0.05;

/// Stateless pose classifier: counts extended fingers and maps the count to
/// a raw gesture label.
#[derive(Clone, Copy, Debug)]
pub struct GestureClassifier {
    margin: f32,
}

impl GestureClassifier {
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// No hand is an absence of signal, not an error.
    pub fn classify(&self, hand: Option<&HandObservation>) -> GestureLabel {
        match hand {
            Some(hand) => GestureLabel::from_finger_count(self.finger_extension(hand).count()),
            None => GestureLabel::Neutral,
        }
    }

    pub fn finger_extension(&self, hand: &HandObservation) -> FingerExtension {
        let points = &hand.landmarks;
        FingerExtension([
            thumb_extended(points, hand.handedness, self.margin),
            finger_extended(points, INDEX, self.margin),
            finger_extended(points, MIDDLE, self.margin),
            finger_extended(points, RING, self.margin),
            finger_extended(points, PINKY, self.margin),
        ])
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_FINGER_MARGIN)
    }
}

// The thumb folds sideways, so it is judged on x; the mirrored direction
// depends on which hand it is.
fn thumb_extended(points: &[(f32, f32)], handedness: Handedness, margin: f32) -> bool {
    let (tip, pip) = (points[THUMB.0], points[THUMB.1]);
    match handedness {
        Handedness::Right => tip.0 < pip.0 - margin,
        Handedness::Left => tip.0 > pip.0 + margin,
    }
}

// Image y grows downward: an extended fingertip sits above its pip joint.
fn finger_extended(points: &[(f32, f32)], (tip, pip): (usize, usize), margin: f32) -> bool {
    points[tip].1 < points[pip].1 - margin
}
