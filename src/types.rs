use serde::{Deserialize, Serialize};

pub const NUM_LANDMARKS: usize = 21;

// MediaPipe hand layout: (tip, pip) per finger, thumb first.
pub const THUMB: (usize, usize) = (4, 3);
pub const INDEX: (usize, usize) = (8, 6);
pub const MIDDLE: (usize, usize) = (12, 10);
pub const RING: (usize, usize) = (16, 14);
pub const PINKY: (usize, usize) = (20, 18);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

impl Handedness {
    pub fn label(&self) -> &'static str {
        match self {
            Handedness::Left => "left hand",
            Handedness::Right => "right hand",
        }
    }
}

/// One detected hand: 21 normalized landmarks (x, y in [0, 1], origin
/// top-left) plus the detector's handedness tag.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    pub landmarks: [(f32, f32); NUM_LANDMARKS],
    pub handedness: Handedness,
}

/// Per-frame upstream input; `None` means no hand was detected.
pub type FrameInput = Option<HandObservation>;

/// Extension flags in thumb, index, middle, ring, pinky order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerExtension(pub [bool; 5]);

impl FingerExtension {
    pub fn count(&self) -> usize {
        self.0.iter().filter(|extended| **extended).count()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    #[default]
    Neutral,
    Next,
    Prev,
    Home,
    End,
}

impl GestureLabel {
    pub const COUNT: usize = 5;

    pub fn index(self) -> usize {
        match self {
            GestureLabel::Neutral => 0,
            GestureLabel::Next => 1,
            GestureLabel::Prev => 2,
            GestureLabel::Home => 3,
            GestureLabel::End => 4,
        }
    }

    pub fn from_finger_count(count: usize) -> Self {
        match count {
            1 => GestureLabel::Next,
            2 => GestureLabel::Prev,
            3 => GestureLabel::Home,
            4 => GestureLabel::End,
            _ => GestureLabel::Neutral,
        }
    }

    pub fn action(self) -> Option<GestureAction> {
        match self {
            GestureLabel::Neutral => None,
            GestureLabel::Next => Some(GestureAction::Next),
            GestureLabel::Prev => Some(GestureAction::Prev),
            GestureLabel::Home => Some(GestureAction::Home),
            GestureLabel::End => Some(GestureAction::End),
        }
    }

    pub fn is_neutral(self) -> bool {
        self == GestureLabel::Neutral
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GestureLabel::Neutral => "neutral",
            GestureLabel::Next => "next",
            GestureLabel::Prev => "prev",
            GestureLabel::Home => "home",
            GestureLabel::End => "end",
        }
    }
}

/// A dispatchable action; the non-neutral subset of [`GestureLabel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureAction {
    Next,
    Prev,
    Home,
    End,
}

impl GestureAction {
    pub const ALL: [GestureAction; 4] = [
        GestureAction::Next,
        GestureAction::Prev,
        GestureAction::Home,
        GestureAction::End,
    ];

    pub fn label(self) -> GestureLabel {
        match self {
            GestureAction::Next => GestureLabel::Next,
            GestureAction::Prev => GestureLabel::Prev,
            GestureAction::Home => GestureLabel::Home,
            GestureAction::End => GestureLabel::End,
        }
    }

    pub fn finger_count(self) -> usize {
        match self {
            GestureAction::Next => 1,
            GestureAction::Prev => 2,
            GestureAction::Home => 3,
            GestureAction::End => 4,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GestureAction::Next => "next slide",
            GestureAction::Prev => "previous slide",
            GestureAction::Home => "first slide",
            GestureAction::End => "last slide",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            GestureAction::Next => "👆 ",
            GestureAction::Prev => "✌️ ",
            GestureAction::Home => "🤟 ",
            GestureAction::End => "🖐️ ",
        }
    }
}

impl std::fmt::Display for GestureAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label().as_str())
    }
}
