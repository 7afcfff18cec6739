use crate::types::{GestureAction, GestureLabel};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GateState {
    /// Ready to dispatch.
    #[default]
    Idle,
    /// Already dispatched for the current non-neutral run.
    Fired,
}

/// What the gate decided for one stable label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateTransition {
    /// Idle and neutral: nothing happened.
    Held,
    /// Idle to Fired; the caller must dispatch this action.
    Fire(GestureAction),
    /// Already fired for this run; the action is swallowed.
    Suppressed(GestureAction),
    /// Fired to Idle on a neutral frame.
    Rearmed,
}

/// Edge trigger: at most one action per continuous non-neutral run, and a
/// neutral frame is the only way back to `Idle`.
#[derive(Clone, Debug, Default)]
pub struct ActionGate {
    state: GateState,
}

impl ActionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = GateState::Idle;
    }

    pub fn update(&mut self, stable: GestureLabel) -> GateTransition {
        match (self.state, stable.action()) {
            (GateState::Idle, None) => GateTransition::Held,
            (GateState::Idle, Some(action)) => {
                self.state = GateState::Fired;
                GateTransition::Fire(action)
            }
            (GateState::Fired, None) => {
                self.state = GateState::Idle;
                GateTransition::Rearmed
            }
            (GateState::Fired, Some(action)) => GateTransition::Suppressed(action),
        }
    }
}
