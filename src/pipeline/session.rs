use std::time::{Duration, Instant};

use crate::{
    config::Config,
    gesture::GestureClassifier,
    types::{FrameInput, GestureLabel},
};

use super::{
    gate::{ActionGate, GateState, GateTransition},
    stability::StabilityFilter,
};

/// Result of running one frame through classify, filter and gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameOutcome {
    pub raw: GestureLabel,
    pub stable: GestureLabel,
    pub step: SessionStep,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStep {
    /// Still inside the calibration interval; the gate was not consulted.
    Calibrating { remaining: Duration },
    Gate(GateTransition),
}

/// Per-session pipeline state: one classifier, one filter, one gate and the
/// calibration clock. Each capture source needs its own `Session`.
#[derive(Debug)]
pub struct Session {
    classifier: GestureClassifier,
    filter: StabilityFilter,
    gate: ActionGate,
    calibration: Duration,
    started_at: Instant,
    frames: u64,
    calibrated: bool,
}

impl Session {
    pub fn new(config: &Config, now: Instant) -> Self {
        Self {
            classifier: GestureClassifier::new(config.classifier.finger_margin),
            filter: StabilityFilter::new(
                config.filter.window_size,
                config.filter.consistency_threshold,
            ),
            gate: ActionGate::new(),
            calibration: config.session.calibration(),
            started_at: now,
            frames: 0,
            calibrated: false,
        }
    }

    /// Clears the history, idles the gate and restarts the calibration clock.
    pub fn restart(&mut self, now: Instant) {
        self.filter.reset();
        self.gate.reset();
        self.started_at = now;
        self.frames = 0;
        self.calibrated = false;
    }

    pub fn process_frame(&mut self, input: &FrameInput, now: Instant) -> FrameOutcome {
        let raw = self.classifier.classify(input.as_ref());
        // The window keeps filling during calibration so it is warm afterwards.
        let stable = self.filter.observe(raw);
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.started_at);
        let step = if elapsed < self.calibration {
            SessionStep::Calibrating {
                remaining: self.calibration - elapsed,
            }
        } else {
            self.calibrated = true;
            SessionStep::Gate(self.gate.update(stable))
        };

        FrameOutcome { raw, stable, step }
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn filter(&self) -> &StabilityFilter {
        &self.filter
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gesture::fixtures::hand_with_fingers, types::GestureAction};

    fn config_with_calibration(secs: f32) -> Config {
        let mut config = Config::default();
        config.session.calibration_secs = secs;
        config
    }

    fn fingers(count: usize) -> FrameInput {
        Some(hand_with_fingers(count))
    }

    #[test]
    fn calibration_blocks_the_gate_but_warms_the_filter() {
        let start = Instant::now();
        let mut session = Session::new(&config_with_calibration(2.0), start);

        for i in 0..20 {
            let now = start + Duration::from_millis(50 * i);
            let outcome = session.process_frame(&fingers(1), now);
            assert!(matches!(outcome.step, SessionStep::Calibrating { .. }));
        }
        assert_eq!(session.gate_state(), GateState::Idle);
        assert!(session.filter().history().is_full());

        let outcome = session.process_frame(&fingers(1), start + Duration::from_secs(2));
        assert_eq!(outcome.stable, GestureLabel::Next);
        assert_eq!(
            outcome.step,
            SessionStep::Gate(GateTransition::Fire(GestureAction::Next))
        );
        assert!(session.is_calibrated());
    }

    #[test]
    fn calibration_reports_remaining_time() {
        let start = Instant::now();
        let mut session = Session::new(&config_with_calibration(2.0), start);
        let outcome = session.process_frame(&None, start + Duration::from_millis(500));
        assert_eq!(
            outcome.step,
            SessionStep::Calibrating {
                remaining: Duration::from_millis(1_500)
            }
        );
    }

    #[test]
    fn restart_clears_all_state() {
        let start = Instant::now();
        let mut session = Session::new(&config_with_calibration(0.0), start);
        for _ in 0..8 {
            session.process_frame(&fingers(2), start);
        }
        assert_eq!(session.gate_state(), GateState::Fired);

        let later = start + Duration::from_secs(10);
        session.restart(later);
        assert_eq!(session.gate_state(), GateState::Idle);
        assert!(session.filter().history().is_empty());
        assert_eq!(session.frames(), 0);
        assert!(!session.is_calibrated());
        assert_eq!(session.started_at(), later);
    }

    #[test]
    fn missing_hand_reads_as_neutral() {
        let start = Instant::now();
        let mut session = Session::new(&config_with_calibration(0.0), start);
        let outcome = session.process_frame(&None, start);
        assert_eq!(outcome.raw, GestureLabel::Neutral);
        assert_eq!(outcome.step, SessionStep::Gate(GateTransition::Held));
    }
}
