use std::{
    io::Write,
    sync::{Arc, Mutex, atomic::AtomicBool},
    time::{Duration, Instant},
};

use tempfile::NamedTempFile;
use wave_control::{
    Config, DispatchError, PipelineError,
    pipeline::{
        ActionDispatcher, ActionGate, EventSink, GateTransition, JsonLinesSource, Key,
        KeyInjector, Session, SessionStep, StabilityFilter, StopReason, run_pipeline,
    },
    types::{FrameInput, GestureAction, GestureLabel, HandObservation, Handedness, NUM_LANDMARKS},
};

use GestureLabel::{Neutral, Next, Prev};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Key>>>);

impl KeyInjector for Recorder {
    fn tap(&mut self, key: Key) -> Result<(), DispatchError> {
        self.0.lock().unwrap().push(key);
        Ok(())
    }
}

/// Right hand raising `count` fingers (index first, thumb last).
fn hand(count: usize) -> HandObservation {
    let mut landmarks = [(0.5_f32, 0.5_f32); NUM_LANDMARKS];
    for (slot, tip) in [8usize, 12, 16, 20].into_iter().enumerate() {
        landmarks[tip] = if slot < count { (0.5, 0.3) } else { (0.5, 0.6) };
    }
    if count >= 5 {
        landmarks[4] = (0.3, 0.5);
    }
    HandObservation {
        landmarks,
        handedness: Handedness::Right,
    }
}

fn hand_json(count: usize) -> String {
    let points: Vec<String> = hand(count)
        .landmarks
        .iter()
        .map(|(x, y)| format!("[{x}, {y}]"))
        .collect();
    format!(
        r#"{{"hand": {{"handedness": "Right", "landmarks": [{}]}}}}"#,
        points.join(", ")
    )
}

/// Drives filter and gate directly, returning the frames (1-based) that
/// fired and what they fired.
fn run_labels(labels: &[GestureLabel]) -> Vec<(usize, GestureAction)> {
    let mut filter = StabilityFilter::default();
    let mut gate = ActionGate::new();
    labels
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| match gate.update(filter.observe(*raw)) {
            GateTransition::Fire(action) => Some((i + 1, action)),
            _ => None,
        })
        .collect()
}

fn repeat(label: GestureLabel, n: usize) -> Vec<GestureLabel> {
    vec![label; n]
}

#[test]
fn walkthrough_fires_once_per_episode() {
    let mut labels = Vec::new();
    labels.extend(repeat(Next, 8)); // 1-8: fires at 8
    labels.extend(repeat(Next, 8)); // 9-16: held, suppressed
    labels.extend(repeat(Neutral, 8)); // 17-24: rearms
    labels.extend(repeat(Next, 6)); // 25-32: 6 next then 2 prev
    labels.extend(repeat(Prev, 2));
    labels.extend(repeat(Next, 4)); // 33-40
    labels.extend(repeat(Prev, 4));

    let fired = run_labels(&labels);
    assert_eq!(fired.first(), Some(&(8, GestureAction::Next)));
    assert_eq!(fired.len(), 2);
    assert_eq!(fired[1].1, GestureAction::Next);
    assert!(fired[1].0 > 24 && fired[1].0 <= 32);
}

#[test]
fn six_next_two_prev_window_fires_next() {
    let mut labels = repeat(Next, 6);
    labels.extend(repeat(Prev, 2));
    assert_eq!(run_labels(&labels), vec![(8, GestureAction::Next)]);
}

#[test]
fn even_split_window_never_fires() {
    let mut labels = repeat(Next, 4);
    labels.extend(repeat(Prev, 4));
    assert!(run_labels(&labels).is_empty());
}

#[test]
fn switching_gestures_rearms_through_a_mixed_window() {
    // The 5/8 window at frame 11 reads neutral, which rearms the gate.
    let mut labels = repeat(Next, 8);
    labels.extend(repeat(Prev, 16));
    assert_eq!(
        run_labels(&labels),
        vec![(8, GestureAction::Next), (14, GestureAction::Prev)]
    );
}

#[test]
fn consecutive_actions_need_a_neutral_frame_between() {
    let mut labels = repeat(Next, 8);
    labels.extend(repeat(Neutral, 3));
    labels.extend(repeat(Prev, 8));
    let fired = run_labels(&labels);
    assert_eq!(fired.len(), 2);
    assert_eq!(fired[1].1, GestureAction::Prev);
}

#[test]
fn nothing_fires_during_calibration() {
    let config = Config::default();
    let start = Instant::now();
    let mut session = Session::new(&config, start);
    let input: FrameInput = Some(hand(1));

    // 60 frames at ~30 fps all land inside the 2 s window.
    for i in 0..60u64 {
        let outcome = session.process_frame(&input, start + Duration::from_millis(30 * i));
        assert!(matches!(outcome.step, SessionStep::Calibrating { .. }));
    }

    let outcome = session.process_frame(&input, start + Duration::from_millis(2_010));
    assert_eq!(
        outcome.step,
        SessionStep::Gate(GateTransition::Fire(GestureAction::Next))
    );
}

#[test]
fn json_lines_file_drives_key_presses() {
    let mut file = NamedTempFile::new().unwrap();
    for _ in 0..8 {
        writeln!(file, "{}", hand_json(2)).unwrap();
    }
    for _ in 0..8 {
        writeln!(file, "{{\"hand\": null}}").unwrap();
    }
    for _ in 0..8 {
        writeln!(file, "{}", hand_json(4)).unwrap();
    }
    for _ in 0..8 {
        writeln!(file, "{}", hand_json(5)).unwrap();
    }
    for _ in 0..8 {
        writeln!(file, "{}", hand_json(3)).unwrap();
    }
    file.flush().unwrap();

    let mut config = Config::default();
    config.session.calibration_secs = 0.0;
    config.session.frame_interval_ms = 0;

    let recorder = Recorder::default();
    let dispatcher = ActionDispatcher::new(config.keys, recorder.clone());
    let source = JsonLinesSource::open(file.path()).unwrap();
    let stop = AtomicBool::new(false);

    let summary =
        run_pipeline(&config, source, dispatcher, &EventSink::log_only(), &stop).unwrap();

    assert_eq!(summary.frames, 40);
    assert_eq!(summary.reason, StopReason::EndOfStream);
    assert_eq!(
        *recorder.0.lock().unwrap(),
        vec![Key::Left, Key::End, Key::Home]
    );
}

#[test]
fn malformed_input_stops_without_further_presses() {
    let mut file = NamedTempFile::new().unwrap();
    for _ in 0..8 {
        writeln!(file, "{}", hand_json(1)).unwrap();
    }
    writeln!(file, "{{\"hand\": {{\"landmarks\": [[0.1, 0.2]]}}}}").unwrap();
    for _ in 0..8 {
        writeln!(file, "{{\"hand\": null}}").unwrap();
    }
    file.flush().unwrap();

    let mut config = Config::default();
    config.session.calibration_secs = 0.0;
    config.session.frame_interval_ms = 0;

    let recorder = Recorder::default();
    let dispatcher = ActionDispatcher::new(config.keys, recorder.clone());
    let source = JsonLinesSource::open(file.path()).unwrap();
    let stop = AtomicBool::new(false);

    let err = run_pipeline(&config, source, dispatcher, &EventSink::log_only(), &stop)
        .unwrap_err();

    assert!(matches!(err, PipelineError::Source(_)));
    assert_eq!(*recorder.0.lock().unwrap(), vec![Key::Right]);
}
