use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use crate::{config::Config, error::PipelineError};

use super::{
    dispatcher::{ActionDispatcher, KeyInjector},
    events::{EventSink, PipelineEvent, StopReason},
    gate::GateTransition,
    session::{Session, SessionStep},
    source::LandmarkSource,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: u64,
    pub actions: u64,
    pub suppressed: u64,
    pub reason: StopReason,
}

/// Handle to a running pipeline thread. Dropping it requests a stop and
/// waits for the worker.
#[derive(Debug)]
pub struct PipelineHandle {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<Result<SessionSummary, PipelineError>>>,
}

impl PipelineHandle {
    /// Safe to call while a frame is in flight; nothing is dispatched after
    /// the worker observes the flag.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    pub fn stop(self) -> Result<SessionSummary, PipelineError> {
        self.request_stop();
        self.join()
    }

    /// Waits for the worker to end on its own (end of input or failure).
    pub fn join(mut self) -> Result<SessionSummary, PipelineError> {
        let handle = self
            .handle
            .take()
            .expect("worker handle is only taken by join or drop");
        match handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Spawns the dedicated frame worker. History and gate state live only on
/// that thread.
pub fn start_pipeline<S, I>(
    config: Config,
    source: S,
    dispatcher: ActionDispatcher<I>,
    events: EventSink,
) -> PipelineHandle
where
    S: LandmarkSource,
    I: KeyInjector,
{
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let handle = thread::spawn(move || run_pipeline(&config, source, dispatcher, &events, &stop_flag));

    PipelineHandle {
        stop,
        handle: Some(handle),
    }
}

/// Runs classify, filter, gate and dispatch once per frame until the input
/// ends, a stop is requested, or a failure occurs.
pub fn run_pipeline<S, I>(
    config: &Config,
    mut source: S,
    mut dispatcher: ActionDispatcher<I>,
    events: &EventSink,
    stop: &AtomicBool,
) -> Result<SessionSummary, PipelineError>
where
    S: LandmarkSource,
    I: KeyInjector,
{
    let frame_interval = config.session.frame_interval();
    let mut session = Session::new(config, Instant::now());
    let mut summary = SessionSummary {
        frames: 0,
        actions: 0,
        suppressed: 0,
        reason: StopReason::EndOfStream,
    };
    let mut announced_secs = None;
    let mut calibration_announced = false;

    events.emit(PipelineEvent::SessionStarted);

    loop {
        if stop.load(Ordering::SeqCst) {
            summary.reason = StopReason::Requested;
            break;
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(err) => {
                log::error!("landmark source failed: {err}");
                events.emit(PipelineEvent::SessionStopped {
                    reason: StopReason::Failed,
                });
                return Err(err.into());
            }
        };

        let outcome = session.process_frame(&frame, Instant::now());
        summary.frames += 1;
        log::trace!(
            "frame {}: raw={} stable={}",
            summary.frames,
            outcome.raw.as_str(),
            outcome.stable.as_str()
        );

        match outcome.step {
            SessionStep::Calibrating { remaining } => {
                let secs = remaining.as_secs_f32().ceil() as u64;
                if announced_secs != Some(secs) {
                    announced_secs = Some(secs);
                    events.emit(PipelineEvent::CalibrationProgress { remaining });
                }
            }
            SessionStep::Gate(transition) => {
                if !calibration_announced {
                    calibration_announced = true;
                    events.emit(PipelineEvent::CalibrationComplete);
                }

                match transition {
                    GateTransition::Held => {}
                    GateTransition::Fire(action) => {
                        if stop.load(Ordering::SeqCst) {
                            summary.reason = StopReason::Requested;
                            break;
                        }
                        match dispatcher.dispatch(action) {
                            Ok(key) => {
                                summary.actions += 1;
                                events.emit(PipelineEvent::ActionFired { action, key });
                            }
                            Err(err) => {
                                log::error!("failed to dispatch {action}: {err}");
                                events.emit(PipelineEvent::SessionStopped {
                                    reason: StopReason::Failed,
                                });
                                return Err(err.into());
                            }
                        }
                    }
                    GateTransition::Suppressed(action) => {
                        summary.suppressed += 1;
                        events.emit(PipelineEvent::ActionSuppressed { action });
                    }
                    GateTransition::Rearmed => events.emit(PipelineEvent::Rearmed),
                }
            }
        }

        if frame_interval > Duration::ZERO {
            thread::sleep(frame_interval);
        }
    }

    events.emit(PipelineEvent::SessionStopped {
        reason: summary.reason,
    });
    Ok(summary)
}
