use std::time::Duration;

use crossbeam_channel::Sender;

use crate::types::GestureAction;

use super::dispatcher::Key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Requested,
    EndOfStream,
    Failed,
}

/// Structured observability record emitted by the worker. Rendering is up
/// to whoever holds the receiver.
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineEvent {
    SessionStarted,
    CalibrationProgress { remaining: Duration },
    CalibrationComplete,
    ActionFired { action: GestureAction, key: Key },
    ActionSuppressed { action: GestureAction },
    Rearmed,
    SessionStopped { reason: StopReason },
}

impl PipelineEvent {
    fn log(&self) {
        match self {
            PipelineEvent::SessionStarted => log::info!("gesture session started"),
            PipelineEvent::CalibrationProgress { remaining } => {
                log::debug!("calibrating, {:.1}s remaining", remaining.as_secs_f32())
            }
            PipelineEvent::CalibrationComplete => log::info!("calibration complete"),
            PipelineEvent::ActionFired { action, key } => {
                log::info!("{action} fired, tapped {}", key.name())
            }
            PipelineEvent::ActionSuppressed { action } => {
                log::debug!("{action} suppressed, waiting for neutral")
            }
            PipelineEvent::Rearmed => log::info!("neutral seen, ready for next action"),
            PipelineEvent::SessionStopped { reason } => {
                log::info!("gesture session stopped: {reason:?}")
            }
        }
    }
}

/// Logs every event and forwards it without blocking; a full or closed
/// channel just drops the event.
#[derive(Clone, Debug, Default)]
pub struct EventSink {
    tx: Option<Sender<PipelineEvent>>,
}

impl EventSink {
    pub fn new(tx: Sender<PipelineEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn log_only() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: PipelineEvent) {
        event.log();
        if let Some(tx) = &self.tx {
            let _ = tx.try_send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (tx, rx) = bounded(1);
        let sink = EventSink::new(tx);
        sink.emit(PipelineEvent::SessionStarted);
        sink.emit(PipelineEvent::Rearmed);
        assert_eq!(rx.try_recv().unwrap(), PipelineEvent::SessionStarted);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = bounded(4);
        drop(rx);
        EventSink::new(tx).emit(PipelineEvent::CalibrationComplete);
        EventSink::log_only().emit(PipelineEvent::CalibrationComplete);
    }
}
