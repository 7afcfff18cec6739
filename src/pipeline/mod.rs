pub mod camera;
pub mod dispatcher;
pub mod events;
pub mod gate;
pub mod session;
pub mod source;
pub mod stability;
pub mod worker;

// Re-exports for convenience
pub use camera::{CameraDevice, available_cameras};
pub use dispatcher::{
    ActionDispatcher, CommandKeyInjector, Key, KeyBindings, KeyInjector, LineKeyInjector,
};
pub use events::{EventSink, PipelineEvent, StopReason};
pub use gate::{ActionGate, GateState, GateTransition};
pub use session::{FrameOutcome, Session, SessionStep};
pub use source::{JsonLinesSource, LandmarkSource, VecSource};
pub use stability::{GestureHistory, StabilityFilter};
pub use worker::{PipelineHandle, SessionSummary, run_pipeline, start_pipeline};
