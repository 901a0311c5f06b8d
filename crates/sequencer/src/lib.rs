pub mod api;
pub mod error;
pub mod events;
pub mod metrics;
pub mod model;
pub mod orchestrator;
pub mod ports;
pub mod registry;

pub use api::Sequencer;
pub use error::SequencerError;
pub use events::SequenceEvent;
pub use model::{SequenceConfig, SequenceTimings, StepOutcome};
pub use orchestrator::{SequenceOrchestrator, SequenceOrchestratorBuilder};
pub use ports::{CandidateSource, StaticCandidates};
pub use registry::SequenceRegistry;
