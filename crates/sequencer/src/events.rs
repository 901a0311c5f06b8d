use page_bridge::StartAck;
use wander_core_types::{SequenceId, TabId};

use crate::model::StepOutcome;

/// Lifecycle notifications published by the orchestrator.
#[derive(Clone, Debug, PartialEq)]
pub enum SequenceEvent {
    Started {
        sequence: SequenceId,
        repetitions: u32,
        auto_explore: bool,
        used_trending: bool,
    },
    TabOpened {
        sequence: SequenceId,
        tab: TabId,
        url: String,
        remaining: u32,
    },
    StepFinished {
        sequence: SequenceId,
        tab: TabId,
        outcome: StepOutcome,
    },
    SiteUnregistered {
        url: String,
    },
    Finished {
        sequence: SequenceId,
    },
    Abandoned {
        sequence: SequenceId,
        reason: String,
    },
}

impl SequenceEvent {
    pub fn started(ack: &StartAck, repetitions: u32, auto_explore: bool) -> Self {
        SequenceEvent::Started {
            sequence: ack.sequence_id.clone(),
            repetitions,
            auto_explore,
            used_trending: ack.used_trending,
        }
    }

    pub fn sequence(&self) -> Option<&SequenceId> {
        match self {
            SequenceEvent::Started { sequence, .. }
            | SequenceEvent::TabOpened { sequence, .. }
            | SequenceEvent::StepFinished { sequence, .. }
            | SequenceEvent::Finished { sequence }
            | SequenceEvent::Abandoned { sequence, .. } => Some(sequence),
            SequenceEvent::SiteUnregistered { .. } => None,
        }
    }

    /// Finished or abandoned.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SequenceEvent::Finished { .. } | SequenceEvent::Abandoned { .. }
        )
    }
}
