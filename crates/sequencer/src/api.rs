use std::sync::Arc;

use async_trait::async_trait;
use page_bridge::{BackgroundReply, BackgroundRequest, StartAck, StartSequence};
use wander_core_types::{SequenceId, TabId};

use crate::orchestrator::SequenceOrchestrator;

/// Background coordinator surface used by message routers and the CLI.
#[async_trait]
pub trait Sequencer: Send + Sync {
    async fn start_sequence(&self, request: StartSequence) -> StartAck;
    fn on_explore_done(&self, tab: TabId) -> bool;
    async fn handle_message(&self, sender: Option<TabId>, request: BackgroundRequest)
        -> BackgroundReply;
    fn is_active(&self, id: &SequenceId) -> bool;
}

#[async_trait]
impl Sequencer for SequenceOrchestrator {
    async fn start_sequence(&self, request: StartSequence) -> StartAck {
        SequenceOrchestrator::start_sequence(self, request).await
    }

    fn on_explore_done(&self, tab: TabId) -> bool {
        SequenceOrchestrator::on_explore_done(self, tab)
    }

    async fn handle_message(
        &self,
        sender: Option<TabId>,
        request: BackgroundRequest,
    ) -> BackgroundReply {
        SequenceOrchestrator::handle_message(self, sender, request).await
    }

    fn is_active(&self, id: &SequenceId) -> bool {
        SequenceOrchestrator::is_active(self, id)
    }
}

#[async_trait]
impl<T> Sequencer for Arc<T>
where
    T: Sequencer + ?Sized,
{
    async fn start_sequence(&self, request: StartSequence) -> StartAck {
        (**self).start_sequence(request).await
    }

    fn on_explore_done(&self, tab: TabId) -> bool {
        (**self).on_explore_done(tab)
    }

    async fn handle_message(
        &self,
        sender: Option<TabId>,
        request: BackgroundRequest,
    ) -> BackgroundReply {
        (**self).handle_message(sender, request).await
    }

    fn is_active(&self, id: &SequenceId) -> bool {
        (**self).is_active(id)
    }
}
