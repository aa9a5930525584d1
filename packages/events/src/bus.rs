use std::sync::Arc;

use crate::broadcaster::Broadcaster;
use crate::{receiver, sender};

#[derive(Clone, Debug)]
pub enum SenderStatus {
    Enabled,
    Disabled,
}

impl From<bool> for SenderStatus {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

impl From<SenderStatus> for bool {
    fn from(sender_status: SenderStatus) -> Self {
        match sender_status {
            SenderStatus::Enabled => true,
            SenderStatus::Disabled => false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EventBus<Event: Sync + Send + Clone + 'static> {
    pub sender_status: SenderStatus,
    pub broadcaster: Broadcaster<Event>,
}

impl<Event: Sync + Send + Clone + 'static> Default for EventBus<Event> {
    fn default() -> Self {
        let sender_status = SenderStatus::Enabled;
        let broadcaster = Broadcaster::<Event>::default();

        Self::new(sender_status, broadcaster)
    }
}

impl<Event: Sync + Send + Clone + 'static> EventBus<Event> {
    #[must_use]
    pub fn new(sender_status: SenderStatus, broadcaster: Broadcaster<Event>) -> Self {
        Self {
            sender_status,
            broadcaster,
        }
    }

    #[must_use]
    pub fn sender(&self) -> Option<Arc<dyn sender::Sender<Event = Event>>> {
        match self.sender_status {
            SenderStatus::Enabled => Some(Arc::new(self.broadcaster.clone())),
            SenderStatus::Disabled => None,
        }
    }

    #[must_use]
    pub fn receiver(&self) -> Box<dyn receiver::Receiver<Event = Event>> {
        Box::new(self.broadcaster.subscribe())
    }
}
