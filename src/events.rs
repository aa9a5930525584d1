//! Master-loop events, broadcast over a [`swarmcast_events::bus::EventBus`]
//! so that statistics/observability consumers don't have to sit inline on
//! the swarm mutex.
use swarmcast_swarm_core::NodeId;

#[derive(Debug, PartialEq, Clone)]
pub enum Event {
    NodeJoined { id: NodeId, name: String },
    NodeDestroyed { id: NodeId },
    BatchChanged { hash_count: usize },
    TransfersScheduled { count: usize },
}

pub mod bus {
    use crate::events::Event;

    pub type EventBus = swarmcast_events::bus::EventBus<Event>;
}

pub mod sender {
    use std::sync::Arc;

    use crate::events::Event;

    pub type Sender = Option<Arc<dyn swarmcast_events::sender::Sender<Event = Event>>>;
}

pub mod receiver {
    use crate::events::Event;

    pub type Receiver = Box<dyn swarmcast_events::receiver::Receiver<Event = Event>>;
}

#[cfg(test)]
mod tests {
    use swarmcast_swarm_core::NodeId;

    use super::Event;

    #[test]
    fn events_should_be_comparable() {
        let id = NodeId::from(1);

        let event1 = Event::NodeJoined {
            id,
            name: "p1".to_string(),
        };
        let event2 = Event::NodeDestroyed { id };
        let event1_clone = event1.clone();

        assert!(event1 == event1_clone);
        assert!(event1 != event2);
    }
}
