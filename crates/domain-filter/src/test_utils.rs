//! Test utilities for the domain filter.
//!
//! A recording next stage and member/message fixtures.
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_filter::test_utils::{member, message_from, RecordingStage};
//! use domain_filter::{ChannelInterceptor, DomainFilterInterceptor, FilterConfig, Domain};
//!
//! let stage = Arc::new(RecordingStage::new(member("local", &[1])));
//! let config = FilterConfig::new(Domain::new(vec![1]));
//! let filter = DomainFilterInterceptor::new(config, stage.clone());
//!
//! filter.message_received(message_from("peer", &[1]));
//! filter.message_received(message_from("stranger", &[2]));
//! assert_eq!(stage.messages().len(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::domain::{ChannelMessage, Domain, Member};
use crate::ports::NextStage;

/// An event that reached the next stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardedEvent {
    Message(ChannelMessage),
    MemberAdded(Member),
    MemberDisappeared(Member),
}

/// Next stage that records everything forwarded to it.
#[derive(Debug)]
pub struct RecordingStage {
    local: Member,
    events: Mutex<Vec<ForwardedEvent>>,
    local_queries: AtomicUsize,
}

impl RecordingStage {
    pub fn new(local: Member) -> Self {
        Self {
            local,
            events: Mutex::new(Vec::new()),
            local_queries: AtomicUsize::new(0),
        }
    }

    /// All forwarded events, in arrival order.
    pub fn events(&self) -> Vec<ForwardedEvent> {
        self.events.lock().clone()
    }

    pub fn messages(&self) -> Vec<ChannelMessage> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ForwardedEvent::Message(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn added(&self) -> Vec<Member> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ForwardedEvent::MemberAdded(member) => Some(member.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn disappeared(&self) -> Vec<Member> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ForwardedEvent::MemberDisappeared(member) => Some(member.clone()),
                _ => None,
            })
            .collect()
    }

    /// How many times the local member was asked for.
    pub fn local_queries(&self) -> usize {
        self.local_queries.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl NextStage for RecordingStage {
    fn forward_message(&self, message: ChannelMessage) {
        self.events.lock().push(ForwardedEvent::Message(message));
    }

    fn forward_member_added(&self, member: Member) {
        self.events.lock().push(ForwardedEvent::MemberAdded(member));
    }

    fn forward_member_disappeared(&self, member: Member) {
        self.events.lock().push(ForwardedEvent::MemberDisappeared(member));
    }

    fn local_member(&self, _include_alive_time: bool) -> Member {
        self.local_queries.fetch_add(1, Ordering::SeqCst);
        self.local.clone()
    }
}

/// A ready member with the given id and domain bytes.
pub fn member(id: &str, domain: &[u8]) -> Member {
    Member::new(id, Domain::from(domain))
}

/// A small message sent by `member(id, domain)`.
pub fn message_from(id: &str, domain: &[u8]) -> ChannelMessage {
    ChannelMessage::new(member(id, domain), id.as_bytes().to_vec())
}
