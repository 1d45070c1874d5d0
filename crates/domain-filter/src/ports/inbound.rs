//! # Driving Ports (Inbound API)
//!
//! What the host pipeline calls on an interceptor.

use crate::domain::{ChannelMessage, Member, MemberId};

/// Outcome of offering one event to an interceptor.
///
/// None of these are errors. Hosts are free to ignore the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Event passed to the next stage
    Forwarded,
    /// Sender or member belongs to another domain
    ForeignDomain,
    /// Member was already alive in the view; no topology change
    AlreadyAlive,
}

impl FilterDecision {
    pub fn is_forwarded(self) -> bool {
        matches!(self, Self::Forwarded)
    }
}

/// A stage in the group-communication interceptor chain.
///
/// # Thread Safety
///
/// The host delivers events from several I/O threads at once, so every
/// method takes `&self` and implementations must be `Send + Sync`.
pub trait ChannelInterceptor: Send + Sync {
    /// Offer an inbound message.
    fn message_received(&self, message: ChannelMessage) -> FilterDecision;

    /// Offer a member-added notification.
    fn member_added(&self, member: Member) -> FilterDecision;

    /// Offer a member-disappeared notification.
    fn member_disappeared(&self, member: Member) -> FilterDecision;

    /// Whether any peer besides the local node is known.
    fn has_members(&self) -> bool;

    /// Snapshot of the known peers.
    fn members(&self) -> Vec<Member>;

    /// Look up a known peer by identity.
    fn member(&self, id: &MemberId) -> Option<Member>;

    /// The local node, optionally with its current alive time filled in.
    fn local_member(&self, include_alive_time: bool) -> Member;
}
