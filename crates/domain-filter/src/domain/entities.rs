//! Core Domain Entities
//!
//! Members and messages are produced by the host's membership and transport
//! layers. The filter only inspects them and keeps copies in its view.

use std::fmt;

use super::Domain;

/// Identity of a cluster member.
///
/// Opaque bytes; in a typical host this is the member's host, port and
/// unique id concatenated. Two members are the same member iff their ids
/// are equal, regardless of any other field.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(Vec<u8>);

impl MemberId {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({})", self)
    }
}

/// Liveness reported by the upstream failure detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Liveness {
    /// Member is up and serving
    #[default]
    Ready,
    /// Member missed heartbeats and is being verified
    Suspect,
    /// Member failed verification
    Failing,
}

impl Liveness {
    pub fn is_alive(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// A cluster peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Identity key
    pub id: MemberId,
    /// Partition tag
    pub domain: Domain,
    /// How long the member reports having been alive, in milliseconds
    pub alive_time_ms: u64,
    /// Upstream liveness verdict
    pub liveness: Liveness,
    /// Application payload advertised with the member
    pub payload: Vec<u8>,
    /// Membership command bytes advertised with the member
    pub command: Vec<u8>,
}

impl Member {
    /// Create a ready member with no payload.
    pub fn new(id: impl Into<MemberId>, domain: Domain) -> Self {
        Self {
            id: id.into(),
            domain,
            alive_time_ms: 0,
            liveness: Liveness::Ready,
            payload: Vec::new(),
            command: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_alive_time(mut self, alive_time_ms: u64) -> Self {
        self.alive_time_ms = alive_time_ms;
        self
    }

    #[must_use]
    pub fn with_liveness(mut self, liveness: Liveness) -> Self {
        self.liveness = liveness;
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    #[must_use]
    pub fn with_command(mut self, command: Vec<u8>) -> Self {
        self.command = command;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Whether this member is tagged with exactly `domain`.
    pub fn in_domain(&self, domain: &Domain) -> bool {
        self.domain == *domain
    }
}

impl From<Vec<u8>> for MemberId {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Member[id={}, domain={}, alive={}ms, {:?}]",
            self.id, self.domain, self.alive_time_ms, self.liveness
        )
    }
}

/// An inbound channel message.
///
/// The filter never looks past `sender`; the remaining fields are carried
/// through to the next stage unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    /// The member that sent the message
    pub sender: Member,
    /// Send timestamp in milliseconds since the epoch
    pub timestamp_ms: u64,
    /// Channel delivery options bitmask
    pub options: u32,
    /// Message body
    pub body: Vec<u8>,
}

impl ChannelMessage {
    pub fn new(sender: Member, body: Vec<u8>) -> Self {
        Self {
            sender,
            timestamp_ms: 0,
            options: 0,
            body,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: u32) -> Self {
        self.options = options;
        self
    }
}
