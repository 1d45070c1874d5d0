//! # Domain Filter
//!
//! A channel interceptor that partitions a cluster into logical domains.
//!
//! Every node carries a domain, an opaque byte tag. The filter sits in a
//! node's inbound pipeline and lets through only the messages and membership
//! changes whose sender carries the same domain as the local node. Everything
//! else is dropped, with refusal warnings for foreign messages rate-limited
//! so a busy foreign peer cannot flood the log.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** `Domain`, `Member`, the domain-local membership view and the sampled warner
//! - **Ports Layer:** `ChannelInterceptor` (driven by the host) and `NextStage`
//!   (supplied by the host)
//! - **Service Layer:** `DomainFilterInterceptor`, which wires the two
//! - **Adapters Layer:** static and TOML configuration providers
//!
//! ## Features
//!
//! - `config` (default) - `TomlConfigProvider` (serde, toml)
//! - `test-utils` - `RecordingStage` and member fixtures
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use domain_filter::{
//!     ChannelInterceptor, ChannelMessage, Domain, DomainFilterInterceptor, FilterConfig,
//!     FilterDecision, Member, NextStage,
//! };
//!
//! struct Sink(Member);
//!
//! impl NextStage for Sink {
//!     fn forward_message(&self, _message: ChannelMessage) {}
//!     fn forward_member_added(&self, _member: Member) {}
//!     fn forward_member_disappeared(&self, _member: Member) {}
//!     fn local_member(&self, _include_alive_time: bool) -> Member {
//!         self.0.clone()
//!     }
//! }
//!
//! let east: Domain = "{1,2,3}".parse().unwrap();
//! let sink = Arc::new(Sink(Member::new("local", east.clone())));
//! let filter = DomainFilterInterceptor::new(FilterConfig::new(east.clone()), sink);
//!
//! let peer = Member::new("peer", east);
//! let stranger = Member::new("stranger", Domain::new(vec![1, 2]));
//!
//! assert_eq!(filter.member_added(peer.clone()), FilterDecision::Forwarded);
//! assert_eq!(filter.member_added(stranger.clone()), FilterDecision::ForeignDomain);
//! assert_eq!(
//!     filter.message_received(ChannelMessage::new(stranger, b"hi".to_vec())),
//!     FilterDecision::ForeignDomain
//! );
//! assert_eq!(filter.members(), vec![peer]);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

/// Recording next stage and fixtures.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Domain
pub use domain::{
    ChannelMessage, ConfigError, Domain, DomainMembershipView, DomainParseError, FilterConfig,
    Liveness, Member, MemberId, SampledWarner, DEFAULT_LOG_INTERVAL,
};

// Port traits
pub use ports::{ChannelInterceptor, ConfigProvider, FilterDecision, NextStage};

// Service
pub use service::DomainFilterInterceptor;

// Metrics
pub use metrics::{FilterMetrics, FilterMetricsSnapshot};

// Adapters
pub use adapters::StaticConfigProvider;
#[cfg(feature = "config")]
pub use adapters::TomlConfigProvider;
