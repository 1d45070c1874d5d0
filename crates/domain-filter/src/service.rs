//! # Domain Filter Service
//!
//! The interceptor that narrows an already-delivered event stream to one
//! domain.
//!
//! ## Architecture
//!
//! This service implements the inbound port:
//! - [`ChannelInterceptor`]: driven by the host pipeline's delivery threads
//!
//! It depends on one outbound port:
//! - [`NextStage`]: where accepted events are forwarded
//!
//! ## Decisions
//!
//! | Event               | Same domain                         | Foreign domain          |
//! |---------------------|-------------------------------------|-------------------------|
//! | message             | forward                             | drop, sampled `warn`    |
//! | member added        | forward if newly alive in the view  | drop, `info`            |
//! | member disappeared  | remove from view, forward           | drop silently           |
//!
//! ## Locking
//!
//! - The membership view is installed once through a `OnceCell`; concurrent
//!   first use yields a single view and a single local-member query.
//! - One mutex guards the view, and the domain check for membership events
//!   happens while holding it.
//! - Membership forwarding happens after the view lock is released, but
//!   under the shared side of an ordering lock. Reconfiguration and expiry
//!   take its exclusive side, so their disappearances are never overtaken by
//!   an add decided before them.
//! - Lock order: ordering lock, view mutex, domain.
//! - A next stage may call back into event handlers and queries, but not
//!   into `set_domain` or `expire_members`.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::{
    ChannelMessage, ConfigError, Domain, DomainMembershipView, DomainParseError, FilterConfig,
    Member, MemberId, SampledWarner,
};
use crate::metrics::{FilterMetrics, FilterMetricsSnapshot};
use crate::ports::{ChannelInterceptor, ConfigProvider, FilterDecision, NextStage};

/// Domain-scoped membership filter.
///
/// ## Thread Safety
///
/// This service is thread-safe and can be shared across delivery threads via
/// `Arc`. Reconfiguration through [`set_domain`](Self::set_domain) is ordered
/// before every event whose domain check starts after it returns.
pub struct DomainFilterInterceptor<N>
where
    N: NextStage,
{
    /// Next stage of the chain.
    next: Arc<N>,
    /// Domain this node belongs to.
    domain: RwLock<Domain>,
    /// Limits refusal warnings for foreign messages.
    warner: SampledWarner,
    /// Domain-local membership, created on first use.
    membership: OnceCell<Mutex<DomainMembershipView>>,
    /// Orders membership forwards against reconfiguration.
    forwarding: RwLock<()>,
    /// Decision counters.
    metrics: FilterMetrics,
}

impl<N> DomainFilterInterceptor<N>
where
    N: NextStage,
{
    pub fn new(config: FilterConfig, next: Arc<N>) -> Self {
        Self {
            next,
            domain: RwLock::new(config.domain),
            warner: SampledWarner::new(config.log_interval),
            membership: OnceCell::new(),
            forwarding: RwLock::new(()),
            metrics: FilterMetrics::new(),
        }
    }

    /// Build from a config provider, rejecting invalid settings.
    pub fn from_provider<P>(provider: &P, next: Arc<N>) -> Result<Self, ConfigError>
    where
        P: ConfigProvider + ?Sized,
    {
        let config = provider.filter_config();
        config.validate()?;
        Ok(Self::new(config, next))
    }

    /// The membership view, installing it on first use.
    fn view(&self) -> &Mutex<DomainMembershipView> {
        self.membership.get_or_init(|| {
            let local = self.next.local_member(true);
            debug!(local = %local.id, domain = %local.domain, "Domain membership view initialized");
            Mutex::new(DomainMembershipView::new(local))
        })
    }

    pub fn domain(&self) -> Domain {
        self.domain.read().clone()
    }

    /// Replace the domain.
    ///
    /// Peers tracked under the old domain are dropped from the view and a
    /// disappearance is forwarded for each, so the next stage never keeps a
    /// member the filter would now refuse.
    pub fn set_domain(&self, domain: impl Into<Domain>) {
        let domain = domain.into();
        let _exclusive = self.forwarding.write();
        let dropped = {
            let mut view = self.view().lock();
            let dropped = view.retain_domain(&domain);
            *self.domain.write() = domain;
            dropped
        };

        info!(domain = %self.domain.read(), dropped = dropped.len(), "Domain filter reconfigured");
        for member in dropped {
            FilterMetrics::incr(&self.metrics.members_disappeared);
            self.next.forward_member_disappeared(member);
        }
    }

    /// Replace the domain from either textual form (`{1,2,3}` or plain text).
    pub fn set_domain_str(&self, text: &str) -> Result<(), DomainParseError> {
        let domain = Domain::parse(text)?;
        self.set_domain(domain);
        Ok(())
    }

    pub fn log_interval(&self) -> u32 {
        self.warner.interval()
    }

    pub fn set_log_interval(&self, log_interval: u32) -> Result<(), ConfigError> {
        if log_interval == 0 {
            return Err(ConfigError::InvalidLogInterval(log_interval));
        }
        self.warner.set_interval(log_interval);
        Ok(())
    }

    /// Size of the view, including the local node.
    pub fn view_size(&self) -> usize {
        self.view().lock().len()
    }

    /// Drop peers not heard from within `max_age` and forward their disappearance.
    pub fn expire_members(&self, max_age: Duration) -> Vec<Member> {
        let _exclusive = self.forwarding.write();
        let expired = self.view().lock().expire(max_age);
        for member in &expired {
            debug!(member = %member, "Domain member expired");
            FilterMetrics::incr(&self.metrics.members_disappeared);
            self.next.forward_member_disappeared(member.clone());
        }
        expired
    }

    pub fn metrics(&self) -> FilterMetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl<N> ChannelInterceptor for DomainFilterInterceptor<N>
where
    N: NextStage,
{
    fn message_received(&self, message: ChannelMessage) -> FilterDecision {
        let accepted = message.sender.in_domain(&self.domain.read());
        if accepted {
            FilterMetrics::incr(&self.metrics.messages_forwarded);
            self.next.forward_message(message);
            return FilterDecision::Forwarded;
        }

        FilterMetrics::incr(&self.metrics.messages_refused);
        if self.warner.should_emit() {
            FilterMetrics::incr(&self.metrics.warnings_emitted);
            warn!(
                domain = %self.domain.read(),
                sender = %message.sender,
                interval = self.warner.interval(),
                "Received message from cluster member in another domain was refused"
            );
        }
        FilterDecision::ForeignDomain
    }

    fn member_added(&self, member: Member) -> FilterDecision {
        let _shared = self.forwarding.read_recursive();
        let decision = {
            let mut view = self.view().lock();
            if !member.in_domain(&self.domain.read()) {
                FilterDecision::ForeignDomain
            } else if view.merge_alive(&member) {
                FilterDecision::Forwarded
            } else {
                FilterDecision::AlreadyAlive
            }
        };

        match decision {
            FilterDecision::Forwarded => {
                debug!(member = %member, "Member joined domain");
                FilterMetrics::incr(&self.metrics.members_accepted);
                self.next.forward_member_added(member);
            }
            FilterDecision::ForeignDomain => {
                FilterMetrics::incr(&self.metrics.members_refused);
                info!(
                    domain = %self.domain.read(),
                    member = %member,
                    "Member was refused to join cluster"
                );
            }
            FilterDecision::AlreadyAlive => {
                FilterMetrics::incr(&self.metrics.members_already_alive);
                debug!(member = %member, "Member already alive in domain view");
            }
        }
        decision
    }

    fn member_disappeared(&self, member: Member) -> FilterDecision {
        let _shared = self.forwarding.read_recursive();
        let same_domain = {
            let mut view = self.view().lock();
            let same_domain = member.in_domain(&self.domain.read());
            if same_domain {
                view.remove(&member.id);
            }
            same_domain
        };

        if !same_domain {
            return FilterDecision::ForeignDomain;
        }
        FilterMetrics::incr(&self.metrics.members_disappeared);
        self.next.forward_member_disappeared(member);
        FilterDecision::Forwarded
    }

    fn has_members(&self) -> bool {
        self.view().lock().has_members()
    }

    fn members(&self) -> Vec<Member> {
        self.view().lock().members()
    }

    fn member(&self, id: &MemberId) -> Option<Member> {
        self.view().lock().member(id)
    }

    fn local_member(&self, include_alive_time: bool) -> Member {
        self.next.local_member(include_alive_time)
    }
}

/// Filters stack: an interceptor is itself a valid next stage.
impl<N> NextStage for DomainFilterInterceptor<N>
where
    N: NextStage,
{
    fn forward_message(&self, message: ChannelMessage) {
        self.message_received(message);
    }

    fn forward_member_added(&self, member: Member) {
        self.member_added(member);
    }

    fn forward_member_disappeared(&self, member: Member) {
        self.member_disappeared(member);
    }

    fn local_member(&self, include_alive_time: bool) -> Member {
        self.next.local_member(include_alive_time)
    }
}
