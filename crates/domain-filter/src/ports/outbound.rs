//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces the filter **requires** the host to implement.

use crate::domain::{ChannelMessage, FilterConfig, Member};

/// The next stage of the interceptor chain.
///
/// Accepted events are forwarded here; refused events never are. The filter
/// calls these methods outside of its own locks, so an implementation may
/// call back into the filter.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct Dispatcher {
///     local: Member,
///     app: Arc<dyn Application>,
/// }
///
/// impl NextStage for Dispatcher {
///     fn forward_message(&self, message: ChannelMessage) {
///         self.app.deliver(message);
///     }
///     // ...
/// }
/// ```
pub trait NextStage: Send + Sync {
    /// Pass an accepted message on.
    fn forward_message(&self, message: ChannelMessage);

    /// Pass an accepted member-added notification on.
    fn forward_member_added(&self, member: Member);

    /// Pass an accepted member-disappeared notification on.
    fn forward_member_disappeared(&self, member: Member);

    /// The local node as known by the rest of the chain.
    ///
    /// Queried once, when the filter first needs its membership view.
    fn local_member(&self, include_alive_time: bool) -> Member;
}

/// Abstract interface for configuration loading.
///
/// Allows different configuration sources (file, environment, etc.)
pub trait ConfigProvider: Send + Sync {
    /// Get the filter configuration.
    fn filter_config(&self) -> FilterConfig;
}
