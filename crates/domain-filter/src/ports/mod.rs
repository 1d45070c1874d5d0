//! Ports Layer - Hexagonal Architecture interfaces
//!
//! - **inbound**: `ChannelInterceptor`, the API the host pipeline drives
//! - **outbound**: `NextStage` and `ConfigProvider`, what the host supplies

pub mod inbound;
pub mod outbound;

pub use inbound::{ChannelInterceptor, FilterDecision};
pub use outbound::{ConfigProvider, NextStage};
