//! # Domain Layer for the Domain Filter
//!
//! Pure decision logic with no pipeline plumbing.
//!
//! ## Contents
//!
//! - **entities**: `Member`, `MemberId`, `Liveness`, `ChannelMessage`
//! - **value_objects**: `Domain` and `FilterConfig`
//! - **membership**: `DomainMembershipView`, the domain-local member set
//! - **sampler**: `SampledWarner`, the refusal log limiter
//! - **errors**: configuration errors

mod entities;
mod errors;
mod membership;
mod sampler;
mod value_objects;

pub use entities::*;
pub use errors::*;
pub use membership::*;
pub use sampler::*;
pub use value_objects::*;
