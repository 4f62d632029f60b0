//! Core domain concepts shared across all subdomains.
//!
//! - [`message::ChatMessage`]: one entry of the message list sent to a model
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod message;
