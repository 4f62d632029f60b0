//! Model invocation domain
//!
//! - [`config::ModelInvocationConfig`]: one configured backend call
//! - [`result::InvocationResult`]: the outcome of that call within a run

pub mod config;
pub mod result;
