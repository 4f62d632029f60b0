//! Model transports and credential resolution

pub mod command;
pub mod credentials;
pub mod registry;

pub use command::CommandInvoker;
pub use credentials::EnvCredentialResolver;
pub use registry::InvokerRegistry;
