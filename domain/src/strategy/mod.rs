//! Strategy domain
//!
//! How a set of configured models is executed:
//!
//! | Strategy | Topology | Result shape |
//! |----------|----------|--------------|
//! | Parallel | all models, same prompt, concurrently | index-stable list |
//! | Sequential | chained, output *i* feeds *i+1* | prefix of the list |
//! | Voting | parallel, then one aggregator call | list + verdict |
//! | Specialized | per-role system prompt, concurrently | role map |

pub mod adhoc;
pub mod config;
pub mod kind;
pub mod outcome;

pub use adhoc::AdHocMoaConfig;
pub use config::StrategyConfig;
pub use kind::StrategyKind;
pub use outcome::{StrategyOutcome, VotingOutcome};
