//! pcs-core — shared data model for the private computation pipeline.
//!
//! Every stage (sharding, identity matching, aggregation) agrees on the
//! types defined here: the per-instance [`InfraConfig`] record, the
//! party [`PrivateComputationRole`], the closed instance status domain,
//! and the PID protocol variants.

pub mod config;
pub mod types;

pub use config::PipelineConfig;
pub use types::*;
