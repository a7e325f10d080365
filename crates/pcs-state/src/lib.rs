//! pcs-state — persistent instance records for the private computation pipeline.
//!
//! Backed by [redb](https://docs.rs/redb). Each [`InfraConfig`] is stored
//! JSON-encoded under its `instance_id` and kept for the lifetime of the
//! instance, including after it reaches a terminal status.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across async tasks.
//!
//! [`InfraConfig`]: pcs_core::InfraConfig

pub mod error;
pub mod store;
pub mod tables;

pub use error::{StateError, StateResult};
pub use store::StateStore;
