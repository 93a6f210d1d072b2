//! In-process configuration store for the review backend.
//!
//! Holds the two admin-managed record types: AI model configs and
//! repository configs. The store keeps CRUD semantics (unique names,
//! a single default model) behind async read/write locks.
//!
//! # Usage
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Call [`seed::seed_example_data`] at boot to populate an empty store.

pub mod entities;
pub mod errors;
pub mod seed;
pub mod store;

pub use entities::{
    GitProvider, ModelConfig, ModelConfigDraft, ModelProvider, RepositoryConfig,
    RepositoryConfigDraft,
};
pub use errors::StoreError;
pub use store::ConfigStore;
