//! quizflow-storage — persistence adapters and the result/progress store.
//!
//! The [`StorageBackend`] trait is the adapter seam: in-memory and
//! JSON-file adapters ship here, and [`BackendChain`] composes several of
//! them into an ordered fallback. [`ResultStore`] layers the result and
//! progress semantics on top and implements the core's `ResultSink` trait.

pub mod backend;
pub mod chain;
pub mod file;
pub mod memory;
pub mod store;

pub use backend::StorageBackend;
pub use chain::BackendChain;
pub use file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use store::{ResultStore, UserStats};
