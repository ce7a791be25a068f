//! Storage Adapters
//!
//! Implementations of the KeyedStore port.
//!
//! ## Available Adapters
//!
//! - **FileKeyedStore** - Write-through JSON file per aggregate type
//! - **InMemoryKeyedStore** - Memory only, with failure injection (testing)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileKeyedStore, InMemoryKeyedStore, RetryPolicy};
//!
//! // Production: one file per aggregate type
//! let sessions = FileKeyedStore::<Session>::open("./data/sessions.json", RetryPolicy::default()).await?;
//!
//! // Testing: in-memory storage
//! let sessions = InMemoryKeyedStore::<Session>::new();
//! ```

mod file_keyed_store;
mod in_memory_keyed_store;

pub use file_keyed_store::{FileKeyedStore, RetryPolicy};
pub use in_memory_keyed_store::InMemoryKeyedStore;
