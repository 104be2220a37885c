//! Link graph representation: a mutable builder for loaders and the
//! immutable, copy-on-write store the rank engine reads.

pub mod builder;
pub mod store;

pub use builder::GraphBuilder;
pub use store::GraphStore;
