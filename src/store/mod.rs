//! State Module
//!
//! The location table is the single shared mutable resource in the process:
//! an in-memory map from client identifier to the freshest `LocationRecord`
//! this server has seen, mutated only through the per-key atomic
//! [`table::LocationTable::merge`] operation.
//!
//! Every accepted merge is persisted by the [`disk::DurableStore`] (one file
//! per client, canonical `AT` line as content) before it becomes visible, so
//! a restarted server reloads its last-known view before accepting traffic.

pub mod disk;
pub mod table;
