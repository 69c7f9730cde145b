//! Location Mesh Server Library
//!
//! This library crate defines the core modules of a small location-tracking
//! mesh. It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`topology`**: The static mesh configuration. Maps server identities to
//!   listen addresses and to their neighbor sets; fixed for the process
//!   lifetime.
//! - **`protocol`**: The line-oriented wire protocol. Defines the
//!   `LocationRecord` unit of knowledge, parses inbound lines into a closed
//!   message variant set, and formats the canonical `AT` form.
//! - **`store`**: The state layer. An in-memory location table with a
//!   per-client atomic merge rule, backed by a file-per-client durable store
//!   that is reloaded on restart.
//! - **`flood`**: The dissemination layer. Forwards newly learned records to
//!   every neighbor except the one they arrived from, terminating once no
//!   server finds the record new.
//! - **`server`**: The connection layer. Accepts TCP connections, reads one
//!   message per line, and dispatches to the other subsystems.
//!
//! The `places` module is a thin client for an optional external
//! points-of-interest service consulted by `WHATSAT` queries.

pub mod flood;
pub mod places;
pub mod protocol;
pub mod server;
pub mod store;
pub mod topology;
