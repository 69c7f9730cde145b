//! Server Module
//!
//! The connection layer: accepts TCP connections, reads one message per
//! line, and dispatches on the parsed variant.
//!
//! Clients and peers share one listener. The first `AT` line of a connection
//! attributes it to a peer server, which only affects trace logging: peer
//! links get connect/disconnect lines, client connections do not.

pub mod service;
