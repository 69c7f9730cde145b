//! Flood Module
//!
//! Disseminates location records across the static neighbor graph.
//!
//! ## Core Mechanism
//! A record is forwarded to every neighbor except the one it arrived from,
//! and only when the local merge found it to be new information. A record
//! that circulates back to a server cannot out-date what that server already
//! holds, so it dies there; the mesh quiesces once no server learns anything
//! new. Redundant deliveries of records that were locally new but globally
//! stale are tolerated and simply fail the merge at the next hop.

pub mod propagator;
