//! Topology Module
//!
//! Holds the static mesh configuration: which servers exist, where they
//! listen, and which of them may exchange flood messages directly.
//!
//! The topology is supplied once at process start (a JSON file) and is
//! immutable for the process lifetime. Adjacency is allowed to be
//! asymmetric; nothing here assumes that `A -> B` implies `B -> A`.

pub mod types;

#[cfg(test)]
mod tests;
