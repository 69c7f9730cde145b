//! Wire Protocol Module
//!
//! Defines the line-oriented text protocol spoken by clients and peers, and
//! the `LocationRecord` it carries.
//!
//! ## Message kinds
//! - `IAMAT <client> <±lat±lon> <time>`: a client reporting its position.
//! - `WHATSAT <client> <radiusKm> <maxResults>`: a client asking where
//!   another client was last seen.
//! - `AT <origin> <±latency> <client> <±lat±lon> <time> [relay]`: the
//!   peer-to-peer flood form; also the canonical reply and persisted form
//!   (without the trailing relay marker).
//!
//! Every inbound line is classified exactly once into the closed
//! [`types::Message`] set; anything unparseable becomes `Message::Malformed`
//! and is answered with a `?`-prefixed echo downstream.

pub mod types;
