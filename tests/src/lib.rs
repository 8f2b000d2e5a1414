//! Cross-crate integration scenarios for the node's full HTTP surface.
//!
//! Unlike the `#[cfg(test)]` modules colocated with each subsystem crate
//! (which check one component in isolation), everything here boots a real
//! `Node` behind a real `axum` listener and drives it with `reqwest`, the
//! same way a client or a peer node would.

pub mod integration;
