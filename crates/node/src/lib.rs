//! The node binary's internals, exposed as a library so integration tests
//! can build an in-process server the same way `main` does.

pub mod adapters;
pub mod broadcaster;
pub mod config;
pub mod dto;
pub mod errors;
mod handlers;
pub mod identity;
pub mod router;
pub mod state;
pub mod sync;
