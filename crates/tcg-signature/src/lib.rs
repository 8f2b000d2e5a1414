//! # tcg-signature
//!
//! The signature oracle every ingress path trusts before admitting a
//! client-submitted transaction.

mod errors;
pub mod oracle;

pub use errors::SignatureError;
