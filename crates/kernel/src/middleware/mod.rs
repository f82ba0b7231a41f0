//! HTTP middleware components.

pub mod identity;

pub use identity::resolve_identity;
