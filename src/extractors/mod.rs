//! Request extractors for admin handlers.

pub mod identity;
pub use identity::Identity;
