//! Common types and definitions used across the stub.

mod signal;

pub use self::signal::Signal;

/// Stable, non-negative identifier of one simulated thread context within a
/// debug session.
///
/// Ids are 0-based internally and assigned by the session's thread registry.
/// RSP thread ids on the wire are offset by one (wire id 0 means "any
/// thread").
pub type ContextId = usize;
