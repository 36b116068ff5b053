//! Built-in check bodies.
//!
//! Each body measures one property and compares it against the configured
//! threshold, returning a typed [`crate::CheckResult`]. Capability
//! failures surface as [`crate::CheckError`] and are isolated by the
//! runner.

pub(crate) mod frames;
pub(crate) mod identity;
pub(crate) mod logs;
pub(crate) mod overlay;
pub(crate) mod perceptual;
pub(crate) mod stream;
