//! Command handlers.
//!
//! Each handler exposes `execute(...) -> Result<()>` and stays thin: load
//! what it needs through [`crate::bootstrap`], do the work, print or log.

pub mod providers;
pub mod serve;
