//! HTTP handlers.

pub mod cake;
