#![deny(missing_docs)]
//! Axis core library.
//!
//! Angle parsing, trigonometric evaluation, per-user unit preferences and
//! unit-circle rendering shared by the chat transports.

/// Angle parsing and unit resolution.
pub mod angle;
/// Configuration management.
pub mod config;
/// Unit-circle diagram rendering.
pub mod diagram;
/// Per-user angle unit preferences.
pub mod preferences;
/// Request pipeline consumed by chat transports.
pub mod service;
/// Trigonometric evaluation, exact values and formatting.
pub mod trig;

/// Helpers for unit tests.
#[cfg(test)]
pub mod testing;
