//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and transform helpers
//! - RGBA/HSV color
//! - Frame timing
//! - Logging utilities

pub mod math;
pub mod color;
pub mod time;
pub mod logging;
