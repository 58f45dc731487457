//! # Logging Module
//!
//! Structured logging system for scheduler debugging and monitoring.
//!
//! This module provides hierarchical logging levels and structured event
//! tracking using the `tracing` crate with JSON output format.
//!
//! **Most of time end-developer should not use this module directly, except
//! for setting the global logging level and using logging macros.**
//!
//! ## Components
//!
//! - [`VerboseLevel`] - Hierarchical debug levels (None → Main → Additional → Detailed → All)
//! - [`verbose_log`] - Global logging functions
//! - Event constants - Predefined event types for TCG/simulator/environment phases
//! - Macros - `log_main!`, `log_additional!`, `log_detailed!`, `log_all!`
//!
//! ## Quick Start
//!
//! ```rust
//! use tcg_intersection_sim::verbose::{set_verbose_level, VerboseLevel, EVENT_STEP};
//! use tcg_intersection_sim::log_main;
//!
//! set_verbose_level(VerboseLevel::Main);
//! log_main!(EVENT_STEP, "advancing simulator step", timestamp = 42);
//! ```
//!
//! **Note**: This module may be refactored (completely!) in future versions.
pub mod verbose;

pub use self::verbose::*;

use std::sync::Once;

static INIT: Once = Once::new();

pub fn ensure_logger_init() {
    INIT.call_once(|| {
        init_logger();
    });
}
