//! # Utils Module
//!
//! Test-only helpers for scheduler development and testing.
//!
//! ## Key Components
//!
//! ### Test Fixtures
//! - [`fixtures::two_cz_intersection`] - Minimal two-CZ intersection
//! - [`fixtures::four_cz_reference_intersection`] - Four-CZ reference intersection
//!
//! ### Testing Support
//! - [`rand::thread_rng`] - Deterministic RNG for reproducible tests
//!
//! ## Example
//!
//! ```rust
//! use tcg_intersection_sim::utils::fixtures::two_cz_intersection;
//!
//! let intersection = two_cz_intersection();
//! assert!(intersection.adjacent("A", "B"));
//! ```
pub mod fixtures;
pub mod rand;
