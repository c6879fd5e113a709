//! Template-based German title generation library.
//!
//! This crate provides:
//! - Dataset loading for both the free-form (`assets`) and the fixed
//!   composition (`chunks` + `weights`) JSON shapes
//! - Recursive placeholder expansion with optional, probability-gated tokens
//! - Weighted template selection with a uniform fallback
//! - Search-biased picks and seeded, reproducible batches
//!
//! Generation never fails on incomplete data; only loading a dataset can.

/// Template expansion, sampling and the high-level generator.
pub mod model;

/// Dataset file format and normalization.
pub mod dataset;

/// Library error type.
pub mod error;

/// File helpers (reading, listing, path handling).
pub mod io;

pub use dataset::Dataset;
pub use error::TitleError;
pub use model::generation_input::GenerationParameters;
pub use model::generator::Generator;
