//! Template expansion and weighted selection.
//!
//! Components, leaves first:
//! - Word lists by category (`WordBank`)
//! - Seedable random primitives (`Sampler`)
//! - Best-effort search filtering (`search_bias`)
//! - Template scanning into literals and placeholders (`template`)
//! - Recursive placeholder expansion (`TemplateExpander`)
//! - Weighted template selection and compositions (`TemplateSet`)
//! - The high-level interface (`Generator`)

/// Named candidate lists that placeholders are resolved against.
pub mod word_bank;

/// Per-session random stream: uniform and weighted picks, integer and float draws.
pub mod sampler;

/// Case-insensitive, never-emptying filter applied at each placeholder.
pub mod search_bias;

/// Tokenizer for `[key]`, `[key?]` and `[key?NN]` placeholders.
pub mod template;

/// Depth-bounded recursive expansion of placeholders.
pub mod expander;

/// Template identifiers, weights and fixed compositions.
pub mod template_set;

/// Count, seed, search and forced template of a generation session.
pub mod generation_input;

/// High-level interface generating one or many titles from a dataset.
pub mod generator;
