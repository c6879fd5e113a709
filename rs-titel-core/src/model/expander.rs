use super::sampler::Sampler;
use super::search_bias::apply_bias;
use super::template::{tokenize, Segment, Token};
use super::word_bank::WordBank;

/// Nesting levels expanded before the remaining text is returned as-is.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Recursive placeholder expansion against a `WordBank`.
///
/// # Behavior
/// Each token is resolved independently, left to right:
/// - an optional token first rolls `1..=100` and vanishes when the roll is
///   above its chance
/// - an unknown or empty category resolves to `""`
/// - otherwise a candidate is picked (search-biased) and itself expanded one
///   level deeper
///
/// Recursion stops when the depth budget is spent, which is also the only
/// protection against categories that reference themselves. Text returned at
/// that point may still contain tokens.
#[derive(Debug, Clone)]
pub struct TemplateExpander<'a> {
	bank: &'a WordBank,
	search: &'a str,
	max_depth: usize,
}

impl<'a> TemplateExpander<'a> {
	pub fn new(bank: &'a WordBank) -> Self {
		Self { bank, search: "", max_depth: DEFAULT_MAX_DEPTH }
	}

	/// Prefer candidates containing `search` (see `apply_bias`).
	pub fn with_search(mut self, search: &'a str) -> Self {
		self.search = search;
		self
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	/// Fully expands `template` and collapses the double spaces left behind
	/// by vanished tokens.
	pub fn expand(&self, template: &str, sampler: &mut Sampler) -> String {
		collapse_spaces(&self.expand_at(template, self.max_depth, sampler))
	}

	fn expand_at(&self, text: &str, depth: usize, sampler: &mut Sampler) -> String {
		if depth == 0 {
			log::trace!("Depth exhausted, leaving {text:?} unexpanded");
			return text.to_owned();
		}

		let mut out = String::with_capacity(text.len());
		for segment in tokenize(text) {
			match segment {
				Segment::Literal(literal) => out.push_str(literal),
				Segment::Placeholder(token) => out.push_str(&self.resolve(token, depth, sampler)),
			}
		}
		out
	}

	fn resolve(&self, token: Token<'_>, depth: usize, sampler: &mut Sampler) -> String {
		if let Some(chance) = token.chance {
			let roll = sampler.random_int(1, 100);
			if roll > i64::from(chance) {
				return String::new();
			}
		}

		let candidates = self.bank.get(token.key);
		if candidates.is_empty() {
			return String::new();
		}

		let biased = apply_bias(candidates, self.search);
		let choice = sampler.uniform_pick(&biased);
		self.expand_at(choice, depth - 1, sampler)
	}
}

/// Replaces every run of two or more spaces with a single space.
pub fn collapse_spaces(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut previous_space = false;
	for c in text.chars() {
		if c == ' ' {
			if previous_space {
				continue;
			}
			previous_space = true;
		} else {
			previous_space = false;
		}
		out.push(c);
	}
	out
}
