/// Number of titles generated when the caller does not ask for a count.
pub const DEFAULT_COUNT: usize = 10;

/// Upper bound on titles per request.
pub const MAX_COUNT: usize = 999;

/// Input parameters of one generation session.
///
/// # Responsibilities
/// - Track how many titles to produce, clamped to `1..=MAX_COUNT`
/// - Carry the optional seed that makes a session reproducible
/// - Carry the search bias and the forced template, both trimmed
///
/// # Invariants
/// - `count` is always within `1..=MAX_COUNT`
/// - `search` never has surrounding whitespace; empty means no bias
/// - `template` is `None` or a non-empty trimmed identifier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationParameters {
	count: usize,

	/// Seed of the session stream; `None` seeds from OS entropy.
	pub seed: Option<i64>,

	search: String,

	template: Option<String>,
}

impl Default for GenerationParameters {
	fn default() -> Self {
		Self {
			count: DEFAULT_COUNT,
			seed: None,
			search: String::new(),
			template: None,
		}
	}
}

impl GenerationParameters {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn count(&self) -> usize {
		self.count
	}

	pub fn search(&self) -> &str {
		&self.search
	}

	pub fn template(&self) -> Option<&str> {
		self.template.as_deref()
	}

	/// Sets the number of titles, clamped to `1..=MAX_COUNT`.
	pub fn set_count(&mut self, count: i64) {
		self.count = count.clamp(1, MAX_COUNT as i64) as usize;
	}

	/// Sets the search bias; blank input disables it.
	pub fn set_search(&mut self, search: &str) {
		self.search = search.trim().to_owned();
	}

	/// Forces a template identifier; blank input restores weighted selection.
	pub fn set_template(&mut self, template: Option<&str>) {
		self.template = template
			.map(str::trim)
			.filter(|t| !t.is_empty())
			.map(str::to_owned);
	}

	pub fn with_count(mut self, count: i64) -> Self {
		self.set_count(count);
		self
	}

	pub fn with_seed(mut self, seed: Option<i64>) -> Self {
		self.seed = seed;
		self
	}

	pub fn with_search(mut self, search: &str) -> Self {
		self.set_search(search);
		self
	}

	pub fn with_template(mut self, template: Option<&str>) -> Self {
		self.set_template(template);
		self
	}
}
