use std::path::Path;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::model::expander::{TemplateExpander, DEFAULT_MAX_DEPTH};
use crate::model::generation_input::GenerationParameters;
use crate::model::sampler::Sampler;
use crate::model::template_set::{TemplateSet, UNRECOGNIZED_TEMPLATE};
use crate::model::word_bank::WordBank;

/// High-level title generator over one dataset.
///
/// # Responsibilities
/// - Select a template (weighted, or forced by the caller)
/// - Expand it against the word bank with the session's search bias
/// - Produce batches whose content only depends on the seed and the dataset
///
/// A `Generator` is immutable once built. Each `generate_many` call owns its
/// own `Sampler`, so one generator can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Generator {
	name: String,
	word_bank: WordBank,
	template_set: TemplateSet,
	max_depth: usize,
}

impl Generator {
	pub fn new(name: &str, word_bank: WordBank, template_set: TemplateSet) -> Self {
		Self {
			name: name.to_owned(),
			word_bank,
			template_set,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}

	/// Creates a generator from a dataset file.
	///
	/// # Errors
	/// Propagates the dataset loading errors; a generator never exists
	/// without usable data.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		Ok(Self::from(Dataset::load(path)?))
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Template identifiers, in dataset order.
	pub fn template_names(&self) -> Vec<String> {
		self.template_set.names().into_iter().map(str::to_owned).collect()
	}

	/// Category names of the word bank, in dataset order.
	pub fn categories(&self) -> Vec<String> {
		self.word_bank.categories().map(str::to_owned).collect()
	}

	/// Generates one title, drawing from `sampler`.
	///
	/// # Behavior
	/// - A forced template bypasses the weights
	/// - An identifier that resolves to nothing yields `UNRECOGNIZED_TEMPLATE`
	/// - Missing categories vanish from the output instead of failing
	pub fn generate_one(&self, params: &GenerationParameters, sampler: &mut Sampler) -> String {
		let identifier = match params.template() {
			Some(forced) => self.template_set.select_forced(forced),
			None => self.template_set.select(sampler),
		};

		let Some(template) = identifier.and_then(|id| self.template_set.resolve(id)) else {
			log::debug!("Unrecognized template {identifier:?} in dataset '{}'", self.name);
			return UNRECOGNIZED_TEMPLATE.to_owned();
		};

		log::debug!("Expanding template {template:?}");
		TemplateExpander::new(&self.word_bank)
			.with_search(params.search())
			.with_max_depth(self.max_depth)
			.expand(template, sampler)
	}

	/// Generates `params.count()` titles in order.
	///
	/// Seeds one `Sampler` for the whole batch: title `i` only depends on the
	/// draws consumed by titles `0..i`, so a seeded batch is reproducible.
	pub fn generate_many(&self, params: &GenerationParameters) -> Vec<String> {
		let mut sampler = Sampler::new(params.seed);
		(0..params.count())
			.map(|_| self.generate_one(params, &mut sampler))
			.collect()
	}
}

impl From<Dataset> for Generator {
	fn from(dataset: Dataset) -> Self {
		Self::new(&dataset.name, dataset.word_bank, dataset.template_set)
	}
}
