use indexmap::IndexMap;

/// Named word lists (categories) that placeholders are resolved against.
///
/// # Invariants
/// - Built once from a loaded dataset, never mutated afterwards
/// - Categories keep the order in which they appeared in the dataset
///
/// A missing category is not an error: `get` returns an empty slice and the
/// placeholder referencing it silently vanishes.
#[derive(Clone, Debug, Default)]
pub struct WordBank {
	categories: IndexMap<String, Vec<String>>,
}

impl WordBank {
	pub fn new(categories: IndexMap<String, Vec<String>>) -> Self {
		Self { categories }
	}

	/// Returns the candidates of a category, or an empty slice if it is unknown.
	pub fn get(&self, category: &str) -> &[String] {
		self.categories
			.get(category)
			.map(Vec::as_slice)
			.unwrap_or(&[])
	}

	/// Category names in dataset order.
	pub fn categories(&self) -> impl Iterator<Item = &str> {
		self.categories.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.categories.len()
	}

	pub fn is_empty(&self) -> bool {
		self.categories.is_empty()
	}
}

impl<K, V> FromIterator<(K, V)> for WordBank
where
	K: Into<String>,
	V: IntoIterator,
	V::Item: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self::new(
			iter.into_iter()
				.map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
				.collect(),
		)
	}
}
