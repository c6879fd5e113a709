use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random stream of one generation session.
///
/// Every draw made while generating a batch of titles goes through the same
/// `Sampler`, so a seeded sampler replays the exact same batch. A sampler is
/// never shared between sessions.
#[derive(Debug, Clone)]
pub struct Sampler {
	rng: StdRng,
}

impl Sampler {
	/// Seeded when `seed` is present, from OS entropy otherwise.
	pub fn new(seed: Option<i64>) -> Self {
		match seed {
			Some(seed) => Self::seeded(seed),
			None => Self::from_entropy(),
		}
	}

	/// Deterministic stream: the same seed always yields the same draws.
	pub fn seeded(seed: i64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed as u64) }
	}

	pub fn from_entropy() -> Self {
		Self { rng: StdRng::from_os_rng() }
	}

	/// Picks one element with equal probability.
	///
	/// Returns `""` for an empty list: absent data is common and not fatal.
	pub fn uniform_pick<'a, S: AsRef<str>>(&mut self, list: &'a [S]) -> &'a str {
		if list.is_empty() {
			return "";
		}
		list[self.rng.random_range(0..list.len())].as_ref()
	}

	/// Roulette-wheel selection over `weights`.
	///
	/// Draws `r` in `[1, total]` and walks the entries in insertion order,
	/// returning the first key whose cumulative weight reaches `r`. The walk
	/// order is what makes seeded runs reproducible.
	///
	/// When the weights sum to zero the pick is uniform over `fallback`
	/// (identifiers that may have no weight entry at all), or over the weight
	/// keys if `fallback` is empty. Returns `None` only when both are empty.
	pub fn weighted_pick<'a>(
		&mut self,
		weights: &'a IndexMap<String, u32>,
		fallback: &'a [String],
	) -> Option<&'a str> {
		let total: u64 = weights.values().map(|weight| u64::from(*weight)).sum();

		if total == 0 {
			if !fallback.is_empty() {
				return Some(self.uniform_pick(fallback));
			}
			if weights.is_empty() {
				return None;
			}
			let index = self.rng.random_range(0..weights.len());
			return weights.get_index(index).map(|(key, _)| key.as_str());
		}

		let r = self.rng.random_range(1..=total);

		let mut cumulative = 0;
		for (key, weight) in weights {
			cumulative += u64::from(*weight);
			if cumulative >= r {
				return Some(key.as_str());
			}
		}

		// The cumulative sum always reaches `total`
		weights.keys().next().map(String::as_str)
	}

	/// Uniform draw in `[0, 1)`.
	pub fn random_float(&mut self) -> f64 {
		self.rng.random::<f64>()
	}

	/// Uniform draw in `[min, max]`, bounds swapped if given in reverse.
	pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
		let (low, high) = if min <= max { (min, max) } else { (max, min) };
		self.rng.random_range(low..=high)
	}
}
