/// Narrows `list` to the entries containing `search_term` (case-insensitive).
///
/// The bias is best-effort: an empty term, or a term matching nothing,
/// leaves the candidate pool untouched. It never empties the pool.
pub fn apply_bias<'a, S: AsRef<str>>(list: &'a [S], search_term: &str) -> Vec<&'a str> {
	let all = || -> Vec<&'a str> { list.iter().map(AsRef::as_ref).collect() };

	if search_term.is_empty() {
		return all();
	}

	let needle = search_term.to_lowercase();
	let matching: Vec<&str> = list
		.iter()
		.map(AsRef::as_ref)
		.filter(|candidate| candidate.to_lowercase().contains(&needle))
		.collect();

	if matching.is_empty() { all() } else { matching }
}
