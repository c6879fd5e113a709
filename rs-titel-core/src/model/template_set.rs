use indexmap::IndexMap;

use super::sampler::Sampler;

/// Output produced for a template identifier nothing can resolve.
pub const UNRECOGNIZED_TEMPLATE: &str = "Unbenannter Fall";

/// Fixed compositions known without any dataset configuration.
///
/// Each identifier maps to a literal template; tokens are drawn left to right,
/// which fixes the draw order of every composition.
pub const BUILTIN_COMPOSITIONS: [(&str, &str); 13] = [
	("ART_ADJ_NOUN__PP_ORT", "[ART_ADJ_NOUN_NOM] [PP_ORT]"),
	("ART_NOUN__GEN_ATTR", "[ART_NOUN_NOM] [GEN_ATTR]"),
	("PLURAL_SUBJ__VERB_PHRASE", "[PLURAL_SUBJ] [VERB_PHRASE]"),
	("ABSTRAKT__PP_ORT", "[ABSTRAKT] [PP_ORT]"),
	("PP_IM__ORT__GEN_ATTR", "[PP_ORT] [GEN_ATTR]"),
	("ART_NOUN__PP_AUS", "[ART_NOUN_NOM] [PP_AUS]"),
	("THEMA__PP_MIT", "[ART_NOUN_NOM] [PP_MIT]"),
	("THEMA__PP_FUER", "[ART_NOUN_NOM] [PP_FUER]"),
	("THEMA__PP_NACH", "[ART_NOUN_NOM] [PP_NACH]"),
	("NAME_APPOSITION", "[NAME_APPOSITION]"),
	("ART_NOUN__RELCLAUSE", "[ART_NOUN_NOM], [RELCLAUSE]"),
	("SUBJ_VERB_NEG", "[SUBJ_NEG] [VERB_NEG]"),
	("ZEIT__NEBENSATZ", "[ZEIT], [NEBENSATZ]"),
];

/// Templates of a dataset and how often each one should be chosen.
///
/// # Responsibilities
/// - Keep the ordered identifier list and the insertion-ordered weights
/// - Map composition identifiers to their literal template
/// - Select an identifier (weighted, uniform fallback, or forced)
///
/// # Invariants
/// - Weights are iterated in insertion order, so seeded selection is stable
/// - A missing weight counts as 0
/// - A built-in composition only applies to an identifier the dataset lists
#[derive(Clone, Debug)]
pub struct TemplateSet {
	identifiers: Vec<String>,
	weights: IndexMap<String, u32>,
	compositions: IndexMap<String, String>,
}

impl TemplateSet {
	pub fn new(identifiers: Vec<String>, weights: IndexMap<String, u32>) -> Self {
		Self { identifiers, weights, compositions: IndexMap::new() }
	}

	/// Adds dataset compositions; they take precedence over built-in ones.
	pub fn with_compositions(mut self, compositions: IndexMap<String, String>) -> Self {
		self.compositions.extend(compositions);
		self
	}

	pub fn identifiers(&self) -> &[String] {
		&self.identifiers
	}

	pub fn weights(&self) -> &IndexMap<String, u32> {
		&self.weights
	}

	/// Compositions declared by the dataset itself.
	pub fn compositions(&self) -> &IndexMap<String, String> {
		&self.compositions
	}

	/// Identifiers followed by weighted identifiers missing from that list.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.identifiers.iter().map(String::as_str).collect();
		for key in self.weights.keys() {
			if !names.contains(&key.as_str()) {
				names.push(key.as_str());
			}
		}
		names
	}

	/// Weighted pick, uniform over the identifiers when all weights are zero.
	pub fn select(&self, sampler: &mut Sampler) -> Option<&str> {
		sampler.weighted_pick(&self.weights, &self.identifiers)
	}

	/// Forced selection: the trimmed identifier, unless it is empty.
	///
	/// Whether the identifier exists is checked later by `resolve`.
	pub fn select_forced<'a>(&self, identifier: &'a str) -> Option<&'a str> {
		let identifier = identifier.trim();
		if identifier.is_empty() { None } else { Some(identifier) }
	}

	/// Returns the template text behind an identifier.
	///
	/// - a dataset composition always resolves
	/// - a listed or weighted identifier resolves to its built-in
	///   composition, or to itself as a free-form template
	/// - anything else is unrecognized (`None`)
	pub fn resolve(&self, identifier: &str) -> Option<&str> {
		if let Some(template) = self.compositions.get(identifier) {
			return Some(template.as_str());
		}
		let known = self
			.identifiers
			.iter()
			.find(|known| *known == identifier)
			.or_else(|| self.weights.get_key_value(identifier).map(|(key, _)| key))?;
		Some(builtin_composition(known).unwrap_or(known.as_str()))
	}
}

fn builtin_composition(identifier: &str) -> Option<&'static str> {
	BUILTIN_COMPOSITIONS
		.iter()
		.find(|(id, _)| *id == identifier)
		.map(|(_, template)| *template)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn set(identifiers: &[&str], weights: &[(&str, u32)]) -> TemplateSet {
		TemplateSet::new(
			identifiers.iter().map(|s| s.to_string()).collect(),
			weights.iter().map(|(k, w)| (k.to_string(), *w)).collect(),
		)
	}

	#[test]
	fn compositions_resolve_to_literal_templates() {
		let templates = set(&["ART_NOUN__RELCLAUSE"], &[("ZEIT__NEBENSATZ", 1)]);
		assert_eq!(templates.resolve("ART_NOUN__RELCLAUSE"), Some("[ART_NOUN_NOM], [RELCLAUSE]"));
		assert_eq!(templates.resolve("ZEIT__NEBENSATZ"), Some("[ZEIT], [NEBENSATZ]"));
	}

	#[test]
	fn undeclared_builtin_compositions_are_unrecognized() {
		let templates = set(&["[ART] [ADJ?] Fall"], &[]);
		assert_eq!(templates.resolve("ZEIT__NEBENSATZ"), None);
		assert_eq!(templates.resolve("ART_NOUN__RELCLAUSE"), None);
	}

	#[test]
	fn free_form_identifiers_resolve_to_themselves() {
		let templates = set(&["Die [ADJ] Akte"], &[("[PLURAL_SUBJ] in Not", 1)]);
		assert_eq!(templates.resolve("Die [ADJ] Akte"), Some("Die [ADJ] Akte"));
		assert_eq!(templates.resolve("[PLURAL_SUBJ] in Not"), Some("[PLURAL_SUBJ] in Not"));
		assert_eq!(templates.resolve("GIBT_ES_NICHT"), None);
	}

	#[test]
	fn dataset_compositions_override_builtin() {
		let extra = [("ZEIT__NEBENSATZ".to_owned(), "[ZEIT] – [NEBENSATZ]".to_owned())]
			.into_iter()
			.collect();
		let templates = set(&["ZEIT__NEBENSATZ"], &[]).with_compositions(extra);
		assert_eq!(templates.resolve("ZEIT__NEBENSATZ"), Some("[ZEIT] – [NEBENSATZ]"));
		assert_eq!(templates.compositions().len(), 1);
	}

	#[test]
	fn forced_selection_skips_weights() {
		let templates = set(&["A", "B"], &[("A", 1)]);
		assert_eq!(templates.select_forced(" B "), Some("B"));
		assert_eq!(templates.select_forced("  "), None);
	}

	#[test]
	fn select_uses_weights_then_identifiers() {
		let mut sampler = Sampler::seeded(4);
		let weighted = set(&["A", "B"], &[("A", 0), ("B", 2)]);
		for _ in 0..100 {
			assert_eq!(weighted.select(&mut sampler), Some("B"));
		}

		let unweighted = set(&["A", "B"], &[]);
		for _ in 0..100 {
			assert!(matches!(unweighted.select(&mut sampler), Some("A") | Some("B")));
		}

		assert_eq!(set(&[], &[]).select(&mut sampler), None);
	}

	#[test]
	fn names_include_weight_only_identifiers() {
		let templates = set(&["A", "B"], &[("B", 1), ("C", 2)]);
		assert_eq!(templates.names(), vec!["A", "B", "C"]);
	}
}
