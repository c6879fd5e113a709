use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Result, TitleError};
use crate::io;
use crate::model::template_set::TemplateSet;
use crate::model::word_bank::WordBank;

/// Dataset file as written on disk.
///
/// Two shapes are accepted:
/// - free-form: `templates` + `assets`
/// - fixed compositions: `templates` + `weights` + `chunks`
///
/// `compositions` may appear in either shape.
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct RawDataset {
	templates: Vec<String>,
	weights: IndexMap<String, i64>,
	assets: IndexMap<String, Vec<String>>,
	chunks: IndexMap<String, Vec<String>>,
	compositions: IndexMap<String, String>,
}

/// A normalized dataset: word lists plus templates.
#[derive(Clone, Debug)]
pub struct Dataset {
	pub name: String,
	pub word_bank: WordBank,
	pub template_set: TemplateSet,
}

impl Dataset {
	/// Loads and normalizes a JSON dataset file.
	///
	/// The dataset name is the file name without extension.
	///
	/// # Errors
	/// - `TitleError::Io` if the file cannot be read
	/// - `TitleError::Parse` if it is not a valid dataset object
	/// - `TitleError::EmptyDataset` if it has no templates or no word lists
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let json = io::read_text(path).map_err(|source| TitleError::Io {
			path: path.to_owned(),
			source,
		})?;
		let name = io::get_filename(path).unwrap_or_else(|_| path.display().to_string());
		let dataset = Self::parse(&name, &json, path)?;

		log::info!(
			"Loaded dataset '{}' ({} templates, {} categories)",
			dataset.name,
			dataset.template_set.names().len(),
			dataset.word_bank.len()
		);
		Ok(dataset)
	}

	/// Parses dataset JSON; `origin` is only used in error messages.
	pub fn parse(name: &str, json: &str, origin: &Path) -> Result<Self> {
		let raw: RawDataset = serde_json::from_str(json).map_err(|source| TitleError::Parse {
			path: origin.to_owned(),
			source,
		})?;
		Self::normalize(name, raw).ok_or_else(|| TitleError::EmptyDataset(origin.to_owned()))
	}

	/// Minimal dataset used when no file is available.
	pub fn builtin() -> Self {
		let identifiers = vec!["ART_ADJ_NOUN__PP_ORT".to_owned(), "PLURAL_SUBJ__VERB_PHRASE".to_owned()];
		let weights = identifiers.iter().map(|id| (id.clone(), 1)).collect();
		let word_bank = [
			("ART_ADJ_NOUN_NOM", ["Das leere Grab", "Der falsche Priester"]),
			("PP_ORT", ["im Moor", "im Burghotel"]),
			("PLURAL_SUBJ", ["Hundediebe", "Schmuggler"]),
			("VERB_PHRASE", ["kennen keine Gnade", "reisen unerkannt"]),
		]
		.into_iter()
		.collect();

		Self {
			name: "builtin".to_owned(),
			word_bank,
			template_set: TemplateSet::new(identifiers, weights),
		}
	}

	/// Merges both shapes into one representation.
	///
	/// - `assets` and `chunks` become one word bank, `chunks` winning on name clashes
	/// - negative weights are clamped to 0
	/// - without `templates`, the weighted identifiers are the template list
	///
	/// Returns `None` when nothing could ever be generated.
	fn normalize(name: &str, raw: RawDataset) -> Option<Self> {
		let RawDataset { templates, weights, mut assets, chunks, compositions } = raw;

		assets.extend(chunks);
		if assets.is_empty() {
			return None;
		}

		let weights: IndexMap<String, u32> = weights
			.into_iter()
			.map(|(identifier, weight)| {
				if weight < 0 {
					log::warn!("Negative weight {weight} for template '{identifier}' treated as 0");
				}
				let weight = weight.clamp(0, i64::from(u32::MAX)) as u32;
				(identifier, weight)
			})
			.collect();

		let identifiers = if templates.is_empty() {
			weights.keys().cloned().collect()
		} else {
			templates
		};
		if identifiers.is_empty() {
			return None;
		}

		Some(Self {
			name: name.to_owned(),
			word_bank: WordBank::new(assets),
			template_set: TemplateSet::new(identifiers, weights).with_compositions(compositions),
		})
	}
}
