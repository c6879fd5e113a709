use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the library.
///
/// Only dataset loading can fail. Everything that happens during generation
/// (unknown categories, empty lists, unknown forced templates, malformed
/// tokens) degrades to an empty string or a sentinel instead.
#[derive(Debug, Error)]
pub enum TitleError {
	#[error("could not read dataset {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("could not parse dataset {}: {source}", path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
	#[error("dataset {} contains no templates or no word lists", .0.display())]
	EmptyDataset(PathBuf),
	#[error("invalid parameter: {0}")]
	InvalidParameter(String),
}

impl TitleError {
	/// True when the error means "no usable dataset" rather than a bad request.
	pub fn is_configuration_missing(&self) -> bool {
		!matches!(self, TitleError::InvalidParameter(_))
	}
}

pub type Result<T> = std::result::Result<T, TitleError>;
