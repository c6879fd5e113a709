use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use rs_titel_core::model::expander::DEFAULT_MAX_DEPTH;
use rs_titel_core::model::generation_input::DEFAULT_COUNT;
use rs_titel_core::{Dataset, GenerationParameters, Generator};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
	Text,
	Json,
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Generates titles from a template dataset")]
struct Cli {
	/// Dataset file; the built-in dataset is used when absent or missing
	#[clap(long, short, env = "RS_TITEL_DATA")]
	data: Option<PathBuf>,

	/// Number of titles (clamped to 1..=999)
	#[clap(long, short, default_value_t = DEFAULT_COUNT as i64, allow_negative_numbers = true)]
	count: i64,

	/// Seed for reproducible output
	#[clap(long, short, allow_negative_numbers = true)]
	seed: Option<i64>,

	/// Prefer phrases containing this text
	#[clap(long, default_value = "")]
	search: String,

	/// Force a template identifier instead of the weighted pick
	#[clap(long, short)]
	template: Option<String>,

	#[clap(long, short, value_enum, default_value_t = Format::Text)]
	format: Format,

	/// Nesting levels expanded before placeholders are left as-is
	#[clap(long, default_value_t = DEFAULT_MAX_DEPTH)]
	max_depth: usize,

	/// Print the template identifiers of the dataset and exit
	#[clap(long)]
	list_templates: bool,

	#[clap(long, default_value = "warn")]
	log_level: String,
}

impl Cli {
	fn generation_parameters(&self) -> GenerationParameters {
		GenerationParameters::new()
			.with_count(self.count)
			.with_seed(self.seed)
			.with_search(&self.search)
			.with_template(self.template.as_deref())
	}
}

/// Loads the requested dataset, or the built-in one.
///
/// A missing file only warns; a file that exists but cannot be used is an
/// error, since silently replacing it would hide the problem.
fn load_generator(data: Option<&PathBuf>) -> Result<Generator> {
	match data {
		Some(path) if path.exists() => Ok(Generator::from_file(path)?),
		Some(path) => {
			log::warn!("{} not found, using the built-in dataset", path.display());
			Ok(Generator::from(Dataset::builtin()))
		}
		None => Ok(Generator::from(Dataset::builtin())),
	}
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Warn);
	env_logger::Builder::new()
		.filter_level(log_level_filter)
		.parse_default_env()
		.init();

	let generator = load_generator(cli.data.as_ref())?.with_max_depth(cli.max_depth);

	if cli.list_templates {
		for name in generator.template_names() {
			println!("{name}");
		}
		return Ok(());
	}

	let titles = generator.generate_many(&cli.generation_parameters());
	match cli.format {
		Format::Text => {
			for title in &titles {
				println!("{title}");
			}
		}
		Format::Json => {
			println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "titles": titles }))?);
		}
	}

	Ok(())
}
