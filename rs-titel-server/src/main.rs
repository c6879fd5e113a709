mod render;

use std::collections::BTreeMap;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{get, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::LevelFilter;
use serde::Deserialize;

use render::{OutputFormat, PageView};
use rs_titel_core::io::{list_files, normalize_folder};
use rs_titel_core::model::generation_input::DEFAULT_COUNT;
use rs_titel_core::{Dataset, GenerationParameters, Generator, TitleError};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Serves the title generator form and API")]
struct Cli {
	/// Address the HTTP server binds to
	#[clap(long, env = "RS_TITEL_BIND", default_value = "127.0.0.1:5000")]
	bind: String,

	/// Folder containing the `.json` datasets
	#[clap(long, env = "RS_TITEL_DATA_DIR", default_value = "./data")]
	data_dir: String,

	/// Dataset used when a request does not name one
	#[clap(long, env = "RS_TITEL_DEFAULT_DATASET", default_value = "tkkg_titles")]
	default_dataset: String,

	/// Serve the built-in dataset when the default dataset file is missing
	#[clap(long)]
	builtin_fallback: bool,

	#[clap(long, short, default_value = "info")]
	log_level: String,
}

/// Query parameters of `/` and `/v1/generate`.
///
/// Everything is read as text so that the empty fields an HTML form submits
/// (`seed=`) count as absent instead of failing deserialization.
#[derive(Deserialize, Default, Debug)]
struct GenerateParams {
	count: Option<String>,
	seed: Option<String>,
	search: Option<String>,
	template: Option<String>,
	format: Option<String>,
	json: Option<String>,
}

#[derive(Deserialize)]
struct DatasetQuery {
	json: Option<String>,
}

/// Loaded datasets, read-only once the server runs.
struct SharedData {
	generators: BTreeMap<String, Generator>,
	default_dataset: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Leading integer of `value` (`"7abc"` → 7, `"5.5"` → 5), saturating on overflow.
///
/// `None` when the text does not start with an optional sign followed by a digit.
fn leading_int(value: &str) -> Option<i64> {
	let (negative, rest) = match value.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, value.strip_prefix('+').unwrap_or(value)),
	};
	let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
	let digits = &rest[..end];
	if digits.is_empty() {
		return None;
	}

	let signed = if negative { format!("-{digits}") } else { digits.to_owned() };
	Some(signed.parse().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

/// Plain-text error response; a request error is a 400, missing data a 503.
fn error_response(error: &TitleError) -> HttpResponse {
	let status = if error.is_configuration_missing() {
		StatusCode::SERVICE_UNAVAILABLE
	} else {
		StatusCode::BAD_REQUEST
	};
	HttpResponse::build(status)
		.content_type(OutputFormat::Text.content_type())
		.body(error.to_string())
}

impl GenerateParams {
	/// Lenient count: the leading integer, or the default when there is none.
	fn count(&self) -> i64 {
		non_empty(&self.count)
			.and_then(leading_int)
			.unwrap_or(DEFAULT_COUNT as i64)
	}

	fn seed(&self) -> Result<Option<i64>, TitleError> {
		match non_empty(&self.seed) {
			None => Ok(None),
			Some(s) => s
				.parse()
				.map(Some)
				.map_err(|_| TitleError::InvalidParameter(format!("Seed must be an integer, got '{s}'"))),
		}
	}

	fn output_format(&self, default: OutputFormat) -> OutputFormat {
		non_empty(&self.format)
			.and_then(OutputFormat::parse)
			.unwrap_or(default)
	}

	fn dataset<'a>(&'a self, default: &'a str) -> &'a str {
		non_empty(&self.json).unwrap_or(default)
	}

	fn generation_parameters(&self) -> Result<GenerationParameters, TitleError> {
		Ok(GenerationParameters::new()
			.with_count(self.count())
			.with_seed(self.seed()?)
			.with_search(self.search.as_deref().unwrap_or_default())
			.with_template(self.template.as_deref()))
	}
}

/// Generates titles for a request and renders them in the requested format.
fn respond(data: &SharedData, query: &GenerateParams, default_format: OutputFormat, permalink: &str) -> HttpResponse {
	let format = query.output_format(default_format);

	let params = match query.generation_parameters() {
		Ok(params) => params,
		Err(e) => return error_response(&e),
	};

	let dataset = query.dataset(&data.default_dataset);
	let generator = data.generators.get(dataset);

	let titles = generator.map(|g| g.generate_many(&params));
	let error = format!("Konnte {dataset} nicht laden.");

	match (format, titles) {
		(OutputFormat::Html, titles) => {
			let view = PageView {
				count: params.count(),
				seed: params.seed,
				search: params.search(),
				template: params.template(),
				dataset,
				datasets: data.generators.keys().map(String::as_str).collect(),
				permalink,
			};
			let status = if titles.is_some() { StatusCode::OK } else { StatusCode::NOT_FOUND };
			let body = match &titles {
				Some(titles) => render::render_html(&view, Ok(titles.as_slice())),
				None => render::render_html(&view, Err(error.as_str())),
			};
			HttpResponse::build(status).content_type(format.content_type()).body(body)
		}
		(_, None) => {
			log::warn!("Request for dataset '{dataset}' which is not loaded");
			HttpResponse::NotFound().content_type(OutputFormat::Text.content_type()).body(error)
		}
		(OutputFormat::Json, Some(titles)) => match render::render_json(&titles) {
			Ok(body) => HttpResponse::Ok().content_type(format.content_type()).body(body),
			Err(e) => HttpResponse::InternalServerError().body(format!("Failed to encode titles: {e}")),
		},
		(OutputFormat::Text, Some(titles)) => {
			HttpResponse::Ok().content_type(format.content_type()).body(render::render_text(&titles))
		}
	}
}

/// HTTP GET endpoint `/`
///
/// Renders the form page; `format=json|text` switches to the API output.
#[get("/")]
async fn index(data: web::Data<SharedData>, query: web::Query<GenerateParams>, req: HttpRequest) -> impl Responder {
	respond(&data, &query, OutputFormat::Html, &req.uri().to_string())
}

/// HTTP GET endpoint `/v1/generate`
///
/// Same parameters as `/`, JSON output unless `format` says otherwise.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>, req: HttpRequest) -> impl Responder {
	respond(&data, &query, OutputFormat::Json, &req.uri().to_string())
}

#[get("/v1/datasets")]
async fn get_datasets(data: web::Data<SharedData>) -> impl Responder {
	let names: Vec<&str> = data.generators.keys().map(String::as_str).collect();
	HttpResponse::Ok().content_type(OutputFormat::Text.content_type()).body(names.join("\n"))
}

#[get("/v1/templates")]
async fn get_templates(data: web::Data<SharedData>, query: web::Query<DatasetQuery>) -> impl Responder {
	let dataset = non_empty(&query.json).unwrap_or(&data.default_dataset);
	match data.generators.get(dataset) {
		Some(generator) => HttpResponse::Ok()
			.content_type(OutputFormat::Text.content_type())
			.body(generator.template_names().join("\n")),
		None => HttpResponse::NotFound().body(format!("Dataset '{dataset}' is not loaded")),
	}
}

#[get("/v1/categories")]
async fn get_categories(data: web::Data<SharedData>, query: web::Query<DatasetQuery>) -> impl Responder {
	let dataset = non_empty(&query.json).unwrap_or(&data.default_dataset);
	match data.generators.get(dataset) {
		Some(generator) => HttpResponse::Ok()
			.content_type(OutputFormat::Text.content_type())
			.body(generator.categories().join("\n")),
		None => HttpResponse::NotFound().body(format!("Dataset '{dataset}' is not loaded")),
	}
}

/// Loads every `.json` dataset of `data_dir`, keyed by file name.
///
/// Broken files are logged and skipped so one bad dataset does not take the
/// others down.
fn load_datasets(data_dir: &str, default_dataset: &str, builtin_fallback: bool) -> BTreeMap<String, Generator> {
	let folder = normalize_folder(data_dir);
	let mut generators = BTreeMap::new();

	match list_files(&folder, "json") {
		Ok(files) => {
			for file in files {
				match Generator::from_file(folder.join(&file)) {
					Ok(generator) => {
						generators.insert(generator.name().to_owned(), generator);
					}
					Err(e) => log::warn!("Skipping {file}: {e}"),
				}
			}
		}
		Err(e) => log::warn!("Cannot list datasets in {}: {e}", folder.display()),
	}

	if builtin_fallback && !generators.contains_key(default_dataset) {
		log::warn!("Dataset '{default_dataset}' not found, serving the built-in dataset in its place");
		let mut dataset = Dataset::builtin();
		dataset.name = default_dataset.to_owned();
		generators.insert(default_dataset.to_owned(), Generator::from(dataset));
	}

	if generators.is_empty() {
		log::error!("No dataset loaded from {}, requests will report a configuration error", folder.display());
	}

	generators
}

/// Security headers sent with every response.
fn security_headers() -> DefaultHeaders {
	DefaultHeaders::new()
		.add((
			"Content-Security-Policy",
			"default-src 'self'; base-uri 'self'; form-action 'self'; style-src 'self' 'unsafe-inline'; script-src 'self' 'unsafe-inline'",
		))
		.add(("X-Frame-Options", "DENY"))
		.add(("X-Content-Type-Options", "nosniff"))
		.add(("Referrer-Policy", "no-referrer"))
		.add(("Permissions-Policy", "geolocation=(), microphone=(), camera=()"))
}

/// Main entry point for the server.
///
/// Loads all datasets once, shares them read-only between workers and
/// starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
	env_logger::Builder::new()
		.filter_level(log_level_filter)
		.parse_default_env()
		.init();

	let shared_data = web::Data::new(SharedData {
		generators: load_datasets(&cli.data_dir, &cli.default_dataset, cli.builtin_fallback),
		default_dataset: cli.default_dataset.clone(),
	});

	log::info!("Listening on http://{}", cli.bind);
	HttpServer::new(move || {
		App::new()
			.app_data(shared_data.clone())
			.wrap(Logger::default())
			.wrap(security_headers())
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
			.service(index)
			.service(get_generated)
			.service(get_datasets)
			.service(get_templates)
			.service(get_categories)
	})
		.bind(&cli.bind)?
		.run()
		.await?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::body::MessageBody;
	use actix_web::dev::ServiceResponse;
	use actix_web::test::{call_service, init_service, read_body, TestRequest};
	use std::fs;

	const DATA: &str = r#"{
		"templates": ["ART_ADJ_NOUN__PP_ORT", "Die [ADJ] Akte"],
		"weights": { "ART_ADJ_NOUN__PP_ORT": 1, "Die [ADJ] Akte": 1 },
		"chunks": {
			"ART_ADJ_NOUN_NOM": ["Das leere Grab", "Der <falsche> Priester"],
			"PP_ORT": ["im Moor", "im Park"],
			"ADJ": ["geheime"]
		}
	}"#;

	fn shared_data() -> web::Data<SharedData> {
		let dataset = Dataset::parse("tkkg_titles", DATA, std::path::Path::new("tkkg_titles.json")).unwrap();
		let mut generators = BTreeMap::new();
		generators.insert("tkkg_titles".to_owned(), Generator::from(dataset));
		web::Data::new(SharedData { generators, default_dataset: "tkkg_titles".to_owned() })
	}

	macro_rules! app {
		() => {
			init_service(
				App::new()
					.app_data(shared_data())
					.wrap(security_headers())
					.service(index)
					.service(get_generated)
					.service(get_datasets)
					.service(get_templates)
					.service(get_categories),
			)
			.await
		};
	}

	async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
		String::from_utf8(read_body(resp).await.to_vec()).unwrap()
	}

	#[test]
	fn params_treat_empty_fields_as_absent() {
		let query = GenerateParams {
			count: Some("".to_owned()),
			seed: Some(" ".to_owned()),
			..Default::default()
		};
		assert_eq!(query.count(), DEFAULT_COUNT as i64);
		assert_eq!(query.seed().unwrap(), None);
		assert_eq!(query.dataset("tkkg_titles"), "tkkg_titles");
		assert_eq!(query.output_format(OutputFormat::Json), OutputFormat::Json);

		let bad = GenerateParams { seed: Some("abc".to_owned()), ..Default::default() };
		assert!(bad.generation_parameters().is_err());

		let junk = GenerateParams { count: Some("viele".to_owned()), ..Default::default() };
		assert_eq!(junk.count(), DEFAULT_COUNT as i64);
	}

	#[test]
	fn count_uses_leading_integer() {
		let count = |value: &str| GenerateParams { count: Some(value.to_owned()), ..Default::default() }.count();
		assert_eq!(count("5.5"), 5);
		assert_eq!(count("7abc"), 7);
		assert_eq!(count("+12"), 12);
		assert_eq!(count("-3"), -3);
		assert_eq!(count("99999999999999999999"), i64::MAX);
		assert_eq!(count("-x"), DEFAULT_COUNT as i64);
		assert_eq!(count(".5"), DEFAULT_COUNT as i64);
	}

	#[test]
	fn errors_map_to_status_codes() {
		let bad_seed = TitleError::InvalidParameter("seed".to_owned());
		assert_eq!(error_response(&bad_seed).status(), StatusCode::BAD_REQUEST);

		let no_data = TitleError::EmptyDataset("leer.json".into());
		assert_eq!(error_response(&no_data).status(), StatusCode::SERVICE_UNAVAILABLE);
	}

	#[actix_web::test]
	async fn generate_returns_json_titles() {
		let app = app!();
		let req = TestRequest::get().uri("/v1/generate?count=4&seed=7").to_request();
		let resp = call_service(&app, req).await;
		assert!(resp.status().is_success());

		let value: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
		assert_eq!(value["titles"].as_array().unwrap().len(), 4);
	}

	#[actix_web::test]
	async fn seeded_requests_repeat() {
		let app = app!();
		let uri = "/?count=12&seed=99&format=text";
		let first = body_text(call_service(&app, TestRequest::get().uri(uri).to_request()).await).await;
		let second = body_text(call_service(&app, TestRequest::get().uri(uri).to_request()).await).await;
		assert_eq!(first, second);
		assert_eq!(first.lines().count(), 12);
	}

	#[actix_web::test]
	async fn html_page_escapes_titles_and_sets_headers() {
		let app = app!();
		let req = TestRequest::get()
			.uri("/?count=1&template=ART_ADJ_NOUN__PP_ORT&search=Priester&seed=")
			.to_request();
		let resp = call_service(&app, req).await;
		assert!(resp.status().is_success());
		assert_eq!(resp.headers().get("X-Frame-Options").unwrap(), "DENY");

		let html = body_text(resp).await;
		assert!(html.contains("Der &lt;falsche&gt; Priester"));
		assert!(!html.contains("<falsche>"));
	}

	#[actix_web::test]
	async fn forced_unknown_template_is_sentinel() {
		let app = app!();
		let req = TestRequest::get().uri("/v1/generate?format=text&count=2&template=NOPE").to_request();
		let text = body_text(call_service(&app, req).await).await;
		assert_eq!(text, "Unbenannter Fall\nUnbenannter Fall");
	}

	#[actix_web::test]
	async fn invalid_seed_is_bad_request() {
		let app = app!();
		let req = TestRequest::get().uri("/v1/generate?seed=abc").to_request();
		let resp = call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

		let req = TestRequest::get().uri("/v1/generate?format=text&count=3.9&seed=1").to_request();
		assert_eq!(body_text(call_service(&app, req).await).await.lines().count(), 3);
	}

	#[actix_web::test]
	async fn unknown_dataset_reports_configuration_error() {
		let app = app!();
		let req = TestRequest::get().uri("/?json=fehlt").to_request();
		let resp = call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::NOT_FOUND);
		assert!(body_text(resp).await.contains("Konnte fehlt nicht laden."));

		let req = TestRequest::get().uri("/v1/generate?json=fehlt").to_request();
		let resp = call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	}

	#[actix_web::test]
	async fn lists_datasets_and_templates() {
		let app = app!();
		let req = TestRequest::get().uri("/v1/datasets").to_request();
		assert_eq!(body_text(call_service(&app, req).await).await, "tkkg_titles");

		let req = TestRequest::get().uri("/v1/templates").to_request();
		assert_eq!(
			body_text(call_service(&app, req).await).await,
			"ART_ADJ_NOUN__PP_ORT\nDie [ADJ] Akte"
		);

		let req = TestRequest::get().uri("/v1/categories?json=tkkg_titles").to_request();
		assert_eq!(
			body_text(call_service(&app, req).await).await,
			"ART_ADJ_NOUN_NOM\nPP_ORT\nADJ"
		);

		let req = TestRequest::get().uri("/v1/templates?json=fehlt").to_request();
		assert_eq!(call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
	}

	#[test]
	fn load_datasets_skips_broken_files() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("tkkg_titles.json"), DATA).unwrap();
		fs::write(dir.path().join("kaputt.json"), "{").unwrap();

		let generators = load_datasets(dir.path().to_str().unwrap(), "tkkg_titles", false);
		assert_eq!(generators.keys().collect::<Vec<_>>(), vec!["tkkg_titles"]);
	}

	#[test]
	fn builtin_fallback_fills_missing_default() {
		let dir = tempfile::tempdir().unwrap();
		let generators = load_datasets(dir.path().to_str().unwrap(), "tkkg_titles", true);
		assert!(generators.contains_key("tkkg_titles"));
		assert!(load_datasets(dir.path().to_str().unwrap(), "tkkg_titles", false).is_empty());
	}
}
