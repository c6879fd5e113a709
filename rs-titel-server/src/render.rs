use serde::Serialize;

pub const PAGE_TITLE: &str = "TKKG-Titelgenerator";

/// Output format requested with the `format` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
	Html,
	Json,
	Text,
}

impl OutputFormat {
	/// Parses `html`, `json` or `text` (any case); anything else is `None`.
	pub fn parse(value: &str) -> Option<Self> {
		match value.trim().to_ascii_lowercase().as_str() {
			"html" => Some(Self::Html),
			"json" => Some(Self::Json),
			"text" | "txt" => Some(Self::Text),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Html => "html",
			Self::Json => "json",
			Self::Text => "text",
		}
	}

	pub fn content_type(&self) -> &'static str {
		match self {
			Self::Html => "text/html; charset=utf-8",
			Self::Json => "application/json; charset=utf-8",
			Self::Text => "text/plain; charset=utf-8",
		}
	}
}

/// Body of JSON responses.
#[derive(Serialize)]
pub struct TitlesBody<'a> {
	pub titles: &'a [String],
}

/// Everything the HTML page shows besides the titles.
pub struct PageView<'a> {
	pub count: usize,
	pub seed: Option<i64>,
	pub search: &'a str,
	pub template: Option<&'a str>,
	pub dataset: &'a str,
	pub datasets: Vec<&'a str>,
	pub permalink: &'a str,
}

impl PageView<'_> {
	/// Query string reproducing this page in another format.
	pub fn query_for(&self, format: OutputFormat) -> String {
		let mut pairs = vec![("count", self.count.to_string())];
		if let Some(seed) = self.seed {
			pairs.push(("seed", seed.to_string()));
		}
		if !self.search.is_empty() {
			pairs.push(("search", self.search.to_owned()));
		}
		if let Some(template) = self.template {
			pairs.push(("template", template.to_owned()));
		}
		pairs.push(("json", self.dataset.to_owned()));
		pairs.push(("format", format.as_str().to_owned()));

		pairs
			.iter()
			.map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
			.collect::<Vec<_>>()
			.join("&")
	}
}

/// Escape HTML special characters.
///
/// Replaces: & < > " '
pub fn escape_html(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#39;")
}

pub fn render_json(titles: &[String]) -> serde_json::Result<String> {
	serde_json::to_string_pretty(&TitlesBody { titles })
}

pub fn render_text(titles: &[String]) -> String {
	titles.join("\n")
}

/// Renders the form page.
///
/// `titles` is `Err(message)` when the dataset could not be loaded; the
/// message is shown in place of the result list.
pub fn render_html(view: &PageView<'_>, titles: Result<&[String], &str>) -> String {
	let mut html = String::with_capacity(4096);

	html.push_str("<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n<meta charset=\"utf-8\">\n");
	html.push_str(&format!("<title>{PAGE_TITLE}</title>\n"));
	html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
	html.push_str("<style>body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu;line-height:1.4;padding:1rem;max-width:900px;margin:0 auto}h1{margin:0 0 .5rem 0}form{display:grid;grid-template-columns:repeat(6,minmax(0,1fr));gap:.5rem;align-items:end}label{font-size:.9rem}input,select,button{padding:.4rem .5rem}ul{padding-left:1.25rem}code{background:#f3f3f3;padding:.15rem .3rem;border-radius:.25rem}.err{background:#fee;color:#900;padding:.75rem;border:1px solid #f99;border-radius:8px}footer{margin-top:1rem;color:#666;font-size:.9rem}</style>\n");
	html.push_str("</head>\n<body>\n");
	html.push_str(&format!("<h1>{PAGE_TITLE}</h1>\n"));

	// Form
	let seed = view.seed.map(|s| s.to_string()).unwrap_or_default();
	html.push_str("<form method=\"get\">\n");
	html.push_str(&format!(
		"<div><label>Anzahl<br><input type=\"number\" name=\"count\" value=\"{}\" min=\"1\" max=\"{}\"></label></div>\n",
		view.count,
		rs_titel_core::model::generation_input::MAX_COUNT
	));
	html.push_str(&format!(
		"<div><label>Seed<br><input type=\"number\" name=\"seed\" value=\"{seed}\" placeholder=\"leer = zufällig\"></label></div>\n"
	));
	html.push_str(&format!(
		"<div><label>Suchwort<br><input type=\"text\" name=\"search\" value=\"{}\" placeholder=\"bevorzugt passende Phrasen\"></label></div>\n",
		escape_html(view.search)
	));
	html.push_str(&format!(
		"<div><label>Template<br><input type=\"text\" name=\"template\" value=\"{}\" placeholder=\"optional\"></label></div>\n",
		escape_html(view.template.unwrap_or_default())
	));
	html.push_str("<div><label>Datensatz<br><select name=\"json\">");
	for name in &view.datasets {
		let selected = if *name == view.dataset { " selected" } else { "" };
		let name = escape_html(name);
		html.push_str(&format!("<option value=\"{name}\"{selected}>{name}</option>"));
	}
	html.push_str("</select></label></div>\n");
	html.push_str("<div><button type=\"submit\">Generieren</button></div>\n");
	html.push_str("</form>\n");

	let permalink = escape_html(view.permalink);
	html.push_str(&format!("<p>Permalink: <a href=\"{permalink}\"><code>{permalink}</code></a></p>\n"));

	// Results or error message
	match titles {
		Ok(titles) => {
			html.push_str("<ul>\n");
			for title in titles {
				html.push_str(&format!("<li>{}</li>\n", escape_html(title)));
			}
			html.push_str("</ul>\n");
		}
		Err(message) => {
			html.push_str(&format!("<p class=\"err\">{}</p>\n", escape_html(message)));
		}
	}

	let json_url = escape_html(&format!("/?{}", view.query_for(OutputFormat::Json)));
	let text_url = escape_html(&format!("/?{}", view.query_for(OutputFormat::Text)));
	html.push_str("<footer>\n");
	html.push_str(&format!("<p>API: <a href=\"{json_url}\">JSON</a> | <a href=\"{text_url}\">Text</a></p>\n"));
	html.push_str("<p>Templates sind in der JSON-Datei hinterlegt. Optional kann ein <code>template</code>-Name erzwungen werden.</p>\n");
	html.push_str("</footer>\n</body></html>");

	html
}
