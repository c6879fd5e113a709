/// Inclusion chance of an optional token written without a percentage (`[key?]`).
pub const DEFAULT_CHANCE: u8 = 50;

/// A placeholder such as `[PP_ORT]`, `[PP_ORT?]` or `[PP_ORT?30]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
	/// Category name between the brackets.
	pub key: &'a str,
	/// Percent chance (0..=100) to include the token, `None` when mandatory.
	pub chance: Option<u8>,
}

impl Token<'_> {
	pub fn is_optional(&self) -> bool {
		self.chance.is_some()
	}
}

/// One piece of a scanned template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
	Literal(&'a str),
	Placeholder(Token<'a>),
}

/// Splits a template into literal text and placeholders, left to right.
///
/// Token grammar: `[` key `]`, `[` key `?]` or `[` key `?` NN `]`, where key is
/// one or more ASCII letters, digits or underscores and NN has 1 to 3 digits
/// (clamped to 100). Anything that does not match is kept as literal text,
/// and scanning resumes right after the unmatched `[`.
pub fn tokenize(template: &str) -> Vec<Segment<'_>> {
	let bytes = template.as_bytes();
	let mut segments = Vec::new();
	let mut literal_start = 0;
	let mut i = 0;

	while i < bytes.len() {
		if bytes[i] == b'[' {
			if let Some((token, end)) = scan_token(template, i) {
				if literal_start < i {
					segments.push(Segment::Literal(&template[literal_start..i]));
				}
				segments.push(Segment::Placeholder(token));
				i = end;
				literal_start = end;
				continue;
			}
		}
		i += 1;
	}

	if literal_start < bytes.len() {
		segments.push(Segment::Literal(&template[literal_start..]));
	}

	segments
}

/// Tries to read a token starting at the `[` found at `open`.
///
/// Returns the token and the byte index right after its closing `]`.
fn scan_token(template: &str, open: usize) -> Option<(Token<'_>, usize)> {
	let bytes = template.as_bytes();

	let key_start = open + 1;
	let mut i = key_start;
	while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
		i += 1;
	}
	if i == key_start {
		return None;
	}
	let key = &template[key_start..i];

	let mut chance = None;
	if bytes.get(i) == Some(&b'?') {
		i += 1;
		let digits_start = i;
		while i < bytes.len() && i - digits_start < 3 && bytes[i].is_ascii_digit() {
			i += 1;
		}
		chance = Some(if i == digits_start {
			DEFAULT_CHANCE
		} else {
			template[digits_start..i]
				.parse::<u16>()
				.map_or(DEFAULT_CHANCE, |percent| percent.min(100) as u8)
		});
	}

	if bytes.get(i) != Some(&b']') {
		return None;
	}

	Some((Token { key, chance }, i + 1))
}

#[cfg(test)]
mod tests {
	use super::*;
	use Segment::{Literal, Placeholder};

	fn token(key: &str, chance: Option<u8>) -> Segment<'_> {
		Placeholder(Token { key, chance })
	}

	#[test]
	fn plain_text_is_one_literal() {
		assert_eq!(tokenize("Das leere Grab"), vec![Literal("Das leere Grab")]);
		assert!(tokenize("").is_empty());
	}

	#[test]
	fn mandatory_and_optional_tokens() {
		assert_eq!(
			tokenize("[ART_NOUN_NOM] [ADJ?] [PP_ORT?30]!"),
			vec![
				token("ART_NOUN_NOM", None),
				Literal(" "),
				token("ADJ", Some(DEFAULT_CHANCE)),
				Literal(" "),
				token("PP_ORT", Some(30)),
				Literal("!"),
			]
		);
	}

	#[test]
	fn percentage_is_clamped() {
		assert_eq!(tokenize("[x?250]"), vec![token("x", Some(100))]);
		assert_eq!(tokenize("[x?0]"), vec![token("x", Some(0))]);
		assert_eq!(tokenize("[x?007]"), vec![token("x", Some(7))]);
	}

	#[test]
	fn malformed_brackets_stay_literal() {
		assert_eq!(tokenize("[x?1234]"), vec![Literal("[x?1234]")]);
		assert_eq!(tokenize("[]"), vec![Literal("[]")]);
		assert_eq!(tokenize("[PP_ORT"), vec![Literal("[PP_ORT")]);
		assert_eq!(tokenize("[zwei worte]"), vec![Literal("[zwei worte]")]);
		assert_eq!(tokenize("[grün]"), vec![Literal("[grün]")]);
		assert_eq!(tokenize("[x?a]"), vec![Literal("[x?a]")]);
	}

	#[test]
	fn scanning_resumes_after_unmatched_bracket() {
		assert_eq!(tokenize("[[a]]"), vec![Literal("["), token("a", None), Literal("]")]);
		assert_eq!(
			tokenize("Fall [ 7: [TITEL]"),
			vec![Literal("Fall [ 7: "), token("TITEL", None)]
		);
	}

	#[test]
	fn multibyte_literals_are_preserved() {
		assert_eq!(
			tokenize("Gefahr für [WEN] – überall"),
			vec![Literal("Gefahr für "), token("WEN", None), Literal(" – überall")]
		);
		assert!(tokenize("[a?]").iter().all(|s| matches!(s, Placeholder(t) if t.is_optional())));
	}
}
